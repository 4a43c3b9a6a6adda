//! RGBA pixel buffer the simulation renders into
//!
//! Row-major, top-left origin, 4 bytes per texel. The buffer is the sole
//! handoff to any presenter: [`Raster::as_bytes`] yields the exact byte
//! layout a GPU texture upload or file encoder expects, with no copy.
//!
//! All rectangle writes are clamped: a rect is intersected with the buffer
//! before anything is written, and a rect wholly outside paints nothing.

use std::fmt;

use bytemuck::{Pod, Zeroable};
use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::sim::Field;

/// One texel, `#[repr(C)]` so a `&[Rgba]` casts straight to `&[u8]`.
///
/// Serializes as a `[r, g, b, a]` array in config files.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable, Serialize, Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl From<[u8; 4]> for Rgba {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Rgba> for [u8; 4] {
    fn from(c: Rgba) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}

/// Errors from raster construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    /// Width or height was zero or negative
    BadDimensions { width: i32, height: i32 },
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterError::BadDimensions { width, height } => {
                write!(f, "bad raster dimensions {width}x{height}")
            }
        }
    }
}

impl std::error::Error for RasterError {}

/// Fixed-size RGBA pixel buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: i32,
    height: i32,
    texels: Vec<Rgba>,
}

impl Raster {
    /// Create a zero-filled (transparent black) buffer.
    pub fn new(width: i32, height: i32) -> Result<Self, RasterError> {
        if width <= 0 || height <= 0 {
            return Err(RasterError::BadDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            texels: vec![Rgba::zeroed(); (width as usize) * (height as usize)],
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Overwrite every texel with `color`.
    pub fn clear(&mut self, color: Rgba) {
        self.texels.fill(color);
    }

    /// Paint every live body in `field` at its current position.
    ///
    /// Reads the bodies' live positions, not their registration slots;
    /// bodies that have wandered (partly) off the canvas are clamped.
    pub fn draw(&mut self, field: &Field, fill: Rgba) {
        for (_, body) in field.iter() {
            self.fill_rect(body.pos, body.width, body.height, fill);
        }
    }

    /// Paint the intersection of `[pos.x, pos.x+w) x [pos.y, pos.y+h)` with
    /// the buffer. A rect wholly outside paints nothing.
    pub fn fill_rect(&mut self, pos: IVec2, w: i32, h: i32, color: Rgba) {
        let x0 = pos.x.max(0);
        let y0 = pos.y.max(0);
        let x1 = pos.x.saturating_add(w).min(self.width);
        let y1 = pos.y.saturating_add(h).min(self.height);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        for y in y0..y1 {
            let row = y as usize * self.width as usize;
            self.texels[row + x0 as usize..row + x1 as usize].fill(color);
        }
    }

    /// Texel at `(x, y)`, or `None` outside the buffer.
    pub fn texel(&self, x: i32, y: i32) -> Option<Rgba> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return None;
        }
        Some(self.texels[x as usize + y as usize * self.width as usize])
    }

    pub fn texels(&self) -> &[Rgba] {
        &self.texels
    }

    /// The buffer as raw `R,G,B,A` bytes, row-major from the top-left.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{BACKGROUND, FILL};
    use crate::sim::{Body, Field};
    use proptest::prelude::*;

    #[test]
    fn test_bad_dimensions() {
        assert!(Raster::new(0, 10).is_err());
        assert!(Raster::new(10, -3).is_err());
    }

    #[test]
    fn test_clear() {
        let mut raster = Raster::new(4, 3).unwrap();
        raster.clear(BACKGROUND);
        assert!(raster.texels().iter().all(|&t| t == BACKGROUND));
    }

    #[test]
    fn test_draw_single_body_footprint() {
        // One 200x200 body at (30, 30) on a 240x240 canvas: every texel in
        // [30, 230) x [30, 230) is fill, everything else background.
        let mut field = Field::new(240, 240).unwrap();
        field.spawn(Body::new(30, 30, 200, 200)).unwrap();

        let mut raster = Raster::new(240, 240).unwrap();
        raster.clear(BACKGROUND);
        raster.draw(&field, FILL);

        for y in 0..240 {
            for x in 0..240 {
                let inside = (30..230).contains(&x) && (30..230).contains(&y);
                let expected = if inside { FILL } else { BACKGROUND };
                assert_eq!(raster.texel(x, y), Some(expected), "texel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_draw_reads_live_position() {
        let mut field = Field::new(100, 100).unwrap();
        let handle = field.spawn(Body::new(10, 10, 5, 5)).unwrap();
        field
            .body_mut(handle)
            .unwrap()
            .set_vel(IVec2::new(20, 0));
        field.step();

        let mut raster = Raster::new(100, 100).unwrap();
        raster.clear(BACKGROUND);
        raster.draw(&field, FILL);

        // Painted at (30, 10), not at the registration slot (10, 10).
        assert_eq!(raster.texel(10, 10), Some(BACKGROUND));
        assert_eq!(raster.texel(30, 10), Some(FILL));
    }

    #[test]
    fn test_fill_rect_clamps_to_edges() {
        let mut raster = Raster::new(10, 10).unwrap();
        raster.clear(BACKGROUND);

        // Overhangs the top-left corner.
        raster.fill_rect(IVec2::new(-3, -3), 5, 5, FILL);
        assert_eq!(raster.texel(0, 0), Some(FILL));
        assert_eq!(raster.texel(1, 1), Some(FILL));
        assert_eq!(raster.texel(2, 2), Some(BACKGROUND));

        // Overhangs the bottom-right corner.
        raster.fill_rect(IVec2::new(8, 8), 5, 5, FILL);
        assert_eq!(raster.texel(9, 9), Some(FILL));
        assert_eq!(raster.texel(7, 7), Some(BACKGROUND));
    }

    #[test]
    fn test_fill_rect_outside_paints_nothing() {
        let mut raster = Raster::new(10, 10).unwrap();
        raster.clear(BACKGROUND);
        raster.fill_rect(IVec2::new(50, 50), 20, 20, FILL);
        raster.fill_rect(IVec2::new(-30, 0), 20, 20, FILL);
        assert!(raster.texels().iter().all(|&t| t == BACKGROUND));
    }

    #[test]
    fn test_as_bytes_layout() {
        let mut raster = Raster::new(2, 1).unwrap();
        raster.fill_rect(IVec2::new(1, 0), 1, 1, Rgba::new(1, 2, 3, 4));
        assert_eq!(raster.as_bytes(), &[0, 0, 0, 0, 1, 2, 3, 4]);
    }

    proptest! {
        #[test]
        fn prop_fill_rect_never_escapes(
            x in i32::MIN..i32::MAX,
            y in i32::MIN..i32::MAX,
            w in 0i32..10_000,
            h in 0i32..10_000,
        ) {
            let mut raster = Raster::new(32, 32).unwrap();
            raster.clear(BACKGROUND);
            raster.fill_rect(IVec2::new(x, y), w, h, FILL);
            // Every painted texel lies in the rect/buffer intersection.
            for ty in 0..32i32 {
                for tx in 0..32i32 {
                    let painted = raster.texel(tx, ty) == Some(FILL);
                    let inside = tx >= x
                        && ty >= y
                        && (tx as i64) < x as i64 + w as i64
                        && (ty as i64) < y as i64 + h as i64;
                    prop_assert_eq!(painted, inside, "texel ({}, {})", tx, ty);
                }
            }
        }
    }
}
