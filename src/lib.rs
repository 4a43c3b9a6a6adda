//! Bounce Box - bouncing rectangles in a bounded field
//!
//! Core modules:
//! - `sim`: Deterministic simulation (integration, wall reflection, field registry)
//! - `raster`: RGBA pixel buffer the field is painted into each tick
//! - `snapshot`: Binary portable-pixmap (P6) codec for raster frames
//! - `config`: Runtime field/canvas dimensions and colors, JSON-backed
//!
//! The crate ends at the pixel buffer: window/GPU presentation is a consumer
//! of [`Raster::as_bytes`], not part of the simulation.

pub mod config;
pub mod raster;
pub mod sim;
pub mod snapshot;

pub use config::SimConfig;
pub use raster::{Raster, RasterError, Rgba};
pub use sim::{Body, BodyHandle, Field, FieldError, ReflectPolicy};

/// Default configuration constants
///
/// The classic dimensions and colors of the simulation. They seed
/// [`crate::SimConfig::default`]; the types themselves take dimensions at
/// runtime.
pub mod consts {
    use crate::raster::Rgba;

    /// Field (collision bounds) dimensions
    pub const FIELD_WIDTH: i32 = 800;
    pub const FIELD_HEIGHT: i32 = 600;

    /// Canvas (pixel buffer) dimensions
    pub const CANVAS_WIDTH: i32 = 800;
    pub const CANVAS_HEIGHT: i32 = 600;

    /// Background color painted by `clear`
    pub const BACKGROUND: Rgba = Rgba::new(51, 51, 51, 255);
    /// Fill color for box rectangles
    pub const FILL: Rgba = Rgba::new(255, 255, 0, 255);
}
