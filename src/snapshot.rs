//! Binary portable-pixmap (P6) codec for raster frames
//!
//! Layout: `P6\n<width> <height>\n255\n` followed by `width * height` RGB
//! triples, row-major from the top-left. The alpha channel is dropped on
//! encode by design, so encode -> decode round-trips RGB exactly and only
//! RGB. The decoder also tolerates `#` comments and any whitespace between
//! header tokens, which is what other PPM writers produce.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use crate::raster::Raster;

/// Decoded snapshot: RGB triples, row-major from the top-left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub width: i32,
    pub height: i32,
    pub rgb: Vec<u8>,
}

impl Snapshot {
    /// RGB triple at `(x, y)`, or `None` outside the image.
    pub fn rgb_at(&self, x: i32, y: i32) -> Option<[u8; 3]> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return None;
        }
        let at = (x as usize + y as usize * self.width as usize) * 3;
        Some([self.rgb[at], self.rgb[at + 1], self.rgb[at + 2]])
    }
}

/// Errors from decoding a snapshot
#[derive(Debug)]
pub enum SnapshotError {
    Io(io::Error),
    /// Magic was not `P6`
    BadMagic,
    /// Width/height/maxval missing or unparseable
    BadHeader,
    /// Only 8-bit channels are supported
    BadMaxVal(u32),
    /// Payload shorter than `width * height * 3`
    Truncated,
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Io(e) => write!(f, "snapshot i/o error: {e}"),
            SnapshotError::BadMagic => write!(f, "not a P6 pixmap"),
            SnapshotError::BadHeader => write!(f, "malformed pixmap header"),
            SnapshotError::BadMaxVal(v) => write!(f, "unsupported max channel value {v}"),
            SnapshotError::Truncated => write!(f, "pixel payload is truncated"),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SnapshotError {
    fn from(e: io::Error) -> Self {
        SnapshotError::Io(e)
    }
}

/// Serialize `raster` as a binary pixmap, alpha dropped.
pub fn encode<W: Write>(raster: &Raster, out: &mut W) -> io::Result<()> {
    write!(out, "P6\n{} {}\n255\n", raster.width(), raster.height())?;
    let mut rgb = Vec::with_capacity(raster.texels().len() * 3);
    for t in raster.texels() {
        rgb.extend_from_slice(&[t.r, t.g, t.b]);
    }
    out.write_all(&rgb)
}

/// Encode `raster` to a file at `path`.
pub fn write_file<P: AsRef<Path>>(raster: &Raster, path: P) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    encode(raster, &mut out)?;
    out.flush()
}

/// Parse a binary pixmap back into RGB triples.
pub fn decode<R: Read>(input: &mut R) -> Result<Snapshot, SnapshotError> {
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;

    let mut pos = 0usize;
    if next_token(&bytes, &mut pos) != Some(b"P6".as_slice()) {
        return Err(SnapshotError::BadMagic);
    }
    let width = parse_dim(&bytes, &mut pos)?;
    let height = parse_dim(&bytes, &mut pos)?;
    let maxval: u32 = next_token(&bytes, &mut pos)
        .and_then(|t| std::str::from_utf8(t).ok())
        .and_then(|t| t.parse().ok())
        .ok_or(SnapshotError::BadHeader)?;
    if maxval != 255 {
        return Err(SnapshotError::BadMaxVal(maxval));
    }

    // Exactly one whitespace byte separates the header from the payload.
    pos += 1;
    let len = width as usize * height as usize * 3;
    if bytes.len() < pos + len {
        return Err(SnapshotError::Truncated);
    }
    Ok(Snapshot {
        width,
        height,
        rgb: bytes[pos..pos + len].to_vec(),
    })
}

fn parse_dim(bytes: &[u8], pos: &mut usize) -> Result<i32, SnapshotError> {
    let dim: i32 = next_token(bytes, pos)
        .and_then(|t| std::str::from_utf8(t).ok())
        .and_then(|t| t.parse().ok())
        .ok_or(SnapshotError::BadHeader)?;
    if dim <= 0 {
        return Err(SnapshotError::BadHeader);
    }
    Ok(dim)
}

/// Next whitespace-delimited header token, skipping `#` comment lines.
/// Leaves `pos` on the whitespace byte that ended the token.
fn next_token<'a>(bytes: &'a [u8], pos: &mut usize) -> Option<&'a [u8]> {
    loop {
        while *pos < bytes.len() && bytes[*pos].is_ascii_whitespace() {
            *pos += 1;
        }
        if bytes.get(*pos) == Some(&b'#') {
            while *pos < bytes.len() && bytes[*pos] != b'\n' {
                *pos += 1;
            }
            continue;
        }
        break;
    }
    let start = *pos;
    while *pos < bytes.len() && !bytes[*pos].is_ascii_whitespace() {
        *pos += 1;
    }
    (*pos > start).then(|| &bytes[start..*pos])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{BACKGROUND, FILL};
    use crate::raster::Raster;
    use crate::sim::{Body, Field};

    fn rendered_raster() -> Raster {
        let mut field = Field::new(64, 64).unwrap();
        field.spawn(Body::new(8, 8, 16, 16)).unwrap();
        let mut raster = Raster::new(64, 64).unwrap();
        raster.clear(BACKGROUND);
        raster.draw(&field, FILL);
        raster
    }

    #[test]
    fn test_encode_header() {
        let raster = Raster::new(3, 2).unwrap();
        let mut buf = Vec::new();
        encode(&raster, &mut buf).unwrap();
        assert!(buf.starts_with(b"P6\n3 2\n255\n"));
        assert_eq!(buf.len(), b"P6\n3 2\n255\n".len() + 3 * 2 * 3);
    }

    #[test]
    fn test_round_trip() {
        let raster = rendered_raster();
        let mut buf = Vec::new();
        encode(&raster, &mut buf).unwrap();

        let snapshot = decode(&mut buf.as_slice()).unwrap();
        assert_eq!(snapshot.width, 64);
        assert_eq!(snapshot.height, 64);
        for y in 0..64 {
            for x in 0..64 {
                let t = raster.texel(x, y).unwrap();
                assert_eq!(snapshot.rgb_at(x, y), Some([t.r, t.g, t.b]));
            }
        }
    }

    #[test]
    fn test_decode_with_comment() {
        let data = b"P6 # written by hand\n2 1\n255\n\x01\x02\x03\x04\x05\x06";
        let snapshot = decode(&mut data.as_slice()).unwrap();
        assert_eq!(snapshot.width, 2);
        assert_eq!(snapshot.rgb_at(1, 0), Some([4, 5, 6]));
    }

    #[test]
    fn test_decode_bad_magic() {
        let data = b"P5\n2 1\n255\n\x00\x00";
        assert!(matches!(
            decode(&mut data.as_slice()),
            Err(SnapshotError::BadMagic)
        ));
    }

    #[test]
    fn test_decode_truncated() {
        let data = b"P6\n2 2\n255\n\x00\x00\x00";
        assert!(matches!(
            decode(&mut data.as_slice()),
            Err(SnapshotError::Truncated)
        ));
    }

    #[test]
    fn test_decode_bad_maxval() {
        let data = b"P6\n1 1\n65535\n\x00\x00\x00";
        assert!(matches!(
            decode(&mut data.as_slice()),
            Err(SnapshotError::BadMaxVal(65535))
        ));
    }
}
