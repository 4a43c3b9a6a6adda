//! Simulation configuration
//!
//! Field and canvas dimensions, colors, and the corner-hit policy, with the
//! classic 800x600 grey-and-yellow setup as defaults. Persisted as JSON so
//! demo runs are easy to reproduce and tweak.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::raster::{Raster, RasterError, Rgba};
use crate::sim::{Field, FieldError, ReflectPolicy};

/// Runtime configuration for a simulation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Collision bounds
    pub field_width: i32,
    pub field_height: i32,
    /// Pixel buffer dimensions
    pub canvas_width: i32,
    pub canvas_height: i32,
    /// Color painted by `clear`
    pub background: Rgba,
    /// Color boxes are painted with
    pub fill: Rgba,
    /// Corner-hit resolution
    pub reflect_policy: ReflectPolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            background: BACKGROUND,
            fill: FILL,
            reflect_policy: ReflectPolicy::default(),
        }
    }
}

impl SimConfig {
    /// Load from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let json = fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Save as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)
    }

    /// Build the field this configuration describes.
    pub fn field(&self) -> Result<Field, FieldError> {
        Ok(Field::new(self.field_width, self.field_height)?.with_policy(self.reflect_policy))
    }

    /// Build the canvas this configuration describes.
    pub fn raster(&self) -> Result<Raster, RasterError> {
        Raster::new(self.canvas_width, self.canvas_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = SimConfig::default();
        assert_eq!(config.field_width, 800);
        assert_eq!(config.field_height, 600);
        assert_eq!(config.background, Rgba::new(51, 51, 51, 255));
        assert_eq!(config.fill, Rgba::new(255, 255, 0, 255));
        assert_eq!(config.reflect_policy, ReflectPolicy::YOverridesX);
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = SimConfig::default();
        config.canvas_width = 1024;
        config.fill = Rgba::new(0, 128, 255, 255);
        config.reflect_policy = ReflectPolicy::Combined;

        let json = serde_json::to_string(&config).unwrap();
        let back: SimConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimConfig =
            serde_json::from_str(r#"{ "field_width": 320, "fill": [255, 0, 0, 255] }"#).unwrap();
        assert_eq!(config.field_width, 320);
        assert_eq!(config.field_height, 600);
        assert_eq!(config.fill, Rgba::new(255, 0, 0, 255));
    }

    #[test]
    fn test_builds_field_and_raster() {
        let config = SimConfig::default();
        let field = config.field().unwrap();
        assert_eq!(field.width(), 800);
        assert_eq!(config.raster().unwrap().height(), 600);
    }
}
