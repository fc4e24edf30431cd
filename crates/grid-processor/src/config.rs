//! Configuration for the grid processor.

use crate::types::{GridShape, InterpolationMethod};
use serde::{Deserialize, Serialize};

/// Configuration for building interpolated grids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridProcessorConfig {
    /// Mesh resolution (rows along y, cols along x).
    pub resolution: GridShape,

    /// Interpolation method for scattered samples.
    pub method: InterpolationMethod,

    /// Lower clamp bound applied to every interpolated value.
    pub clamp_min: f64,
}

impl Default for GridProcessorConfig {
    fn default() -> Self {
        Self {
            resolution: GridShape::square(100),
            method: InterpolationMethod::Cubic,
            clamp_min: 0.0,
        }
    }
}

impl GridProcessorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GRID_RESOLUTION") {
            if let Ok(shape) = val.parse() {
                config.resolution = shape;
            }
        }

        if let Ok(val) = std::env::var("GRID_INTERPOLATION") {
            config.method = InterpolationMethod::from_str(&val);
        }

        if let Ok(val) = std::env::var("GRID_CLAMP_MIN") {
            if let Ok(min) = val.parse() {
                config.clamp_min = min;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.resolution.rows < 2 || self.resolution.cols < 2 {
            return Err("resolution must be at least 2x2".to_string());
        }

        if !self.clamp_min.is_finite() {
            return Err("clamp_min must be finite".to_string());
        }

        Ok(())
    }
}
