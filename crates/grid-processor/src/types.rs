//! Core types for grid processing.

use field_common::{finite_range, is_missing, BoundingBox, GridView};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{GridProcessorError, Result};

/// Grid dimensions: `rows` along y, `cols` along x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

impl GridShape {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Same count along both axes.
    pub fn square(n: usize) -> Self {
        Self::new(n, n)
    }

    /// Total number of grid nodes.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A mesh needs at least two nodes per axis to include both endpoints.
    pub fn validate(&self) -> Result<()> {
        if self.rows < 2 || self.cols < 2 {
            return Err(GridProcessorError::InvalidResolution(format!(
                "{} needs at least 2 nodes per axis",
                self
            )));
        }
        Ok(())
    }
}

impl Default for GridShape {
    fn default() -> Self {
        Self::square(100)
    }
}

impl FromStr for GridShape {
    type Err = GridProcessorError;

    /// Parse `"ROWSxCOLS"` (e.g. `"100x100"`) or a single count for a square grid.
    fn from_str(s: &str) -> Result<Self> {
        let parse = |part: &str| {
            part.trim().parse::<usize>().map_err(|_| {
                GridProcessorError::InvalidResolution(format!("'{}' is not a node count", part))
            })
        };

        let lower = s.trim().to_lowercase();
        let shape = match lower.split_once('x') {
            Some((rows, cols)) => Self::new(parse(rows)?, parse(cols)?),
            None => Self::square(parse(&lower)?),
        };
        shape.validate()?;
        Ok(shape)
    }
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Scattered-data interpolation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMethod {
    /// Value of the closest sample; defined everywhere.
    Nearest,
    /// Piecewise linear over the Delaunay triangulation.
    #[default]
    Linear,
    /// Piecewise cubic, C1 smooth (Clough-Tocher). May overshoot the data.
    Cubic,
}

impl InterpolationMethod {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "nearest" => Self::Nearest,
            "cubic" | "bicubic" => Self::Cubic,
            _ => Self::Linear,
        }
    }
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nearest => write!(f, "nearest"),
            Self::Linear => write!(f, "linear"),
            Self::Cubic => write!(f, "cubic"),
        }
    }
}

/// Closed interval that interpolated values are restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClampRange {
    pub min: f64,
    pub max: f64,
}

impl ClampRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `[0, max]`.
    pub fn upper(max: f64) -> Self {
        Self::new(0.0, max)
    }

    /// Both bounds finite and ordered.
    pub fn validate(&self) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(GridProcessorError::InvalidClamp(format!(
                "[{}, {}]",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// Clamp one value; NaN (missing) passes through unchanged.
    #[inline]
    pub fn apply(&self, value: f64) -> f64 {
        if is_missing(value) {
            value
        } else {
            value.clamp(self.min, self.max)
        }
    }
}

/// A regular mesh over the sample bounding box with interpolated values.
///
/// All arrays are row-major with `shape.len()` entries. Row 0 sits at the
/// smallest y, column 0 at the smallest x. Missing values are NaN.
#[derive(Debug, Clone)]
pub struct InterpolatedGrid {
    pub shape: GridShape,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub values: Vec<f64>,
    pub bbox: BoundingBox,
    pub method: InterpolationMethod,
}

impl InterpolatedGrid {
    /// Value at a node, `None` outside the grid. Missing nodes yield `Some(NaN)`.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.shape.rows || col >= self.shape.cols {
            return None;
        }
        self.values.get(row * self.shape.cols + col).copied()
    }

    /// Mesh x coordinates along one row.
    pub fn axis_x(&self) -> &[f64] {
        &self.xs[..self.shape.cols]
    }

    /// Mesh y coordinates along one column.
    pub fn axis_y(&self) -> Vec<f64> {
        (0..self.shape.rows)
            .map(|row| self.ys[row * self.shape.cols])
            .collect()
    }

    /// Number of nodes carrying the missing marker.
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| is_missing(**v)).count()
    }

    /// Min and max over non-missing nodes.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        finite_range(&self.values)
    }

    /// Borrow as a rendering-contract view.
    pub fn view(&self) -> GridView<'_> {
        GridView {
            xs: &self.xs,
            ys: &self.ys,
            values: &self.values,
            rows: self.shape.rows,
            cols: self.shape.cols,
        }
    }
}
