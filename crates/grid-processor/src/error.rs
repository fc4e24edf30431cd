//! Error types for grid processing.

use thiserror::Error;

/// Errors that can occur while building an interpolated grid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridProcessorError {
    /// Input sequences that must be index-aligned have different lengths.
    #[error("input length mismatch: x={x}, y={y}, values={values}")]
    LengthMismatch { x: usize, y: usize, values: usize },

    /// The samples do not span an area (single point, identical points,
    /// fewer than two distinct values on an axis, or all collinear).
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// A coordinate or value is NaN or infinite.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Requested grid resolution is unusable.
    #[error("invalid resolution: {0}")]
    InvalidResolution(String),

    /// Clamp bounds are not an ordered pair of finite numbers.
    #[error("invalid clamp range: {0}")]
    InvalidClamp(String),

    /// The scattered interpolator failed.
    #[error("interpolation error: {0}")]
    InterpolationError(String),
}

impl GridProcessorError {
    /// Create a DegenerateInput error.
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateInput(msg.into())
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an InterpolationError.
    pub fn interpolation(msg: impl Into<String>) -> Self {
        Self::InterpolationError(msg.into())
    }
}

/// Result type for grid processor operations.
pub type Result<T> = std::result::Result<T, GridProcessorError>;
