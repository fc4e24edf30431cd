//! Error types for rendering.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building or encoding a figure.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Figure has no layers to draw")]
    EmptyFigure,

    #[error("Invalid style: {0}")]
    InvalidStyle(#[from] StyleError),

    #[error("Invalid plot data: {0}")]
    InvalidData(String),

    #[error("Embedded font could not be parsed")]
    Font,

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while resolving colour maps and style files.
#[derive(Error, Debug)]
pub enum StyleError {
    #[error("Unknown colour map: {0}")]
    UnknownColormap(String),

    #[error("Invalid colour '{0}', expected #rrggbb or #rrggbbaa")]
    InvalidColor(String),

    #[error("Colour map '{0}' needs at least two stops with distinct values")]
    TooFewStops(String),

    #[error("Contour style needs at least one level")]
    NoLevels,

    #[error("Invalid value range [{0}, {1}]")]
    InvalidRange(f64, f64),

    #[error("Figure of {0}x{1} px is too small for axes")]
    FigureTooSmall(u32, u32),

    #[error("Failed to parse style JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read style file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

pub type RenderResult<T> = std::result::Result<T, RenderError>;
