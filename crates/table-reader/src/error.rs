//! Error types for tabular data reading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for reader operations.
pub type ReaderResult<T> = Result<T, ReaderError>;

/// Error types for tabular data reading.
#[derive(Error, Debug)]
pub enum ReaderError {
    /// The file could not be opened or read.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading from an already open source failed.
    #[error("read error: {0}")]
    Read(#[from] std::io::Error),

    /// A field of a well-formed row is not a floating-point literal.
    #[error("line {line}, field {column}: '{token}' is not a number")]
    Parse {
        line: usize,
        column: usize,
        token: String,
    },

    /// Requested a row arity that cannot hold data.
    #[error("invalid row arity: {0}")]
    InvalidArity(usize),

    /// A dataset was converted into a view that expects another arity.
    #[error("expected {expected} columns, dataset has {actual}")]
    ArityMismatch { expected: usize, actual: usize },
}

impl ReaderError {
    /// Attach a path to an I/O failure.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
