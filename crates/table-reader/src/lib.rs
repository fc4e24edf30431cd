//! Reader for whitespace-delimited numeric tables.
//!
//! Solver and instrument exports arrive as plain text with one sample per
//! line:
//!
//! ```text
//! 0,00000 0,00000 2,50000E+001      x y T       (scalar field)
//! 0,00100 0,00000 1,0E-003 0,0E+000 x y u_x u_y (vector field)
//! 0.0 1.5                           x y         (line series)
//! ```
//!
//! The decimal separator is chosen per call through [`DecimalConvention`];
//! there is no process-wide setting. Lines with an unexpected field count are
//! skipped, a malformed number on an otherwise valid line is an error.
//!
//! # Example
//!
//! ```
//! use table_reader::{read_rows, DecimalConvention};
//!
//! let text = "x y T\n1,5 2,0 3,5\n";
//! let dataset = read_rows(text.as_bytes(), 3, DecimalConvention::Comma).unwrap();
//! assert_eq!(dataset.len(), 1);
//! assert_eq!(dataset.column(0), Some(&[1.5][..]));
//! ```

pub mod dataset;
pub mod decimal;
pub mod error;
pub mod reader;

pub use dataset::{Dataset, ScalarSamples, VectorSamples};
pub use decimal::DecimalConvention;
pub use error::{ReaderError, ReaderResult};
pub use reader::{
    read_pairs, read_pairs_from_path, read_rows, read_rows_from_path, read_scalar_field,
    read_vector_field,
};
