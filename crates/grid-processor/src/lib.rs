//! Scattered-sample to regular-grid interpolation.
//!
//! Takes `(x, y, value)` samples at arbitrary positions, evaluates them on a
//! regular mesh spanning their bounding box and clamps the result into a
//! caller-supplied range. Mesh nodes the interpolator cannot reach carry NaN
//! as the missing-value marker, which rendering treats as "no data".
//!
//! # Architecture
//!
//! ```text
//! (xs, ys, values)
//!      │
//!      ▼
//! build_interpolated_grid
//!      │
//!      ├─► validate lengths, finiteness, extent
//!      │
//!      ├─► mesh(bbox, resolution)          rows along y, cols along x
//!      │
//!      ├─► ScatteredInterpolator           nearest | linear | cubic
//!      │         │
//!      │         └─► Delaunay triangulation + Clough-Tocher patches
//!      │
//!      └─► clamp_values(min, max)          NaN passes through
//!               │
//!               ▼
//!        InterpolatedGrid
//! ```
//!
//! # Example
//!
//! ```
//! use grid_processor::{build_interpolated_grid_default, ClampRange, GridShape, InterpolationMethod};
//!
//! let xs = [0.0, 1.0, 1.0, 0.0];
//! let ys = [0.0, 0.0, 1.0, 1.0];
//! let temps = [300.0, 310.0, 320.0, 310.0];
//!
//! let grid = build_interpolated_grid_default(
//!     &xs,
//!     &ys,
//!     &temps,
//!     GridShape::new(5, 5),
//!     ClampRange::upper(2000.0),
//!     InterpolationMethod::Linear,
//! )
//! .unwrap();
//!
//! assert_eq!(grid.values.len(), 25);
//! assert_eq!(grid.get(0, 0), Some(300.0));
//! ```

pub mod adapter;
pub mod config;
pub mod error;
pub mod mesh;
pub mod scattered;
pub mod shape;
pub mod types;

// Re-export commonly used types at crate root
pub use adapter::{build_interpolated_grid, build_interpolated_grid_default, clamp_values};
pub use config::GridProcessorConfig;
pub use error::{GridProcessorError, Result};
pub use mesh::{linspace, mesh};
pub use scattered::{DelaunayInterpolator, Samples, ScatteredInterpolator, Triangulation};
pub use shape::infer_grid_shape;
pub use types::{ClampRange, GridShape, InterpolatedGrid, InterpolationMethod};
