//! Common types and utilities shared across the fieldview crates.

pub mod bbox;
pub mod render;
pub mod stats;

pub use bbox::BoundingBox;
pub use render::{
    ArrowPivot, ArrowStyle, ContourStyle, FigureOptions, GridView, LineStyle, RenderSurface,
    VectorView,
};
pub use stats::{finite_range, nth_largest, nth_smallest};

/// Marker used for grid nodes that carry no data (outside the sampled hull).
pub const MISSING: f64 = f64::NAN;

/// Check whether a value is the missing-data marker.
#[inline]
pub fn is_missing(value: f64) -> bool {
    value.is_nan()
}
