//! Rendering surface for field plots.
//!
//! [`Figure`] implements [`field_common::RenderSurface`]: the pipeline adds
//! filled contours, arrow fields and polylines, and the figure rasterizes them
//! with axes, a colour bar and text into a PNG.
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ GridView     │──▶│ filled bands │   │ style::      │
//! │ VectorView   │──▶│ arrows       │◀──│ ColorMap     │
//! │ polyline     │──▶│ lines        │   └──────────────┘
//! └──────────────┘   └──────┬───────┘
//!                           ▼
//!              axes · ticks · colour bar · text
//!                           ▼
//!                    png (indexed / RGBA + tEXt)
//! ```
//!
//! Modules:
//! - [`gradient`]: colours, band quantization, grid sampling
//! - [`contour`]: marching squares isolines
//! - [`arrows`]: quiver arrow geometry
//! - [`labels`]: text set with the embedded TrueType font
//! - [`style`]: colour maps and JSON style files
//! - [`png`]: PNG encoder

pub mod arrows;
pub mod contour;
pub mod error;
pub mod figure;
pub mod gradient;
pub mod labels;
pub mod png;
pub mod style;

pub use error::{RenderError, RenderResult, StyleError};
pub use figure::Figure;
pub use gradient::Color;
pub use style::{ColorMap, StyleConfig};
