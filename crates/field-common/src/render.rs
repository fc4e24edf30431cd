//! Rendering contract between the data pipeline and a drawing backend.
//!
//! The pipeline hands finished grids, vector samples and polylines to a
//! [`RenderSurface`]; how they end up on screen or in a file is up to the
//! implementation. Style structs deserialize from job configuration with
//! every field optional.

use serde::{Deserialize, Serialize};

/// Borrowed view of a regular grid in row-major order.
///
/// Row 0 holds the smallest y, column 0 the smallest x. `xs`/`ys` hold the
/// mesh coordinate of every node, `values` may contain NaN for missing data.
#[derive(Debug, Clone, Copy)]
pub struct GridView<'a> {
    pub xs: &'a [f64],
    pub ys: &'a [f64],
    pub values: &'a [f64],
    pub rows: usize,
    pub cols: usize,
}

impl<'a> GridView<'a> {
    /// Check that every slice matches `rows * cols`.
    pub fn is_consistent(&self) -> bool {
        let n = self.rows * self.cols;
        n > 0 && self.xs.len() == n && self.ys.len() == n && self.values.len() == n
    }
}

/// Borrowed view of vectors anchored at scattered points.
#[derive(Debug, Clone, Copy)]
pub struct VectorView<'a> {
    pub x: &'a [f64],
    pub y: &'a [f64],
    pub u: &'a [f64],
    pub v: &'a [f64],
}

impl<'a> VectorView<'a> {
    /// Number of vectors; the shortest slice wins.
    pub fn len(&self) -> usize {
        self.x.len().min(self.y.len()).min(self.u.len()).min(self.v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Filled contour styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourStyle {
    /// Named colour map (e.g. "coolwarm", "plasma").
    pub colormap: String,
    /// Number of colour bands between the range ends.
    pub levels: usize,
    /// Fixed colour range; computed from the data when absent.
    pub value_range: Option<(f64, f64)>,
    /// Colour bar caption. No colour bar is drawn when absent.
    pub colorbar_label: Option<String>,
    /// Draw isolines on band boundaries.
    pub isolines: bool,
}

impl Default for ContourStyle {
    fn default() -> Self {
        Self {
            colormap: "coolwarm".to_string(),
            levels: 100,
            value_range: None,
            colorbar_label: None,
            isolines: false,
        }
    }
}

/// Which part of the arrow sits on the sample point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowPivot {
    #[default]
    Tail,
    Middle,
    Tip,
}

/// Arrow (quiver) styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrowStyle {
    /// Multiplier applied to every vector before drawing.
    pub scale_factor: f64,
    /// Data units per arrow length unit; larger values give shorter arrows.
    pub scale: f64,
    /// Shaft width as a fraction of the plot width.
    pub shaft_width: f64,
    /// Head width in multiples of the shaft width.
    pub head_width: f64,
    /// Head length in multiples of the shaft width.
    pub head_length: f64,
    /// Hex colour, `#rrggbb`.
    pub color: String,
    pub alpha: f64,
    pub pivot: ArrowPivot,
}

impl Default for ArrowStyle {
    fn default() -> Self {
        Self {
            scale_factor: 20.0,
            scale: 1.0,
            shaft_width: 0.001,
            head_width: 7.0,
            head_length: 7.0,
            color: "#0000ff".to_string(),
            alpha: 0.8,
            pivot: ArrowPivot::Tail,
        }
    }
}

/// Polyline styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineStyle {
    pub color: String,
    /// Stroke width in pixels.
    pub width: f64,
    pub label: Option<String>,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: "#1f77b4".to_string(),
            width: 1.5,
            label: None,
        }
    }
}

/// Figure-wide options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureOptions {
    pub width_px: u32,
    pub height_px: u32,
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    /// Draw grid lines at the axis ticks.
    pub grid: bool,
    /// Use the same scale on both axes.
    pub equal_aspect: bool,
    /// Hex background colour.
    pub background: String,
}

impl Default for FigureOptions {
    fn default() -> Self {
        Self {
            width_px: 800,
            height_px: 600,
            title: None,
            x_label: Some("X Coordinate".to_string()),
            y_label: Some("Y Coordinate".to_string()),
            grid: false,
            equal_aspect: false,
            background: "#ffffff".to_string(),
        }
    }
}

/// A drawing backend for finished plot data.
pub trait RenderSurface {
    type Error;

    /// Draw a filled contour of a regular grid, leaving missing cells empty.
    fn filled_contour(&mut self, grid: GridView<'_>, style: &ContourStyle)
        -> Result<(), Self::Error>;

    /// Draw one arrow per sample.
    fn vector_field(&mut self, field: VectorView<'_>, style: &ArrowStyle)
        -> Result<(), Self::Error>;

    /// Draw an ordered polyline through `(xs[i], ys[i])`.
    fn polyline(&mut self, xs: &[f64], ys: &[f64], style: &LineStyle) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_view_consistency() {
        let xs = [0.0, 1.0, 0.0, 1.0];
        let ys = [0.0, 0.0, 1.0, 1.0];
        let values = [1.0, 2.0, 3.0, f64::NAN];
        let view = GridView { xs: &xs, ys: &ys, values: &values, rows: 2, cols: 2 };
        assert!(view.is_consistent());

        let bad = GridView { rows: 3, ..view };
        assert!(!bad.is_consistent());
    }

    #[test]
    fn test_vector_view_len_uses_shortest() {
        let a = [0.0; 4];
        let b = [0.0; 3];
        let view = VectorView { x: &a, y: &a, u: &b, v: &a };
        assert_eq!(view.len(), 3);
        assert!(!view.is_empty());
    }

    #[test]
    fn test_arrow_style_defaults_match_quiver_setup() {
        let style = ArrowStyle::default();
        assert_eq!(style.scale_factor, 20.0);
        assert_eq!(style.head_width, 7.0);
        assert_eq!(style.pivot, ArrowPivot::Tail);
    }
}
