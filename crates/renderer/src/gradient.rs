//! Colour values, banded colour lookup and grid sampling for filled plots.

use field_common::GridView;

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0, 255);
    pub const WHITE: Color = Color::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Same colour with its alpha scaled by `alpha` in `[0, 1]`.
    pub fn with_alpha(self, alpha: f64) -> Self {
        let alpha = if alpha.is_nan() { 1.0 } else { alpha.clamp(0.0, 1.0) };
        Self {
            a: (self.a as f64 * alpha).round() as u8,
            ..self
        }
    }

    pub(crate) fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }

    pub(crate) fn premultiplied(self) -> tiny_skia::PremultipliedColorU8 {
        tiny_skia::ColorU8::from_rgba(self.r, self.g, self.b, self.a).premultiply()
    }
}

/// Linear color interpolation
pub fn interpolate_color(color1: Color, color2: Color, t: f64) -> Color {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let t_inv = 1.0 - t;
    let mix = |a: u8, b: u8| (a as f64 * t_inv + b as f64 * t).round() as u8;

    Color::new(
        mix(color1.r, color2.r),
        mix(color1.g, color2.g),
        mix(color1.b, color2.b),
        mix(color1.a, color2.a),
    )
}

/// Band index of `value` when `[min, max]` is split into `levels` equal bands.
///
/// Values outside the range fall into the first or last band. Returns `None`
/// for missing values and for zero bands. A collapsed range maps to band 0.
pub fn quantize_level(value: f64, min: f64, max: f64, levels: usize) -> Option<usize> {
    if value.is_nan() || levels == 0 {
        return None;
    }
    let span = max - min;
    if !(span > 0.0) {
        return Some(0);
    }
    let t = ((value - min) / span).clamp(0.0, 1.0);
    Some(((t * levels as f64) as usize).min(levels - 1))
}

/// Colour-map position in `[0, 1]` of band `band` out of `levels`.
///
/// The first and last band take the map endpoints.
pub fn band_position(band: usize, levels: usize) -> f64 {
    if levels <= 1 {
        return 0.5;
    }
    band as f64 / (levels - 1) as f64
}

/// Bilinear sample of a row-major grid at fractional index `(col, row)`.
///
/// Returns NaN outside the grid or when any contributing corner is missing.
pub fn bilinear_sample(values: &[f64], cols: usize, rows: usize, col: f64, row: f64) -> f64 {
    if cols == 0 || rows == 0 || values.len() < cols * rows {
        return f64::NAN;
    }
    if !(col >= 0.0 && row >= 0.0 && col <= (cols - 1) as f64 && row <= (rows - 1) as f64) {
        return f64::NAN;
    }

    let c0 = (col.floor() as usize).min(cols.saturating_sub(2));
    let r0 = (row.floor() as usize).min(rows.saturating_sub(2));
    let c1 = (c0 + 1).min(cols - 1);
    let r1 = (r0 + 1).min(rows - 1);
    let tx = col - c0 as f64;
    let ty = row - r0 as f64;

    let corners = [
        (values[r0 * cols + c0], (1.0 - tx) * (1.0 - ty)),
        (values[r0 * cols + c1], tx * (1.0 - ty)),
        (values[r1 * cols + c0], (1.0 - tx) * ty),
        (values[r1 * cols + c1], tx * ty),
    ];

    let mut sum = 0.0;
    for (value, weight) in corners {
        if weight == 0.0 {
            continue;
        }
        if value.is_nan() {
            return f64::NAN;
        }
        sum += value * weight;
    }
    sum
}

/// Samples a regular mesh at arbitrary data coordinates.
///
/// The axes are taken from the first row (x) and first column (y) of the
/// view and must be strictly increasing.
#[derive(Debug, Clone)]
pub struct GridSampler {
    axis_x: Vec<f64>,
    axis_y: Vec<f64>,
    values: Vec<f64>,
}

impl GridSampler {
    pub fn new(grid: GridView<'_>) -> Self {
        let axis_x = grid.xs[..grid.cols.min(grid.xs.len())].to_vec();
        let axis_y = (0..grid.rows)
            .filter_map(|row| grid.ys.get(row * grid.cols).copied())
            .collect();
        Self {
            axis_x,
            axis_y,
            values: grid.values.to_vec(),
        }
    }

    pub fn cols(&self) -> usize {
        self.axis_x.len()
    }

    pub fn rows(&self) -> usize {
        self.axis_y.len()
    }

    /// Raw node values in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Node coordinate pairs `(x, y)` for a fractional index.
    pub fn coordinates(&self, col: f64, row: f64) -> (f64, f64) {
        (fractional_coord(&self.axis_x, col), fractional_coord(&self.axis_y, row))
    }

    /// Interpolated value at `(x, y)`, NaN outside the mesh or next to missing nodes.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        match (fractional_index(&self.axis_x, x), fractional_index(&self.axis_y, y)) {
            (Some(col), Some(row)) => {
                bilinear_sample(&self.values, self.cols(), self.rows(), col, row)
            }
            _ => f64::NAN,
        }
    }
}

/// Fractional position of `v` along an increasing axis.
fn fractional_index(axis: &[f64], v: f64) -> Option<f64> {
    let (first, last) = (*axis.first()?, *axis.last()?);
    if axis.len() < 2 || !(v >= first && v <= last) {
        return None;
    }
    let upper = axis.partition_point(|&a| a <= v).clamp(1, axis.len() - 1);
    let lower = upper - 1;
    let span = axis[upper] - axis[lower];
    let t = if span > 0.0 { (v - axis[lower]) / span } else { 0.0 };
    Some(lower as f64 + t)
}

fn fractional_coord(axis: &[f64], index: f64) -> f64 {
    if axis.is_empty() {
        return f64::NAN;
    }
    let last = axis.len() - 1;
    let lower = (index.floor().max(0.0) as usize).min(last);
    let upper = (lower + 1).min(last);
    let t = index - lower as f64;
    axis[lower] + (axis[upper] - axis[lower]) * t
}
