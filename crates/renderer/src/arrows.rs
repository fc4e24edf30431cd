//! Quiver arrow geometry.
//!
//! Arrows are sized relative to the plot width: a vector whose scaled
//! magnitude equals `style.scale` is as long as the plot is wide. Geometry is
//! returned in the caller's frame, which is usually pixels.

use field_common::{ArrowPivot, ArrowStyle};

/// Outline of one arrow: shaft and head as a single closed polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowGeometry {
    /// Polygon vertices in drawing order.
    pub outline: Vec<(f64, f64)>,
    /// Point the arrow starts from.
    pub tail: (f64, f64),
    /// Point of the head.
    pub tip: (f64, f64),
}

/// Euclidean length of each `(u, v)` pair.
pub fn vector_magnitude(u: &[f64], v: &[f64]) -> Vec<f64> {
    u.iter().zip(v).map(|(u, v)| u.hypot(*v)).collect()
}

/// Build the arrow for vector `(u, v)` anchored at `(x, y)`.
///
/// `width_units` is the plot width expressed in the output frame. Returns
/// `None` for zero-length or non-finite vectors.
pub fn arrow_geometry(
    x: f64,
    y: f64,
    u: f64,
    v: f64,
    style: &ArrowStyle,
    width_units: f64,
) -> Option<ArrowGeometry> {
    if !(x.is_finite() && y.is_finite() && u.is_finite() && v.is_finite()) {
        return None;
    }
    let scale = if style.scale > 0.0 { style.scale } else { 1.0 };
    let magnitude = u.hypot(v) * style.scale_factor.abs() / scale;
    let length = magnitude * width_units;
    if !(length > 0.0) {
        return None;
    }

    let sign = if style.scale_factor < 0.0 { -1.0 } else { 1.0 };
    let (dx, dy) = (sign * u / u.hypot(v), sign * v / u.hypot(v));
    let (nx, ny) = (-dy, dx);

    let shaft = (style.shaft_width * width_units).max(0.5);
    let mut head_length = style.head_length * shaft;
    let mut head_width = style.head_width * shaft;
    let mut shaft_width = shaft;

    // Short arrows shrink as a whole so the head never outgrows the vector.
    if head_length > length {
        let shrink = length / head_length;
        head_length = length;
        head_width *= shrink;
        shaft_width *= shrink;
    }

    let offset = match style.pivot {
        ArrowPivot::Tail => 0.0,
        ArrowPivot::Middle => length / 2.0,
        ArrowPivot::Tip => length,
    };
    let tail = (x - dx * offset, y - dy * offset);
    let tip = (tail.0 + dx * length, tail.1 + dy * length);
    let neck = length - head_length;

    let at = |along: f64, across: f64| {
        (
            tail.0 + dx * along + nx * across,
            tail.1 + dy * along + ny * across,
        )
    };

    let outline = vec![
        at(0.0, shaft_width / 2.0),
        at(neck, shaft_width / 2.0),
        at(neck, head_width / 2.0),
        tip,
        at(neck, -head_width / 2.0),
        at(neck, -shaft_width / 2.0),
        at(0.0, -shaft_width / 2.0),
    ];

    Some(ArrowGeometry { outline, tail, tip })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> ArrowStyle {
        ArrowStyle {
            scale_factor: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_vector_magnitude() {
        assert_eq!(vector_magnitude(&[3.0, 0.0], &[4.0, -2.0]), vec![5.0, 2.0]);
    }

    #[test]
    fn test_arrow_points_along_vector() {
        let arrow = arrow_geometry(10.0, 10.0, 0.1, 0.0, &style(), 500.0).unwrap();
        assert_eq!(arrow.tail, (10.0, 10.0));
        assert!((arrow.tip.0 - 60.0).abs() < 1e-9);
        assert!((arrow.tip.1 - 10.0).abs() < 1e-9);

        let max_x = arrow.outline.iter().map(|p| p.0).fold(f64::MIN, f64::max);
        assert_eq!(max_x, arrow.tip.0);
    }

    #[test]
    fn test_diagonal_direction() {
        let arrow = arrow_geometry(0.0, 0.0, 0.3, 0.4, &style(), 100.0).unwrap();
        assert!((arrow.tip.0 - 30.0).abs() < 1e-9);
        assert!((arrow.tip.1 - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_pivot_positions() {
        let tip_style = ArrowStyle { pivot: ArrowPivot::Tip, ..style() };
        let arrow = arrow_geometry(0.0, 0.0, 0.0, 0.2, &tip_style, 100.0).unwrap();
        assert!(arrow.tip.0.abs() < 1e-9 && arrow.tip.1.abs() < 1e-9);
        assert!((arrow.tail.1 + 20.0).abs() < 1e-9);

        let mid_style = ArrowStyle { pivot: ArrowPivot::Middle, ..style() };
        let arrow = arrow_geometry(0.0, 0.0, 0.0, 0.2, &mid_style, 100.0).unwrap();
        assert!((arrow.tip.1 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_factor_and_scale() {
        let quiver = ArrowStyle { scale_factor: 20.0, scale: 2.0, ..style() };
        let arrow = arrow_geometry(0.0, 0.0, 0.01, 0.0, &quiver, 1000.0).unwrap();
        assert!((arrow.tip.0 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_vector_has_no_arrow() {
        assert!(arrow_geometry(0.0, 0.0, 0.0, 0.0, &style(), 100.0).is_none());
        assert!(arrow_geometry(0.0, 0.0, f64::NAN, 1.0, &style(), 100.0).is_none());
    }

    #[test]
    fn test_short_arrow_head_shrinks() {
        let arrow = arrow_geometry(0.0, 0.0, 0.001, 0.0, &style(), 100.0).unwrap();
        let neck = arrow.outline[1];
        assert!(neck.0.abs() < 1e-9);
        assert!(arrow.outline.iter().all(|p| p.0 <= arrow.tip.0 + 1e-9));
    }
}
