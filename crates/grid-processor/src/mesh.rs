//! Regular mesh construction.

use field_common::BoundingBox;

use crate::types::GridShape;

/// `n` evenly spaced values from `start` to `end`, both included.
///
/// The last value is set to `end` exactly rather than accumulated, so the
/// mesh edge always coincides with the data bounding box.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            values[n - 1] = end;
            values
        }
    }
}

/// Row-major node coordinates of a `shape` mesh spanning `bbox`.
///
/// Returns `(xs, ys)`, each with `shape.len()` entries. Row 0 is at
/// `bbox.min_y` and column 0 at `bbox.min_x`.
pub fn mesh(bbox: &BoundingBox, shape: GridShape) -> (Vec<f64>, Vec<f64>) {
    let axis_x = linspace(bbox.min_x, bbox.max_x, shape.cols);
    let axis_y = linspace(bbox.min_y, bbox.max_y, shape.rows);

    let mut xs = Vec::with_capacity(shape.len());
    let mut ys = Vec::with_capacity(shape.len());
    for &y in &axis_y {
        xs.extend_from_slice(&axis_x);
        ys.extend(std::iter::repeat(y).take(shape.cols));
    }
    (xs, ys)
}
