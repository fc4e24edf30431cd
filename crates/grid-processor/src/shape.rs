//! Detection of samples that already lie on a regular lattice.

use crate::types::GridShape;

/// Shape of the lattice the samples lie on, if any.
///
/// Coordinates closer than `tolerance` times the axis span count as the same
/// lattice line. Returns `Some` only when every combination of a distinct x
/// and a distinct y is present exactly once, with at least two lines per axis.
pub fn infer_grid_shape(xs: &[f64], ys: &[f64], tolerance: f64) -> Option<GridShape> {
    if xs.len() != ys.len() || xs.is_empty() {
        return None;
    }

    let columns = lattice_lines(xs, tolerance)?;
    let rows = lattice_lines(ys, tolerance)?;
    let (cols, nrows) = (columns.len(), rows.len());
    if nrows < 2 || cols < 2 || nrows * cols != xs.len() {
        return None;
    }

    let mut seen = vec![false; nrows * cols];
    for (&x, &y) in xs.iter().zip(ys) {
        let ix = line_index(&columns, x);
        let iy = line_index(&rows, y);
        let node = &mut seen[iy * cols + ix];
        if *node {
            return None;
        }
        *node = true;
    }
    Some(GridShape::new(nrows, cols))
}

/// First coordinate of every lattice line, ascending.
fn lattice_lines(values: &[f64], tolerance: f64) -> Option<Vec<f64>> {
    if values.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let span = sorted[sorted.len() - 1] - sorted[0];
    let gap = tolerance.abs() * span;

    let mut lines = vec![sorted[0]];
    for &v in &sorted[1..] {
        if v - lines[lines.len() - 1] > gap {
            lines.push(v);
        }
    }
    Some(lines)
}

/// Index of the line `value` was grouped into: the last one starting at or
/// below it.
fn line_index(lines: &[f64], value: f64) -> usize {
    lines.partition_point(|&line| line <= value).saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lattice(nx: usize, ny: usize, dx: f64, dy: f64) -> (Vec<f64>, Vec<f64>) {
        let mut xs = Vec::with_capacity(nx * ny);
        let mut ys = Vec::with_capacity(nx * ny);
        for i in 0..nx {
            for j in 0..ny {
                xs.push(i as f64 * dx);
                ys.push(j as f64 * dy);
            }
        }
        (xs, ys)
    }

    #[test]
    fn test_solver_lattice() {
        // 70 x 80 cells -> 71 x 81 nodes
        let (xs, ys) = lattice(71, 81, 0.001, 0.001);
        assert_eq!(infer_grid_shape(&xs, &ys, 1e-6), Some(GridShape::new(81, 71)));
    }

    #[test]
    fn test_jitter_within_tolerance() {
        let (mut xs, ys) = lattice(4, 3, 1.0, 1.0);
        xs[5] += 1e-9;
        assert_eq!(infer_grid_shape(&xs, &ys, 1e-6), Some(GridShape::new(3, 4)));
        assert_eq!(infer_grid_shape(&xs, &ys, 0.0), None);
    }

    #[test]
    fn test_scattered_points_are_not_a_lattice() {
        let xs = [0.0, 1.0, 0.3, 0.7];
        let ys = [0.0, 0.2, 1.0, 0.6];
        assert_eq!(infer_grid_shape(&xs, &ys, 1e-6), None);
    }

    #[test]
    fn test_incomplete_or_single_line() {
        let (xs, ys) = lattice(3, 3, 1.0, 1.0);
        assert_eq!(infer_grid_shape(&xs[..8], &ys[..8], 1e-6), None);
        assert_eq!(infer_grid_shape(&[0.0, 1.0], &[5.0, 5.0], 1e-6), None);
        assert_eq!(infer_grid_shape(&[], &[], 1e-6), None);
    }

    #[test]
    fn test_duplicate_node_hiding_a_gap() {
        // Four lines per axis and 16 points, but (3, 3) is replaced by a
        // second (0, 0).
        let (mut xs, mut ys) = lattice(4, 4, 1.0, 1.0);
        assert_eq!(infer_grid_shape(&xs, &ys, 1e-6), Some(GridShape::new(4, 4)));
        let last = xs.len() - 1;
        xs[last] = 0.0;
        ys[last] = 0.0;
        assert_eq!(infer_grid_shape(&xs, &ys, 1e-6), None);
    }
}
