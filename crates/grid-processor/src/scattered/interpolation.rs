//! Nearest-neighbour and piecewise-linear evaluation.

use field_common::MISSING;
use rayon::prelude::*;

use super::triangulation::Triangulation;

/// Value of the closest sample for every query point.
///
/// Defined everywhere, including outside the convex hull. Ties go to the
/// sample that comes first in the input.
pub fn nearest(
    xs: &[f64],
    ys: &[f64],
    values: &[f64],
    query_xs: &[f64],
    query_ys: &[f64],
) -> Vec<f64> {
    query_xs
        .par_iter()
        .zip(query_ys.par_iter())
        .map(|(&qx, &qy)| {
            let mut best = MISSING;
            let mut best_dist = f64::INFINITY;
            for ((&x, &y), &value) in xs.iter().zip(ys).zip(values) {
                let dist = (x - qx) * (x - qx) + (y - qy) * (y - qy);
                if dist < best_dist {
                    best_dist = dist;
                    best = value;
                }
            }
            best
        })
        .collect()
}

/// Barycentric interpolation inside the containing triangle.
///
/// `vertex_values` is indexed by triangulation vertex. Queries outside the
/// hull come back as [`MISSING`].
pub fn linear(
    triangulation: &Triangulation,
    vertex_values: &[f64],
    query_xs: &[f64],
    query_ys: &[f64],
) -> Vec<f64> {
    query_xs
        .par_iter()
        .zip(query_ys.par_iter())
        .map(|(&qx, &qy)| match triangulation.locate(qx, qy) {
            Some((t, bary)) => {
                let [a, b, c] = triangulation.triangles()[t];
                bary[0] * vertex_values[a] + bary[1] * vertex_values[b] + bary[2] * vertex_values[c]
            }
            None => MISSING,
        })
        .collect()
}
