//! Clough-Tocher piecewise cubic interpolation.
//!
//! Each triangle is split at its centroid into three sub-triangles carrying
//! one cubic Bezier patch each. Vertex gradients are estimated from the
//! triangulation neighbours, and the cross-edge derivative is forced to be
//! linear along the line joining the centroids of adjacent triangles, which
//! makes the surface C1 across every edge.
//!
//! The interpolant passes through the samples and reproduces linear fields
//! exactly. It is not bounded by the sample range.

use field_common::MISSING;
use rayon::prelude::*;

use super::triangulation::{barycentric, Triangulation};

/// Bezier ordinates of one split triangle, in the triangle's vertex order.
#[derive(Debug, Clone, Copy)]
struct Patch {
    /// Ordinates along the edge opposite each vertex:
    /// `f(A), e(A,B), e(B,A), f(B)` with `A = k+1`, `B = k+2`.
    edge: [[f64; 4]; 3],
    /// Ordinate next to each vertex towards the centroid.
    near_vertex: [f64; 3],
    /// Interior ordinate of the sub-triangle opposite each vertex.
    near_edge: [f64; 3],
    /// Ordinate on each vertex-to-centroid split edge, next to the centroid.
    near_center: [f64; 3],
    center: f64,
}

/// A fitted Clough-Tocher interpolant over a triangulation.
#[derive(Debug, Clone)]
pub struct CloughTocher<'a> {
    triangulation: &'a Triangulation,
    patches: Vec<Patch>,
}

impl<'a> CloughTocher<'a> {
    /// Fit to `vertex_values`, indexed by triangulation vertex.
    pub fn new(triangulation: &'a Triangulation, vertex_values: &[f64]) -> Self {
        let gradients = estimate_gradients(triangulation, vertex_values);
        let patches = (0..triangulation.num_triangles())
            .into_par_iter()
            .map(|t| build_patch(triangulation, vertex_values, &gradients, t))
            .collect();
        Self {
            triangulation,
            patches,
        }
    }

    /// Interpolated value at `(x, y)`, [`MISSING`] outside the hull.
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        let Some((t, bary)) = self.triangulation.locate(x, y) else {
            return MISSING;
        };
        let patch = &self.patches[t];

        // The point lies in the sub-triangle opposite its smallest coordinate
        let k = (0..3)
            .min_by(|&i, &j| bary[i].total_cmp(&bary[j]))
            .unwrap_or(0);
        let (a, b) = ((k + 1) % 3, (k + 2) % 3);

        let la = bary[a] - bary[k];
        let lb = bary[b] - bary[k];
        let lc = 3.0 * bary[k];

        let [b0, b1, b2, b3] = patch.edge[k];
        b0 * la * la * la
            + 3.0 * b1 * la * la * lb
            + 3.0 * b2 * la * lb * lb
            + b3 * lb * lb * lb
            + 3.0 * patch.near_vertex[a] * la * la * lc
            + 6.0 * patch.near_edge[k] * la * lb * lc
            + 3.0 * patch.near_vertex[b] * lb * lb * lc
            + 3.0 * patch.near_center[a] * la * lc * lc
            + 3.0 * patch.near_center[b] * lb * lc * lc
            + patch.center * lc * lc * lc
    }

    /// Evaluate every query point in parallel, preserving order.
    pub fn evaluate_all(&self, query_xs: &[f64], query_ys: &[f64]) -> Vec<f64> {
        query_xs
            .par_iter()
            .zip(query_ys.par_iter())
            .map(|(&x, &y)| self.evaluate(x, y))
            .collect()
    }
}

/// Inverse-distance-squared weighted least-squares gradient at every vertex.
///
/// Exact when the data is linear. Falls back to a zero gradient if the
/// neighbourhood does not pin down both directions.
fn estimate_gradients(triangulation: &Triangulation, values: &[f64]) -> Vec<[f64; 2]> {
    let adjacency = triangulation.vertex_neighbors();
    adjacency
        .par_iter()
        .enumerate()
        .map(|(v, neighbors)| {
            let p = triangulation.unit_vertex(v);
            let (mut sxx, mut sxy, mut syy, mut bx, mut by) = (0.0, 0.0, 0.0, 0.0, 0.0);
            for &w in neighbors {
                let q = triangulation.unit_vertex(w);
                let (dx, dy) = (q[0] - p[0], q[1] - p[1]);
                let r2 = dx * dx + dy * dy;
                if r2 == 0.0 {
                    continue;
                }
                let weight = 1.0 / r2;
                let df = values[w] - values[v];
                sxx += weight * dx * dx;
                sxy += weight * dx * dy;
                syy += weight * dy * dy;
                bx += weight * dx * df;
                by += weight * dy * df;
            }

            let det = sxx * syy - sxy * sxy;
            let trace = sxx + syy;
            if !det.is_finite() || det.abs() <= 1e-12 * trace * trace {
                return [0.0, 0.0];
            }
            [(syy * bx - sxy * by) / det, (sxx * by - sxy * bx) / det]
        })
        .collect()
}

fn centroid(points: [[f64; 2]; 3]) -> [f64; 2] {
    [
        (points[0][0] + points[1][0] + points[2][0]) / 3.0,
        (points[0][1] + points[1][1] + points[2][1]) / 3.0,
    ]
}

fn build_patch(
    triangulation: &Triangulation,
    values: &[f64],
    gradients: &[[f64; 2]],
    t: usize,
) -> Patch {
    let tri = triangulation.triangles()[t];
    let p = tri.map(|v| triangulation.unit_vertex(v));
    let f = tri.map(|v| values[v]);
    let g = tri.map(|v| gradients[v]);
    let center_point = centroid(p);

    // Ordinate one third of the way from vertex i towards vertex j
    let e = |i: usize, j: usize| {
        f[i] + (g[i][0] * (p[j][0] - p[i][0]) + g[i][1] * (p[j][1] - p[i][1])) / 3.0
    };

    let mut edge = [[0.0; 4]; 3];
    let mut near_vertex = [0.0; 3];
    for i in 0..3 {
        let (a, b) = ((i + 1) % 3, (i + 2) % 3);
        edge[i] = [f[a], e(a, b), e(b, a), f[b]];
        near_vertex[i] = (f[i] + e(i, a) + e(i, b)) / 3.0;
    }

    let mut near_edge = [0.0; 3];
    for k in 0..3 {
        let (a, b) = ((k + 1) % 3, (k + 2) % 3);

        // Direction from the edge towards this centroid, in barycentric
        // coordinates of the sub-triangle (A, B, centroid)
        let delta = match triangulation.neighbors()[t][k] {
            Some(nb) => {
                let corners = triangulation.triangles()[nb].map(|v| triangulation.unit_vertex(v));
                let other = centroid(corners);
                let l = barycentric(p[a], p[b], center_point, other);
                [l[0], l[1], l[2] - 1.0]
            }
            None => [-0.5, -0.5, 1.0],
        };

        let [b0, b1, b2, b3] = edge[k];
        let d0 = delta[0] * b0 + delta[1] * b1 + delta[2] * near_vertex[a];
        let d2 = delta[0] * b2 + delta[1] * b3 + delta[2] * near_vertex[b];
        near_edge[k] = ((d0 + d2) / 2.0 - delta[0] * b1 - delta[1] * b2) / delta[2];
    }

    let mut near_center = [0.0; 3];
    for i in 0..3 {
        near_center[i] = (near_vertex[i] + near_edge[(i + 1) % 3] + near_edge[(i + 2) % 3]) / 3.0;
    }
    let center = (near_center[0] + near_center[1] + near_center[2]) / 3.0;

    Patch {
        edge,
        near_vertex,
        near_edge,
        near_center,
        center,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scattered() -> (Vec<f64>, Vec<f64>) {
        let xs = vec![0.0, 1.0, 1.0, 0.0, 0.3, 0.7, 0.55, 0.2, 0.85];
        let ys = vec![0.0, 0.0, 1.0, 1.0, 0.4, 0.3, 0.8, 0.75, 0.6];
        (xs, ys)
    }

    #[test]
    fn test_reproduces_linear_field() {
        let (xs, ys) = scattered();
        let values: Vec<f64> = xs.iter().zip(&ys).map(|(x, y)| 2.0 * x + 5.0 * y - 1.0).collect();
        let tri = Triangulation::new(&xs, &ys).unwrap();
        let vertex_values = tri.vertex_values(&values);
        let ct = CloughTocher::new(&tri, &vertex_values);

        for i in 0..=10 {
            for j in 0..=10 {
                let (x, y) = (i as f64 / 10.0, j as f64 / 10.0);
                let v = ct.evaluate(x, y);
                assert!(
                    (v - (2.0 * x + 5.0 * y - 1.0)).abs() < 1e-9,
                    "({}, {}) -> {}",
                    x,
                    y,
                    v
                );
            }
        }
    }

    #[test]
    fn test_passes_through_samples() {
        let (xs, ys) = scattered();
        let values: Vec<f64> = xs.iter().zip(&ys).map(|(x, y)| (3.0 * x).sin() * y * y).collect();
        let tri = Triangulation::new(&xs, &ys).unwrap();
        let vertex_values = tri.vertex_values(&values);
        let ct = CloughTocher::new(&tri, &vertex_values);

        for ((&x, &y), &expected) in xs.iter().zip(&ys).zip(&values) {
            assert!((ct.evaluate(x, y) - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_outside_hull_is_missing() {
        let tri = Triangulation::new(&[0.0, 1.0, 0.0], &[0.0, 0.0, 1.0]).unwrap();
        let ct = CloughTocher::new(&tri, &[1.0, 2.0, 3.0]);
        assert!(ct.evaluate(2.0, 2.0).is_nan());
        assert!(ct.evaluate(0.2, 0.2).is_finite());
    }

    #[test]
    fn test_gradients_exact_for_plane() {
        let (xs, ys) = scattered();
        let values: Vec<f64> = xs.iter().zip(&ys).map(|(x, y)| 4.0 * x - y).collect();
        let tri = Triangulation::new(&xs, &ys).unwrap();
        let gradients = estimate_gradients(&tri, &tri.vertex_values(&values));
        // unit box scale is 1 for this point set
        for g in gradients {
            assert!((g[0] - 4.0).abs() < 1e-9);
            assert!((g[1] + 1.0).abs() < 1e-9);
        }
    }
}
