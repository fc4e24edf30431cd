//! Delaunay triangulation of scattered 2D points.
//!
//! Incremental Bowyer-Watson insertion into a super-triangle. Points are
//! mapped onto the unit box before insertion so that the orientation and
//! in-circle predicates work on values of similar magnitude regardless of the
//! data units (solver output often spans a few centimetres).
//!
//! Triangles are stored counter-clockwise. `neighbors[t][k]` is the triangle
//! across the edge opposite vertex `k` of triangle `t`.

use std::collections::{BTreeSet, HashMap, HashSet};

use field_common::BoundingBox;
use tracing::{debug, warn};

use crate::error::{GridProcessorError, Result};

const NONE: usize = usize::MAX;

/// Half-size of the super-triangle in unit-box coordinates.
const SUPER_EXTENT: f64 = 1000.0;

/// Barycentric slack for point location, so hull edges count as inside.
const LOCATE_TOLERANCE: f64 = 1e-10;

/// Twice the signed area of `abc`; positive when counter-clockwise.
#[inline]
pub(crate) fn orient(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

/// Positive when `d` lies strictly inside the circumcircle of CCW `abc`.
#[inline]
fn in_circle(a: [f64; 2], b: [f64; 2], c: [f64; 2], d: [f64; 2]) -> f64 {
    let (adx, ady) = (a[0] - d[0], a[1] - d[1]);
    let (bdx, bdy) = (b[0] - d[0], b[1] - d[1]);
    let (cdx, cdy) = (c[0] - d[0], c[1] - d[1]);

    let ad = adx * adx + ady * ady;
    let bd = bdx * bdx + bdy * bdy;
    let cd = cdx * cdx + cdy * cdy;

    adx * (bdy * cd - bd * cdy) - ady * (bdx * cd - bd * cdx) + ad * (bdx * cdy - bdy * cdx)
}

/// Barycentric coordinates of `p` in CCW triangle `abc`.
#[inline]
pub(crate) fn barycentric(a: [f64; 2], b: [f64; 2], c: [f64; 2], p: [f64; 2]) -> [f64; 3] {
    let area = orient(a, b, c);
    let l0 = orient(p, b, c) / area;
    let l1 = orient(a, p, c) / area;
    [l0, l1, 1.0 - l0 - l1]
}

/// A Delaunay triangulation over the unique input points.
#[derive(Debug, Clone)]
pub struct Triangulation {
    /// Unique points in data coordinates.
    points: Vec<[f64; 2]>,
    /// Same points mapped onto the unit box.
    unit: Vec<[f64; 2]>,
    /// Input index each unique point was taken from.
    source: Vec<usize>,
    triangles: Vec<[usize; 3]>,
    neighbors: Vec<[Option<usize>; 3]>,
    origin: [f64; 2],
    scale: f64,
    locator: Locator,
}

impl Triangulation {
    /// Triangulate `(xs[i], ys[i])`.
    ///
    /// Exact duplicate points are dropped, the first occurrence wins. Fails
    /// with [`GridProcessorError::DegenerateInput`] when fewer than three
    /// unique points remain or all of them are collinear.
    pub fn new(xs: &[f64], ys: &[f64]) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(GridProcessorError::LengthMismatch {
                x: xs.len(),
                y: ys.len(),
                values: xs.len(),
            });
        }
        if xs.iter().chain(ys).any(|v| !v.is_finite()) {
            return Err(GridProcessorError::invalid_input(
                "point coordinates must be finite",
            ));
        }

        let bbox = BoundingBox::from_points(xs, ys)
            .ok_or_else(|| GridProcessorError::degenerate("no points to triangulate"))?;
        let scale = bbox.width().max(bbox.height());
        if scale <= 0.0 {
            return Err(GridProcessorError::degenerate("all points are identical"));
        }
        let origin = [bbox.min_x, bbox.min_y];

        let mut seen = HashSet::with_capacity(xs.len());
        let mut points = Vec::with_capacity(xs.len());
        let mut source = Vec::with_capacity(xs.len());
        for (i, (&x, &y)) in xs.iter().zip(ys).enumerate() {
            // +0.0 folds negative zero onto positive zero
            if seen.insert(((x + 0.0).to_bits(), (y + 0.0).to_bits())) {
                points.push([x, y]);
                source.push(i);
            }
        }
        let duplicates = xs.len() - points.len();
        if duplicates > 0 {
            warn!(duplicates, "Dropped duplicate sample points");
        }

        let unit: Vec<[f64; 2]> = points
            .iter()
            .map(|p| [(p[0] - origin[0]) / scale, (p[1] - origin[1]) / scale])
            .collect();

        check_not_collinear(&unit)?;

        let (triangles, neighbors) = bowyer_watson(&unit);
        if triangles.is_empty() {
            return Err(GridProcessorError::degenerate(
                "triangulation produced no triangles",
            ));
        }

        let locator = Locator::new(&unit, &triangles);

        debug!(
            points = points.len(),
            triangles = triangles.len(),
            "Built Delaunay triangulation"
        );

        Ok(Self {
            points,
            unit,
            source,
            triangles,
            neighbors,
            origin,
            scale,
            locator,
        })
    }

    /// Number of unique vertices.
    pub fn num_vertices(&self) -> usize {
        self.points.len()
    }

    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Counter-clockwise vertex triples.
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Triangle across the edge opposite each vertex, `None` on the hull.
    pub fn neighbors(&self) -> &[[Option<usize>; 3]] {
        &self.neighbors
    }

    /// Vertex position in data coordinates.
    pub fn vertex(&self, index: usize) -> (f64, f64) {
        let [x, y] = self.points[index];
        (x, y)
    }

    /// Pick the value of every vertex out of an input-aligned value slice.
    pub fn vertex_values(&self, values: &[f64]) -> Vec<f64> {
        self.source.iter().map(|&i| values[i]).collect()
    }

    /// Vertex position on the unit box.
    pub(crate) fn unit_vertex(&self, index: usize) -> [f64; 2] {
        self.unit[index]
    }

    pub(crate) fn to_unit(&self, x: f64, y: f64) -> [f64; 2] {
        [(x - self.origin[0]) / self.scale, (y - self.origin[1]) / self.scale]
    }

    /// Adjacent vertices of every vertex, sorted and without repeats.
    pub fn vertex_neighbors(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.points.len()];
        for tri in &self.triangles {
            for k in 0..3 {
                let (a, b) = (tri[k], tri[(k + 1) % 3]);
                adjacency[a].push(b);
                adjacency[b].push(a);
            }
        }
        for list in &mut adjacency {
            list.sort_unstable();
            list.dedup();
        }
        adjacency
    }

    /// Find the triangle containing `(x, y)` and its barycentric coordinates.
    ///
    /// Returns `None` outside the convex hull.
    pub fn locate(&self, x: f64, y: f64) -> Option<(usize, [f64; 3])> {
        let p = self.to_unit(x, y);
        self.locator.candidates(p)?.iter().find_map(|&t| {
            let [a, b, c] = self.triangles[t];
            let bary = barycentric(self.unit[a], self.unit[b], self.unit[c], p);
            if bary.iter().all(|&l| l >= -LOCATE_TOLERANCE) {
                Some((t, bary))
            } else {
                None
            }
        })
    }
}

fn check_not_collinear(unit: &[[f64; 2]]) -> Result<()> {
    if unit.len() < 3 {
        return Err(GridProcessorError::degenerate(format!(
            "need at least 3 unique points, got {}",
            unit.len()
        )));
    }

    let first = unit[0];
    let far = unit
        .iter()
        .copied()
        .max_by(|a, b| dist2(first, *a).total_cmp(&dist2(first, *b)))
        .unwrap_or(first);
    let spread = unit
        .iter()
        .map(|&p| orient(first, far, p).abs())
        .fold(0.0f64, f64::max);

    if spread <= 1e-12 {
        return Err(GridProcessorError::degenerate("all points are collinear"));
    }
    Ok(())
}

#[inline]
fn dist2(a: [f64; 2], b: [f64; 2]) -> f64 {
    let (dx, dy) = (a[0] - b[0], a[1] - b[1]);
    dx * dx + dy * dy
}

/// Working state of the incremental construction. Vertex `n..n+3` are the
/// super-triangle corners.
struct Builder {
    pts: Vec<[f64; 2]>,
    tris: Vec<[usize; 3]>,
    nbrs: Vec<[usize; 3]>,
    alive: Vec<bool>,
    last: usize,
}

fn bowyer_watson(unit: &[[f64; 2]]) -> (Vec<[usize; 3]>, Vec<[Option<usize>; 3]>) {
    let n = unit.len();
    let mut pts = unit.to_vec();
    pts.push([0.5 - 3.0 * SUPER_EXTENT, -SUPER_EXTENT]);
    pts.push([0.5 + 3.0 * SUPER_EXTENT, -SUPER_EXTENT]);
    pts.push([0.5, 3.0 * SUPER_EXTENT]);

    let mut builder = Builder {
        pts,
        tris: vec![[n, n + 1, n + 2]],
        nbrs: vec![[NONE; 3]],
        alive: vec![true],
        last: 0,
    };

    // x-sorted sweep keeps consecutive insertions close together
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        unit[a][0]
            .total_cmp(&unit[b][0])
            .then(unit[a][1].total_cmp(&unit[b][1]))
    });
    for p in order {
        builder.insert(p);
    }

    builder.finish(n)
}

impl Builder {
    fn insert(&mut self, p: usize) {
        let point = self.pts[p];
        let start = self.locate(point);

        // Cavity: every triangle whose circumcircle contains the point
        let mut in_cavity = BTreeSet::new();
        let mut stack = vec![start];
        in_cavity.insert(start);
        while let Some(t) = stack.pop() {
            for &nb in &self.nbrs[t] {
                if nb != NONE && !in_cavity.contains(&nb) && self.circumcircle_contains(nb, point) {
                    in_cavity.insert(nb);
                    stack.push(nb);
                }
            }
        }

        // The cavity must be star-shaped from the point; grow it across any
        // boundary edge the point does not strictly see.
        let boundary = loop {
            let mut boundary = Vec::new();
            let mut grow = None;
            for &t in &in_cavity {
                for k in 0..3 {
                    let nb = self.nbrs[t][k];
                    if nb != NONE && in_cavity.contains(&nb) {
                        continue;
                    }
                    let a = self.tris[t][(k + 1) % 3];
                    let b = self.tris[t][(k + 2) % 3];
                    if orient(self.pts[a], self.pts[b], point) <= 0.0 && nb != NONE {
                        grow = Some(nb);
                        break;
                    }
                    boundary.push((a, b, nb, t));
                }
                if grow.is_some() {
                    break;
                }
            }
            match grow {
                Some(nb) => {
                    in_cavity.insert(nb);
                }
                None => break boundary,
            }
        };

        for &t in &in_cavity {
            self.alive[t] = false;
        }

        // Fan of new triangles (a, b, p) over the cavity boundary
        let mut by_start = HashMap::with_capacity(boundary.len());
        let mut by_end = HashMap::with_capacity(boundary.len());
        let mut created = Vec::with_capacity(boundary.len());
        for &(a, b, outside, old) in &boundary {
            let t = self.tris.len();
            self.tris.push([a, b, p]);
            self.nbrs.push([NONE, NONE, outside]);
            self.alive.push(true);
            if outside != NONE {
                if let Some(slot) = self.nbrs[outside].iter_mut().find(|s| **s == old) {
                    *slot = t;
                }
            }
            by_start.insert(a, t);
            by_end.insert(b, t);
            created.push(t);
        }
        for &t in &created {
            let [a, b, _] = self.tris[t];
            // edge (b, p) is shared with the triangle starting at b,
            // edge (p, a) with the triangle ending at a
            self.nbrs[t][0] = by_start.get(&b).copied().unwrap_or(NONE);
            self.nbrs[t][1] = by_end.get(&a).copied().unwrap_or(NONE);
        }

        if let Some(&t) = created.last() {
            self.last = t;
        }
    }

    fn circumcircle_contains(&self, t: usize, point: [f64; 2]) -> bool {
        let [a, b, c] = self.tris[t];
        in_circle(self.pts[a], self.pts[b], self.pts[c], point) > 0.0
    }

    /// Visibility walk from the most recent triangle, with a linear scan as
    /// fallback if rounding sends the walk in circles.
    fn locate(&self, point: [f64; 2]) -> usize {
        let mut t = self.last;
        let max_steps = self.tris.len() + 16;

        'walk: for _ in 0..max_steps {
            let tri = self.tris[t];
            for k in 0..3 {
                let a = self.pts[tri[(k + 1) % 3]];
                let b = self.pts[tri[(k + 2) % 3]];
                let next = self.nbrs[t][k];
                if orient(a, b, point) < 0.0 && next != NONE {
                    t = next;
                    continue 'walk;
                }
            }
            return t;
        }

        (0..self.tris.len())
            .filter(|&t| self.alive[t])
            .max_by(|&s, &t| self.containment(s, point).total_cmp(&self.containment(t, point)))
            .unwrap_or(self.last)
    }

    /// Smallest barycentric coordinate of `point` in triangle `t`.
    fn containment(&self, t: usize, point: [f64; 2]) -> f64 {
        let [a, b, c] = self.tris[t];
        barycentric(self.pts[a], self.pts[b], self.pts[c], point)
            .into_iter()
            .fold(f64::INFINITY, f64::min)
    }

    /// Drop dead and super-triangle-touching triangles and renumber.
    fn finish(self, n: usize) -> (Vec<[usize; 3]>, Vec<[Option<usize>; 3]>) {
        let mut remap = vec![NONE; self.tris.len()];
        let mut triangles = Vec::new();
        for (t, tri) in self.tris.iter().enumerate() {
            if self.alive[t] && tri.iter().all(|&v| v < n) {
                remap[t] = triangles.len();
                triangles.push(*tri);
            }
        }

        let neighbors = self
            .tris
            .iter()
            .enumerate()
            .filter(|(t, _)| remap[*t] != NONE)
            .map(|(t, _)| {
                let mut out = [None; 3];
                for (slot, &nb) in out.iter_mut().zip(&self.nbrs[t]) {
                    if nb != NONE && remap[nb] != NONE {
                        *slot = Some(remap[nb]);
                    }
                }
                out
            })
            .collect();

        (triangles, neighbors)
    }
}

/// Uniform bucket grid over triangle bounding boxes on the unit box.
#[derive(Debug, Clone)]
struct Locator {
    min: [f64; 2],
    max: [f64; 2],
    cells_x: usize,
    cells_y: usize,
    cell_size: [f64; 2],
    buckets: Vec<Vec<usize>>,
}

impl Locator {
    fn new(unit: &[[f64; 2]], triangles: &[[usize; 3]]) -> Self {
        let mut min = [f64::INFINITY; 2];
        let mut max = [f64::NEG_INFINITY; 2];
        for p in unit {
            min = [min[0].min(p[0]), min[1].min(p[1])];
            max = [max[0].max(p[0]), max[1].max(p[1])];
        }

        let side = ((triangles.len() as f64 / 2.0).sqrt().ceil() as usize).clamp(1, 1024);
        let span = [(max[0] - min[0]).max(f64::EPSILON), (max[1] - min[1]).max(f64::EPSILON)];
        // Keep cells roughly square on elongated domains
        let (cells_x, cells_y) = if span[0] >= span[1] {
            (side, ((side as f64 * span[1] / span[0]).ceil() as usize).max(1))
        } else {
            (((side as f64 * span[0] / span[1]).ceil() as usize).max(1), side)
        };
        let cell_size = [span[0] / cells_x as f64, span[1] / cells_y as f64];

        let mut locator = Self {
            min,
            max,
            cells_x,
            cells_y,
            cell_size,
            buckets: vec![Vec::new(); cells_x * cells_y],
        };

        for (t, tri) in triangles.iter().enumerate() {
            let xs = tri.map(|v| unit[v][0]);
            let ys = tri.map(|v| unit[v][1]);
            let lo = locator.cell_of([
                xs.iter().copied().fold(f64::INFINITY, f64::min) - LOCATE_TOLERANCE,
                ys.iter().copied().fold(f64::INFINITY, f64::min) - LOCATE_TOLERANCE,
            ]);
            let hi = locator.cell_of([
                xs.iter().copied().fold(f64::NEG_INFINITY, f64::max) + LOCATE_TOLERANCE,
                ys.iter().copied().fold(f64::NEG_INFINITY, f64::max) + LOCATE_TOLERANCE,
            ]);
            for cy in lo.1..=hi.1 {
                for cx in lo.0..=hi.0 {
                    locator.buckets[cy * cells_x + cx].push(t);
                }
            }
        }

        locator
    }

    fn cell_of(&self, p: [f64; 2]) -> (usize, usize) {
        let cx = ((p[0] - self.min[0]) / self.cell_size[0]).floor();
        let cy = ((p[1] - self.min[1]) / self.cell_size[1]).floor();
        (
            (cx.max(0.0) as usize).min(self.cells_x - 1),
            (cy.max(0.0) as usize).min(self.cells_y - 1),
        )
    }

    fn candidates(&self, p: [f64; 2]) -> Option<&[usize]> {
        let slack = LOCATE_TOLERANCE;
        if !(p[0] >= self.min[0] - slack
            && p[0] <= self.max[0] + slack
            && p[1] >= self.min[1] - slack
            && p[1] <= self.max[1] + slack)
        {
            return None;
        }
        let (cx, cy) = self.cell_of(p);
        Some(&self.buckets[cy * self.cells_x + cx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> (Vec<f64>, Vec<f64>) {
        (vec![0.0, 1.0, 1.0, 0.0], vec![0.0, 0.0, 1.0, 1.0])
    }

    fn lattice(nx: usize, ny: usize) -> (Vec<f64>, Vec<f64>) {
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for j in 0..ny {
            for i in 0..nx {
                xs.push(i as f64 * 0.001);
                ys.push(j as f64 * 0.001);
            }
        }
        (xs, ys)
    }

    #[test]
    fn test_square_has_two_triangles() {
        let (xs, ys) = unit_square();
        let tri = Triangulation::new(&xs, &ys).unwrap();
        assert_eq!(tri.num_vertices(), 4);
        assert_eq!(tri.num_triangles(), 2);
    }

    #[test]
    fn test_triangles_are_counter_clockwise() {
        let (xs, ys) = lattice(6, 5);
        let tri = Triangulation::new(&xs, &ys).unwrap();
        for t in tri.triangles() {
            let [a, b, c] = t.map(|v| tri.unit_vertex(v));
            assert!(orient(a, b, c) > 0.0);
        }
    }

    #[test]
    fn test_lattice_triangle_count() {
        // A convex point set with h hull vertices has 2n - 2 - h triangles;
        // collinear hull points still count as hull vertices here.
        let (xs, ys) = lattice(5, 4);
        let tri = Triangulation::new(&xs, &ys).unwrap();
        let n = 20;
        let h = 2 * (5 + 4) - 4;
        assert_eq!(tri.num_triangles(), 2 * n - 2 - h);
    }

    #[test]
    fn test_neighbors_are_symmetric() {
        let (xs, ys) = lattice(7, 7);
        let tri = Triangulation::new(&xs, &ys).unwrap();
        for (t, nbrs) in tri.neighbors().iter().enumerate() {
            for nb in nbrs.iter().flatten() {
                assert!(tri.neighbors()[*nb].contains(&Some(t)));
            }
        }
    }

    #[test]
    fn test_duplicates_first_occurrence_wins() {
        let xs = [0.0, 1.0, 0.0, 0.0, -0.0];
        let ys = [0.0, 0.0, 1.0, 0.0, 0.0];
        let tri = Triangulation::new(&xs, &ys).unwrap();
        assert_eq!(tri.num_vertices(), 3);
        assert_eq!(tri.vertex_values(&[1.0, 2.0, 3.0, 9.0, 9.0]), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(matches!(
            Triangulation::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0]),
            Err(GridProcessorError::DegenerateInput(_))
        ));
        assert!(matches!(
            Triangulation::new(&[0.0, 1.0, 0.0], &[0.0, 1.0, 0.0]),
            Err(GridProcessorError::DegenerateInput(_))
        ));
        assert!(matches!(
            Triangulation::new(&[1.0, 1.0], &[2.0, 2.0]),
            Err(GridProcessorError::DegenerateInput(_))
        ));
        assert!(matches!(
            Triangulation::new(&[0.0, f64::NAN, 1.0], &[0.0, 1.0, 1.0]),
            Err(GridProcessorError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_locate_inside_and_outside() {
        let xs = [0.0, 2.0, 0.0];
        let ys = [0.0, 0.0, 2.0];
        let tri = Triangulation::new(&xs, &ys).unwrap();

        let (_, bary) = tri.locate(0.5, 0.5).unwrap();
        assert!((bary.iter().sum::<f64>() - 1.0).abs() < 1e-12);

        // corners and edges of the hull are inside
        assert!(tri.locate(0.0, 0.0).is_some());
        assert!(tri.locate(2.0, 0.0).is_some());
        assert!(tri.locate(1.0, 1.0).is_some());

        assert!(tri.locate(1.5, 1.5).is_none());
        assert!(tri.locate(-1.0, 0.5).is_none());
    }

    #[test]
    fn test_vertex_neighbors_of_square() {
        let (xs, ys) = unit_square();
        let tri = Triangulation::new(&xs, &ys).unwrap();
        let adjacency = tri.vertex_neighbors();
        let degrees: usize = adjacency.iter().map(Vec::len).sum();
        // 4 hull edges plus one diagonal, counted from both ends
        assert_eq!(degrees, 10);
    }
}
