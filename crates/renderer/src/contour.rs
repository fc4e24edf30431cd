//! Contour line (isoline) extraction using the marching squares algorithm.
//!
//! Segments are produced in fractional grid-index space and mapped to data
//! coordinates through the mesh axes, so the figure can draw them with the
//! same transform as every other layer.

use field_common::GridView;

use crate::gradient::GridSampler;

/// A point in 2D space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A line segment between two points
#[derive(Debug, Clone)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

/// A complete contour line (polyline)
#[derive(Debug, Clone)]
pub struct Contour {
    pub level: f64,
    pub points: Vec<Point>,
    pub closed: bool,
}

/// Tolerance for joining segment endpoints, in grid cells.
const JOIN_EPSILON: f64 = 1e-6;

/// Levels at every multiple of `interval` inside `[min_value, max_value]`.
pub fn generate_contour_levels(min_value: f64, max_value: f64, interval: f64) -> Vec<f64> {
    if !(interval > 0.0)
        || !(max_value >= min_value)
        || !min_value.is_finite()
        || !max_value.is_finite()
    {
        return vec![];
    }

    // Multiples are computed from an integer counter so they do not drift.
    let first = (min_value / interval - 1e-9).ceil() as i64;
    let last = (max_value / interval + 1e-9).floor() as i64;
    (first..=last).map(|k| k as f64 * interval).collect()
}

/// Marching squares algorithm to generate contour segments
///
/// `data` is row-major with `width` columns and `height` rows. Cells with a
/// missing corner are skipped. Points are in fractional index space
/// (`x` = column, `y` = row).
pub fn march_squares(data: &[f64], width: usize, height: usize, level: f64) -> Vec<Segment> {
    if width < 2 || height < 2 || data.len() != width * height {
        return vec![];
    }

    let mut segments = Vec::new();

    for y in 0..(height - 1) {
        for x in 0..(width - 1) {
            let tl = data[y * width + x];
            let tr = data[y * width + x + 1];
            let bl = data[(y + 1) * width + x];
            let br = data[(y + 1) * width + x + 1];

            if tl.is_nan() || tr.is_nan() || bl.is_nan() || br.is_nan() {
                continue;
            }

            let mut cell_index = 0u8;
            if tl >= level { cell_index |= 1; }
            if tr >= level { cell_index |= 2; }
            if br >= level { cell_index |= 4; }
            if bl >= level { cell_index |= 8; }

            let corners = CellCorners { tl, tr, br, bl };
            segments.extend(cell_segments(cell_index, x as f64, y as f64, &corners, level));
        }
    }

    segments
}

struct CellCorners {
    tl: f64,
    tr: f64,
    br: f64,
    bl: f64,
}

/// Line segments for one marching squares cell.
///
/// Saddles are resolved with the cell mean.
fn cell_segments(cell_index: u8, x: f64, y: f64, c: &CellCorners, level: f64) -> Vec<Segment> {
    let top = interpolate_edge(x, y, x + 1.0, y, c.tl, c.tr, level);
    let right = interpolate_edge(x + 1.0, y, x + 1.0, y + 1.0, c.tr, c.br, level);
    let bottom = interpolate_edge(x, y + 1.0, x + 1.0, y + 1.0, c.bl, c.br, level);
    let left = interpolate_edge(x, y, x, y + 1.0, c.tl, c.bl, level);
    let center_above = (c.tl + c.tr + c.br + c.bl) / 4.0 >= level;

    let seg = |start, end| Segment { start, end };
    match cell_index {
        0 | 15 => vec![],
        1 | 14 => vec![seg(left, top)],
        2 | 13 => vec![seg(top, right)],
        3 | 12 => vec![seg(left, right)],
        4 | 11 => vec![seg(right, bottom)],
        6 | 9 => vec![seg(top, bottom)],
        7 | 8 => vec![seg(left, bottom)],
        5 if center_above => vec![seg(left, bottom), seg(top, right)],
        5 => vec![seg(left, top), seg(right, bottom)],
        10 if center_above => vec![seg(left, top), seg(right, bottom)],
        10 => vec![seg(top, right), seg(left, bottom)],
        _ => vec![],
    }
}

/// Linearly interpolate between two edge points based on data values
fn interpolate_edge(x1: f64, y1: f64, x2: f64, y2: f64, val1: f64, val2: f64, level: f64) -> Point {
    if (val2 - val1).abs() < f64::EPSILON {
        return Point::new((x1 + x2) / 2.0, (y1 + y2) / 2.0);
    }

    let t = ((level - val1) / (val2 - val1)).clamp(0.0, 1.0);
    Point::new(x1 + t * (x2 - x1), y1 + t * (y2 - y1))
}

/// Connect line segments into continuous polylines
///
/// Each polyline is grown from both ends until no unused segment touches
/// either end.
pub fn connect_segments(segments: Vec<Segment>) -> Vec<Contour> {
    let mut contours = Vec::new();
    let mut used = vec![false; segments.len()];

    let find_next = |used: &[bool], point: &Point| {
        segments.iter().enumerate().find_map(|(i, seg)| {
            if used[i] {
                None
            } else if seg.start.distance(point) < JOIN_EPSILON {
                Some((i, seg.end))
            } else if seg.end.distance(point) < JOIN_EPSILON {
                Some((i, seg.start))
            } else {
                None
            }
        })
    };

    for start_idx in 0..segments.len() {
        if used[start_idx] {
            continue;
        }
        used[start_idx] = true;

        let mut forward = vec![segments[start_idx].start, segments[start_idx].end];
        while let Some(tail) = forward.last().copied() {
            match find_next(&used, &tail) {
                Some((i, next)) => {
                    used[i] = true;
                    forward.push(next);
                }
                None => break,
            }
        }

        let mut backward = Vec::new();
        let mut head = forward[0];
        let closed_forward =
            forward.len() > 2 && head.distance(&forward[forward.len() - 1]) < JOIN_EPSILON;
        if !closed_forward {
            while let Some((i, next)) = find_next(&used, &head) {
                used[i] = true;
                backward.push(next);
                head = next;
            }
        }

        backward.reverse();
        backward.extend(forward);
        let mut points = backward;

        let closed =
            points.len() > 2 && points[0].distance(&points[points.len() - 1]) < JOIN_EPSILON;
        if closed {
            points.pop();
        }

        if points.len() >= 2 {
            contours.push(Contour {
                level: 0.0,
                points,
                closed,
            });
        }
    }

    contours
}

/// Apply Chaikin's corner cutting algorithm for smoothing
pub fn smooth_contour(contour: &Contour, iterations: u32) -> Contour {
    if iterations == 0 || contour.points.len() < 3 {
        return contour.clone();
    }

    let mut points = contour.points.clone();

    for _ in 0..iterations {
        let n = points.len();
        let pairs = if contour.closed { n } else { n - 1 };
        let mut new_points = Vec::with_capacity(pairs * 2 + 2);

        if !contour.closed {
            new_points.push(points[0]);
        }
        for i in 0..pairs {
            let p1 = points[i];
            let p2 = points[(i + 1) % n];
            new_points.push(Point::new(0.75 * p1.x + 0.25 * p2.x, 0.75 * p1.y + 0.25 * p2.y));
            new_points.push(Point::new(0.25 * p1.x + 0.75 * p2.x, 0.25 * p1.y + 0.75 * p2.y));
        }
        if !contour.closed {
            new_points.push(points[n - 1]);
        }

        points = new_points;
    }

    Contour {
        level: contour.level,
        points,
        closed: contour.closed,
    }
}

/// Extract isolines for every level from a mesh, in data coordinates.
pub fn generate_isolines(
    grid: GridView<'_>,
    levels: &[f64],
    smoothing_passes: u32,
) -> Vec<Contour> {
    if !grid.is_consistent() {
        return vec![];
    }
    let sampler = GridSampler::new(grid);

    let mut all_contours = Vec::new();
    for &level in levels {
        let segments = march_squares(grid.values, grid.cols, grid.rows, level);
        for mut contour in connect_segments(segments) {
            contour.level = level;
            let mut contour = smooth_contour(&contour, smoothing_passes);
            for point in &mut contour.points {
                let (x, y) = sampler.coordinates(point.x, point.y);
                *point = Point::new(x, y);
            }
            all_contours.push(contour);
        }
    }

    tracing::debug!(
        levels = levels.len(),
        contours = all_contours.len(),
        total_points = all_contours.iter().map(|c| c.points.len()).sum::<usize>(),
        "Generated isolines"
    );

    all_contours
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_contour_levels() {
        let levels = generate_contour_levels(0.0, 20.0, 5.0);
        assert_eq!(levels, vec![0.0, 5.0, 10.0, 15.0, 20.0]);

        let levels = generate_contour_levels(2.0, 18.0, 5.0);
        assert_eq!(levels, vec![5.0, 10.0, 15.0]);
    }

    #[test]
    fn test_interpolate_edge() {
        let p = interpolate_edge(0.0, 0.0, 1.0, 0.0, 0.0, 10.0, 5.0);
        assert!((p.x - 0.5).abs() < 1e-12);
        assert!(p.y.abs() < 1e-12);
    }

    #[test]
    fn test_march_squares_flat() {
        let data = vec![5.0; 9];
        let segments = march_squares(&data, 3, 3, 6.0);
        assert_eq!(segments.len(), 0);
    }

    #[test]
    fn test_march_squares_simple() {
        let data = vec![
            0.0, 0.0, 0.0,
            0.0, 10.0, 0.0,
            0.0, 0.0, 0.0,
        ];
        let segments = march_squares(&data, 3, 3, 5.0);
        assert_eq!(segments.len(), 4);
    }

    #[test]
    fn test_peak_forms_closed_ring() {
        let data = vec![
            0.0, 0.0, 0.0,
            0.0, 10.0, 0.0,
            0.0, 0.0, 0.0,
        ];
        let contours = connect_segments(march_squares(&data, 3, 3, 5.0));
        assert_eq!(contours.len(), 1);
        assert!(contours[0].closed);
        assert_eq!(contours[0].points.len(), 4);
    }

    #[test]
    fn test_missing_cells_are_skipped() {
        let data = vec![
            0.0, 10.0,
            f64::NAN, 10.0,
        ];
        assert!(march_squares(&data, 2, 2, 5.0).is_empty());
    }

    #[test]
    fn test_smooth_open_contour_keeps_endpoints() {
        let contour = Contour {
            level: 1.0,
            points: vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 0.0)],
            closed: false,
        };
        let smoothed = smooth_contour(&contour, 2);
        assert_eq!(smoothed.points.first(), Some(&Point::new(0.0, 0.0)));
        assert_eq!(smoothed.points.last(), Some(&Point::new(2.0, 0.0)));
        assert!(smoothed.points.len() > contour.points.len());
    }
}
