//! Test data generators for synthetic solver-like fields.
//!
//! These generators create predictable, verifiable sample sets and the text
//! of data files in the layout the solver writes (`x y value` or
//! `x y u v`, one node per line).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Node coordinates of a regular `nx` by `ny` lattice.
///
/// Nodes are emitted column by column (x outer, y inner), the order the
/// solver writes them in.
///
/// # Example
///
/// ```
/// use test_utils::solver_lattice;
///
/// let (xs, ys) = solver_lattice(3, 2, 0.5, 1.0);
/// assert_eq!(xs, vec![0.0, 0.0, 0.5, 0.5, 1.0, 1.0]);
/// assert_eq!(ys, vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
/// ```
pub fn solver_lattice(nx: usize, ny: usize, dx: f64, dy: f64) -> (Vec<f64>, Vec<f64>) {
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

/// `n` uniformly random points inside `[min_x, max_x] x [min_y, max_y]`.
///
/// The four corners are always included so the convex hull of the samples is
/// the full rectangle. Deterministic for a given `seed`.
pub fn scattered_points(
    n: usize,
    (min_x, min_y, max_x, max_y): (f64, f64, f64, f64),
    seed: u64,
) -> (Vec<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut xs = vec![min_x, max_x, max_x, min_x];
    let mut ys = vec![min_y, min_y, max_y, max_y];
    for _ in 4..n.max(4) {
        xs.push(rng.gen_range(min_x..max_x));
        ys.push(rng.gen_range(min_y..max_y));
    }
    (xs, ys)
}

/// `a*x + b*y + c` at every point.
pub fn linear_field(xs: &[f64], ys: &[f64], a: f64, b: f64, c: f64) -> Vec<f64> {
    xs.iter().zip(ys).map(|(x, y)| a * x + b * y + c).collect()
}

/// Temperature-like values in Kelvin: a 300K base with a Gaussian hot spot of
/// `peak` Kelvin above it, centred at `(cx, cy)` with radius `sigma`.
pub fn hot_spot_field(
    xs: &[f64],
    ys: &[f64],
    (cx, cy): (f64, f64),
    sigma: f64,
    peak: f64,
) -> Vec<f64> {
    xs.iter()
        .zip(ys)
        .map(|(x, y)| {
            let r2 = (x - cx).powi(2) + (y - cy).powi(2);
            300.0 + peak * (-r2 / (2.0 * sigma * sigma)).exp()
        })
        .collect()
}

/// Solid-body rotation about `(cx, cy)`: `u = -(y - cy)`, `v = x - cx`.
pub fn vortex_field(xs: &[f64], ys: &[f64], (cx, cy): (f64, f64)) -> (Vec<f64>, Vec<f64>) {
    let u = ys.iter().map(|y| -(y - cy)).collect();
    let v = xs.iter().map(|x| x - cx).collect();
    (u, v)
}

/// Format like the solver's `E5` output: five mantissa digits, signed
/// three-digit exponent (`3.00000E+002`).
pub fn format_scientific(value: f64) -> String {
    let formatted = format!("{:.5E}", value);
    match formatted.split_once('E') {
        Some((mantissa, exponent)) => {
            let exp: i32 = exponent.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}E{}{:03}", mantissa, sign, exp.abs())
        }
        None => formatted,
    }
}

/// Text of a data file with one line per row of the given columns.
///
/// Coordinates use `F5`, values `E5`. With `comma` set every decimal point is
/// written as a comma, as a machine with a comma locale would.
pub fn data_file_text(columns: &[&[f64]], comma: bool) -> String {
    let rows = columns.iter().map(|c| c.len()).min().unwrap_or(0);
    let mut text = String::new();
    for row in 0..rows {
        let fields: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(col, values)| {
                let field = if col < 2 {
                    format!("{:.5}", values[row])
                } else {
                    format_scientific(values[row])
                };
                if comma {
                    field.replace('.', ",")
                } else {
                    field
                }
            })
            .collect();
        text.push_str(&fields.join(" "));
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scattered_points_include_corners() {
        let (xs, ys) = scattered_points(50, (0.0, 0.0, 2.0, 1.0), 7);
        assert_eq!(xs.len(), 50);
        assert_eq!((xs[2], ys[2]), (2.0, 1.0));
        assert!(xs.iter().all(|x| (0.0..=2.0).contains(x)));
        assert!(ys.iter().all(|y| (0.0..=1.0).contains(y)));

        let again = scattered_points(50, (0.0, 0.0, 2.0, 1.0), 7);
        assert_eq!(xs, again.0);
    }

    #[test]
    fn test_format_scientific() {
        assert_eq!(format_scientific(300.0), "3.00000E+002");
        assert_eq!(format_scientific(0.0125), "1.25000E-002");
        assert_eq!(format_scientific(-4.0), "-4.00000E+000");
    }

    #[test]
    fn test_data_file_text_comma() {
        let text = data_file_text(&[&[0.01], &[0.02], &[300.0]], true);
        assert_eq!(text, "0,01000 0,02000 3,00000E+002\n");
    }

    #[test]
    fn test_vortex_field() {
        let (u, v) = vortex_field(&[1.0, 0.0], &[0.0, 1.0], (0.0, 0.0));
        assert_eq!(u, vec![-0.0, -1.0]);
        assert_eq!(v, vec![1.0, 0.0]);
    }
}
