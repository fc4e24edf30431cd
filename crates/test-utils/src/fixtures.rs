//! Common test fixtures for fieldview tests.
//!
//! Pre-defined sample sets and small data files that represent common
//! scenarios: solver output in either locale, noisy files, degenerate input.

use std::fs;
use std::path::{Path, PathBuf};

use crate::generators::{data_file_text, hot_spot_field, solver_lattice, vortex_field};

/// Solver domain used by the boiling runs.
pub mod solver {
    /// Cells along x and y; the lattice has one more node per axis.
    pub const CELLS: (usize, usize) = (70, 80);

    /// Node spacing in metres.
    pub const STEP: f64 = 0.001;

    /// Physical extent `(width, height)` in metres.
    pub const EXTENT: (f64, f64) = (0.07, 0.08);

    /// Upper clamp bound used for temperature plots.
    pub const CLAMP_MAX: f64 = 2000.0;
}

/// Small hand-written data files.
pub mod text {
    /// Three rows with a header, a blank line and a trailing note.
    pub const NOISY_SCALAR_PERIOD: &str = "\
x y T
0.00000 0.00000 3.00000E+002

0.00100 0.00000 3.10000E+002
0.00000 0.00100 3.20000E+002
done after 600 steps
";

    /// Same rows as [`NOISY_SCALAR_PERIOD`] written with a comma locale.
    pub const NOISY_SCALAR_COMMA: &str = "\
x y T
0,00000 0,00000 3,00000E+002

0,00100 0,00000 3,10000E+002
0,00000 0,00100 3,20000E+002
done after 600 steps
";

    /// Velocity rows, comma locale, CRLF line endings.
    pub const VELOCITY_COMMA_CRLF: &str =
        "0,00000 0,00000 1,00000E-003 0,00000E+000\r\n0,00100 0,00000 0,00000E+000 -2,50000E-003\r\n";

    /// A series file for line plots.
    pub const SERIES: &str = "0 1\n1 3\n2 2\n3 5\n";

    /// All points on one line.
    pub const COLLINEAR: &str = "0 0 1\n1 1 2\n2 2 3\n";
}

/// Write `contents` to `dir/name` and return the path.
///
/// Panics on I/O failure; this is test-only code.
pub fn write_data_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("Failed to write test data file");
    path
}

/// A solver-style temperature file on an `nx` by `ny` lattice.
pub fn write_temperature_file(
    dir: &Path,
    name: &str,
    nx: usize,
    ny: usize,
    comma: bool,
) -> PathBuf {
    let (xs, ys) = solver_lattice(nx, ny, solver::STEP, solver::STEP);
    let center = ((nx - 1) as f64 * solver::STEP / 2.0, (ny - 1) as f64 * solver::STEP / 4.0);
    let temps = hot_spot_field(&xs, &ys, center, 10.0 * solver::STEP, 900.0);
    write_data_file(dir, name, &data_file_text(&[&xs, &ys, &temps], comma))
}

/// A solver-style velocity file on an `nx` by `ny` lattice.
pub fn write_velocity_file(dir: &Path, name: &str, nx: usize, ny: usize, comma: bool) -> PathBuf {
    let (xs, ys) = solver_lattice(nx, ny, solver::STEP, solver::STEP);
    let center = ((nx - 1) as f64 * solver::STEP / 2.0, (ny - 1) as f64 * solver::STEP / 2.0);
    let (u, v) = vortex_field(&xs, &ys, center);
    write_data_file(dir, name, &data_file_text(&[&xs, &ys, &u, &v], comma))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::temp_test_dir;

    #[test]
    fn test_solver_extent_matches_cells() {
        let (cx, cy) = solver::CELLS;
        assert!((cx as f64 * solver::STEP - solver::EXTENT.0).abs() < 1e-12);
        assert!((cy as f64 * solver::STEP - solver::EXTENT.1).abs() < 1e-12);
    }

    #[test]
    fn test_write_temperature_file() {
        let dir = temp_test_dir();
        let path = write_temperature_file(dir.path(), "data.txt", 4, 3, true);
        let contents = fs::read_to_string(path).unwrap();
        assert_eq!(contents.lines().count(), 12);
        assert!(contents.starts_with("0,00000 0,00000 "));
    }
}
