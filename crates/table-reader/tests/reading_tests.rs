//! Reading solver-style data files from disk.

use table_reader::{
    read_pairs_from_path, read_rows_from_path, read_scalar_field, read_vector_field,
    DecimalConvention, ReaderError,
};
use test_utils::{
    assert_approx_eq, assert_coords_approx_eq, require_test_file, solver, temp_test_dir, text,
    write_data_file, write_temperature_file, write_velocity_file,
};

// ============================================================================
// Scalar fields
// ============================================================================

#[test]
fn test_noisy_files_read_the_same_in_both_locales() {
    let dir = temp_test_dir();
    let period = write_data_file(dir.path(), "period.txt", text::NOISY_SCALAR_PERIOD);
    let comma = write_data_file(dir.path(), "comma.txt", text::NOISY_SCALAR_COMMA);

    let a = read_scalar_field(&period, DecimalConvention::Period).unwrap();
    let b = read_scalar_field(&comma, DecimalConvention::Comma).unwrap();

    assert_eq!(a, b);
    assert_eq!(a.len(), 3);
    assert_eq!(a.x, vec![0.0, 0.001, 0.0]);
    assert_eq!(a.y, vec![0.0, 0.0, 0.001]);
    assert_eq!(a.value, vec![300.0, 310.0, 320.0]);
}

#[test]
fn test_cp1251_header_is_skipped() {
    let dir = temp_test_dir();
    let path = dir.path().join("cp1251.txt");
    // "Температура" in cp1251, then two comma-decimal rows
    let mut bytes = vec![
        0xD2, 0xE5, 0xEC, 0xEF, 0xE5, 0xF0, 0xE0, 0xF2, 0xF3, 0xF0, 0xE0, b'\r', b'\n',
    ];
    bytes.extend_from_slice(b"0,0 0,0 300,0\r\n0,001 0,0 310,5\r\n");
    std::fs::write(&path, bytes).unwrap();

    let samples = read_scalar_field(&path, DecimalConvention::Comma).unwrap();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples.value, vec![300.0, 310.5]);
}

#[test]
fn test_solver_temperature_file() {
    let dir = temp_test_dir();
    let (cx, cy) = solver::CELLS;
    let (nx, ny) = (cx + 1, cy + 1);
    let path = write_temperature_file(dir.path(), "Temperature.txt", nx, ny, true);

    let samples = read_scalar_field(&path, DecimalConvention::Comma).unwrap();
    assert_eq!(samples.len(), nx * ny);

    let max_x = samples.x.iter().cloned().fold(f64::MIN, f64::max);
    let max_y = samples.y.iter().cloned().fold(f64::MIN, f64::max);
    assert_approx_eq!(max_x, solver::EXTENT.0, 1e-9);
    assert_approx_eq!(max_y, solver::EXTENT.1, 1e-9);
    assert!(samples.value.iter().all(|t| *t >= 300.0 && *t <= 1200.0 + 1e-6));

    // Nodes are written x-major
    assert_coords_approx_eq!((samples.x[1], samples.y[1]), (0.0, solver::STEP), 1e-12);
    assert_coords_approx_eq!((samples.x[ny], samples.y[ny]), (solver::STEP, 0.0), 1e-12);
}

#[test]
fn test_real_solver_output() {
    let path = require_test_file!("data600.txt");

    let samples = read_scalar_field(&path, DecimalConvention::Comma).unwrap();
    assert!(!samples.is_empty());
    assert!(samples.value.iter().all(|t| t.is_finite()));
}

#[test]
fn test_wrong_convention_reports_first_field() {
    let dir = temp_test_dir();
    let path = write_temperature_file(dir.path(), "comma.txt", 3, 3, true);

    match read_scalar_field(&path, DecimalConvention::Period).unwrap_err() {
        ReaderError::Parse { line, column, token } => {
            assert_eq!(line, 1);
            assert_eq!(column, 1);
            assert_eq!(token, "0,00000");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_file_with_other_arity_yields_no_samples() {
    let dir = temp_test_dir();
    let path = write_velocity_file(dir.path(), "Velocity.txt", 4, 4, false);

    let samples = read_scalar_field(&path, DecimalConvention::Period).unwrap();
    assert!(samples.is_empty());
}

// ============================================================================
// Vector fields and series
// ============================================================================

#[test]
fn test_velocity_with_crlf_line_endings() {
    let dir = temp_test_dir();
    let path = write_data_file(dir.path(), "velocity.txt", text::VELOCITY_COMMA_CRLF);

    let samples = read_vector_field(&path, DecimalConvention::Comma).unwrap();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples.u, vec![0.001, 0.0]);
    assert_eq!(samples.v, vec![0.0, -0.0025]);
    assert_approx_eq!(samples.u[1].hypot(samples.v[1]), 0.0025, 1e-15);
}

#[test]
fn test_vortex_velocity_file() {
    let dir = temp_test_dir();
    let path = write_velocity_file(dir.path(), "Velocity.txt", 5, 5, true);

    let samples = read_vector_field(&path, DecimalConvention::Comma).unwrap();
    assert_eq!(samples.len(), 25);
    // Solid-body rotation: the centre node is at rest
    let centre = samples
        .x
        .iter()
        .zip(&samples.y)
        .position(|(x, y)| (x - 0.002).abs() < 1e-12 && (y - 0.002).abs() < 1e-12)
        .unwrap();
    assert_eq!((samples.u[centre], samples.v[centre]), (0.0, 0.0));
}

#[test]
fn test_series_pairs() {
    let dir = temp_test_dir();
    let path = write_data_file(dir.path(), "series.txt", text::SERIES);

    let (xs, ys) = read_pairs_from_path(&path).unwrap();
    assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0]);
    assert_eq!(ys, vec![1.0, 3.0, 2.0, 5.0]);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_file_reports_path() {
    let dir = temp_test_dir();
    let path = dir.path().join("does-not-exist.txt");

    let err = read_rows_from_path(&path, 3, DecimalConvention::Period).unwrap_err();
    match &err {
        ReaderError::Io { path: reported, source } => {
            assert_eq!(reported, &path);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.to_string().contains("does-not-exist.txt"));

    assert!(matches!(read_pairs_from_path(&path), Err(ReaderError::Io { .. })));
}
