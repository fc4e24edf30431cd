//! Line-oriented reading of whitespace-separated numeric rows.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::dataset::{Dataset, ScalarSamples, VectorSamples};
use crate::decimal::DecimalConvention;
use crate::error::{ReaderError, ReaderResult};

/// Read rows of exactly `arity` numeric fields into parallel columns.
///
/// Lines are split on runs of whitespace. Lines with a different field count
/// (blank lines, headers, trailing metadata) and lines that are not valid
/// UTF-8 are skipped without error. A
/// field that does not parse on a line of the right arity aborts the read with
/// [`ReaderError::Parse`].
pub fn read_rows<R: BufRead>(
    mut source: R,
    arity: usize,
    decimal: DecimalConvention,
) -> ReaderResult<Dataset> {
    if arity == 0 {
        return Err(ReaderError::InvalidArity(arity));
    }

    let mut dataset = Dataset::with_arity(arity);
    let mut row = Vec::with_capacity(arity);
    let mut buf = Vec::new();
    let mut line_number = 0usize;
    let mut skipped = 0usize;

    loop {
        buf.clear();
        if source.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_number += 1;

        // Headers from other code pages are noise like any other header line.
        let Ok(line) = std::str::from_utf8(&buf) else {
            skipped += 1;
            continue;
        };
        let text = if line_number == 1 {
            line.trim_start_matches('\u{feff}')
        } else {
            line
        };

        if text.split_whitespace().count() != arity {
            skipped += 1;
            continue;
        }

        row.clear();
        for (column, token) in text.split_whitespace().enumerate() {
            let value = decimal
                .parse_field(token)
                .ok_or_else(|| ReaderError::Parse {
                    line: line_number,
                    column: column + 1,
                    token: token.to_string(),
                })?;
            row.push(value);
        }
        dataset.push_row(&row);
    }

    debug!(
        arity,
        decimal = %decimal,
        rows = dataset.len(),
        skipped,
        "Read tabular rows"
    );

    Ok(dataset)
}

/// Read `x y` pairs in period notation, skipping lines that are not pairs.
pub fn read_pairs<R: BufRead>(source: R) -> ReaderResult<(Vec<f64>, Vec<f64>)> {
    let dataset = read_rows(source, 2, DecimalConvention::Period)?;
    let mut columns = dataset.into_columns().into_iter();
    let xs = columns.next().unwrap_or_default();
    let ys = columns.next().unwrap_or_default();
    Ok((xs, ys))
}

/// [`read_rows`] on a file. The file is closed on every return path.
pub fn read_rows_from_path(
    path: impl AsRef<Path>,
    arity: usize,
    decimal: DecimalConvention,
) -> ReaderResult<Dataset> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ReaderError::io(path, e))?;
    debug!(path = %path.display(), "Opened data file");
    read_rows(BufReader::new(file), arity, decimal)
}

/// [`read_pairs`] on a file.
pub fn read_pairs_from_path(path: impl AsRef<Path>) -> ReaderResult<(Vec<f64>, Vec<f64>)> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ReaderError::io(path, e))?;
    read_pairs(BufReader::new(file))
}

/// Read an `x y value` file.
pub fn read_scalar_field(
    path: impl AsRef<Path>,
    decimal: DecimalConvention,
) -> ReaderResult<ScalarSamples> {
    ScalarSamples::try_from(read_rows_from_path(path, 3, decimal)?)
}

/// Read an `x y u v` file.
pub fn read_vector_field(
    path: impl AsRef<Path>,
    decimal: DecimalConvention,
) -> ReaderResult<VectorSamples> {
    VectorSamples::try_from(read_rows_from_path(path, 4, decimal)?)
}
