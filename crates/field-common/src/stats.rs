//! Order statistics over numeric sequences.
//!
//! NaN entries are treated as missing data and ignored everywhere.

/// The `n`-th largest distinct finite value (1-based).
///
/// `nth_largest(seq, 1)` is the maximum, `nth_largest(seq, 2)` the second
/// largest distinct value, and so on. Returns `None` for `n == 0` or when the
/// sequence holds fewer than `n` distinct values.
pub fn nth_largest(seq: &[f64], n: usize) -> Option<f64> {
    let distinct = distinct_sorted(seq);
    if n == 0 || n > distinct.len() {
        return None;
    }
    Some(distinct[distinct.len() - n])
}

/// The `n`-th smallest distinct finite value (1-based).
pub fn nth_smallest(seq: &[f64], n: usize) -> Option<f64> {
    let distinct = distinct_sorted(seq);
    if n == 0 || n > distinct.len() {
        return None;
    }
    Some(distinct[n - 1])
}

/// Minimum and maximum of the non-NaN values.
pub fn finite_range(seq: &[f64]) -> Option<(f64, f64)> {
    seq.iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

fn distinct_sorted(seq: &[f64]) -> Vec<f64> {
    let mut values: Vec<f64> = seq.iter().copied().filter(|v| !v.is_nan()).collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    values
}
