//! Scattered-data interpolation onto arbitrary query points.
//!
//! [`ScatteredInterpolator`] is the seam the grid adapter calls through;
//! [`DelaunayInterpolator`] is the built-in implementation.

mod cubic;
mod interpolation;
mod triangulation;

pub use cubic::CloughTocher;
pub use interpolation::{linear, nearest};
pub use triangulation::Triangulation;

use tracing::debug;

use crate::error::{GridProcessorError, Result};
use crate::types::InterpolationMethod;

/// Index-aligned sample coordinates and values.
#[derive(Debug, Clone, Copy)]
pub struct Samples<'a> {
    pub xs: &'a [f64],
    pub ys: &'a [f64],
    pub values: &'a [f64],
}

impl<'a> Samples<'a> {
    pub fn new(xs: &'a [f64], ys: &'a [f64], values: &'a [f64]) -> Self {
        Self { xs, ys, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn check_lengths(&self) -> Result<()> {
        if self.xs.len() != self.ys.len() || self.xs.len() != self.values.len() {
            return Err(GridProcessorError::LengthMismatch {
                x: self.xs.len(),
                y: self.ys.len(),
                values: self.values.len(),
            });
        }
        Ok(())
    }
}

/// Interpolates scattered samples at query points.
///
/// The result has one entry per query point, in query order. For methods
/// that do not extrapolate, queries outside the convex hull of the samples
/// are NaN.
pub trait ScatteredInterpolator: Send + Sync {
    fn interpolate(
        &self,
        samples: Samples<'_>,
        query_xs: &[f64],
        query_ys: &[f64],
        method: InterpolationMethod,
    ) -> Result<Vec<f64>>;
}

/// Interpolation over a Delaunay triangulation of the samples.
///
/// `nearest` needs no triangulation and therefore also accepts collinear
/// samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelaunayInterpolator;

impl DelaunayInterpolator {
    pub fn new() -> Self {
        Self
    }
}

impl ScatteredInterpolator for DelaunayInterpolator {
    fn interpolate(
        &self,
        samples: Samples<'_>,
        query_xs: &[f64],
        query_ys: &[f64],
        method: InterpolationMethod,
    ) -> Result<Vec<f64>> {
        samples.check_lengths()?;
        if query_xs.len() != query_ys.len() {
            return Err(GridProcessorError::invalid_input(format!(
                "query coordinate lengths differ: {} x, {} y",
                query_xs.len(),
                query_ys.len()
            )));
        }
        if samples.is_empty() {
            return Err(GridProcessorError::degenerate("no samples to interpolate"));
        }

        let values = match method {
            InterpolationMethod::Nearest => nearest(
                samples.xs,
                samples.ys,
                samples.values,
                query_xs,
                query_ys,
            ),
            InterpolationMethod::Linear => {
                let triangulation = Triangulation::new(samples.xs, samples.ys)?;
                let vertex_values = triangulation.vertex_values(samples.values);
                linear(&triangulation, &vertex_values, query_xs, query_ys)
            }
            InterpolationMethod::Cubic => {
                let triangulation = Triangulation::new(samples.xs, samples.ys)?;
                let vertex_values = triangulation.vertex_values(samples.values);
                CloughTocher::new(&triangulation, &vertex_values).evaluate_all(query_xs, query_ys)
            }
        };

        debug!(
            method = %method,
            samples = samples.len(),
            queries = query_xs.len(),
            "Interpolated scattered samples"
        );

        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_methods_agree_at_sample_points() {
        let xs = [0.0, 1.0, 1.0, 0.0, 0.5];
        let ys = [0.0, 0.0, 1.0, 1.0, 0.5];
        let values = [1.0, 2.0, 3.0, 4.0, 10.0];
        let samples = Samples::new(&xs, &ys, &values);

        for method in [
            InterpolationMethod::Nearest,
            InterpolationMethod::Linear,
            InterpolationMethod::Cubic,
        ] {
            let out = DelaunayInterpolator
                .interpolate(samples, &xs, &ys, method)
                .unwrap();
            for (got, want) in out.iter().zip(&values) {
                assert!((got - want).abs() < 1e-9, "{}: {} vs {}", method, got, want);
            }
        }
    }

    #[test]
    fn test_length_mismatch() {
        let samples = Samples::new(&[0.0, 1.0], &[0.0], &[1.0, 2.0]);
        let err = DelaunayInterpolator
            .interpolate(samples, &[0.0], &[0.0], InterpolationMethod::Linear)
            .unwrap_err();
        assert!(matches!(err, GridProcessorError::LengthMismatch { .. }));
    }

    #[test]
    fn test_nearest_accepts_collinear_samples() {
        let xs = [0.0, 1.0, 2.0];
        let ys = [0.0, 1.0, 2.0];
        let values = [5.0, 6.0, 7.0];
        let samples = Samples::new(&xs, &ys, &values);

        let out = DelaunayInterpolator
            .interpolate(samples, &[1.9], &[0.0], InterpolationMethod::Nearest)
            .unwrap();
        assert_eq!(out, vec![6.0]);

        let err = DelaunayInterpolator
            .interpolate(samples, &[1.0], &[1.0], InterpolationMethod::Linear)
            .unwrap_err();
        assert!(matches!(err, GridProcessorError::DegenerateInput(_)));
    }
}
