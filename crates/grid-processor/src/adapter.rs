//! Scattered samples to a clamped regular grid.

use field_common::BoundingBox;
use tracing::{debug, info};

use crate::error::{GridProcessorError, Result};
use crate::mesh::mesh;
use crate::scattered::{DelaunayInterpolator, Samples, ScatteredInterpolator};
use crate::types::{ClampRange, GridShape, InterpolatedGrid, InterpolationMethod};

/// Interpolate scattered `(xs[i], ys[i]) -> values[i]` onto a regular mesh.
///
/// The mesh spans the bounding box of the samples with `resolution.cols`
/// nodes along x and `resolution.rows` along y, both ends included. Every
/// interpolated value is then clamped into `clamp`. Nodes the interpolator
/// leaves undefined (outside the convex hull for `linear` and `cubic`) stay
/// NaN.
///
/// # Errors
///
/// - [`GridProcessorError::LengthMismatch`] when the three inputs differ in length
/// - [`GridProcessorError::DegenerateInput`] when the samples do not span an
///   area: no samples, fewer than two distinct x or y values, or (for the
///   triangulating methods) all samples on one line
/// - [`GridProcessorError::InvalidInput`] for NaN or infinite inputs
/// - [`GridProcessorError::InvalidResolution`] / [`GridProcessorError::InvalidClamp`]
pub fn build_interpolated_grid<I>(
    xs: &[f64],
    ys: &[f64],
    values: &[f64],
    resolution: GridShape,
    clamp: ClampRange,
    method: InterpolationMethod,
    interpolator: &I,
) -> Result<InterpolatedGrid>
where
    I: ScatteredInterpolator + ?Sized,
{
    if xs.len() != ys.len() || xs.len() != values.len() {
        return Err(GridProcessorError::LengthMismatch {
            x: xs.len(),
            y: ys.len(),
            values: values.len(),
        });
    }
    if xs.is_empty() {
        return Err(GridProcessorError::degenerate("no samples"));
    }
    if let Some(i) = (0..xs.len()).find(|&i| {
        !xs[i].is_finite() || !ys[i].is_finite() || !values[i].is_finite()
    }) {
        return Err(GridProcessorError::invalid_input(format!(
            "sample {} is not finite: ({}, {}) -> {}",
            i, xs[i], ys[i], values[i]
        )));
    }
    resolution.validate()?;
    clamp.validate()?;

    let bbox = BoundingBox::from_points(xs, ys)
        .ok_or_else(|| GridProcessorError::degenerate("no finite samples"))?;
    if bbox.width() <= 0.0 || bbox.height() <= 0.0 {
        return Err(GridProcessorError::degenerate(format!(
            "samples need at least two distinct values on each axis, bounding box is {} x {}",
            bbox.width(),
            bbox.height()
        )));
    }

    let (mesh_xs, mesh_ys) = mesh(&bbox, resolution);
    debug!(
        samples = xs.len(),
        shape = %resolution,
        method = %method,
        "Built interpolation mesh"
    );

    let mut grid_values = interpolator.interpolate(
        Samples::new(xs, ys, values),
        &mesh_xs,
        &mesh_ys,
        method,
    )?;
    if grid_values.len() != resolution.len() {
        return Err(GridProcessorError::interpolation(format!(
            "interpolator returned {} values for {} nodes",
            grid_values.len(),
            resolution.len()
        )));
    }

    clamp_values(&mut grid_values, clamp);

    let grid = InterpolatedGrid {
        shape: resolution,
        xs: mesh_xs,
        ys: mesh_ys,
        values: grid_values,
        bbox,
        method,
    };

    info!(
        shape = %grid.shape,
        method = %method,
        missing = grid.missing_count(),
        "Interpolated grid"
    );

    Ok(grid)
}

/// [`build_interpolated_grid`] with the built-in [`DelaunayInterpolator`].
pub fn build_interpolated_grid_default(
    xs: &[f64],
    ys: &[f64],
    values: &[f64],
    resolution: GridShape,
    clamp: ClampRange,
    method: InterpolationMethod,
) -> Result<InterpolatedGrid> {
    build_interpolated_grid(xs, ys, values, resolution, clamp, method, &DelaunayInterpolator)
}

/// Clamp every value into `range` in place. NaN entries are left alone.
pub fn clamp_values(values: &mut [f64], range: ClampRange) {
    for value in values.iter_mut() {
        *value = range.apply(*value);
    }
}
