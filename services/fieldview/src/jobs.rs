//! Job execution: read data files, interpolate, render, write PNG.

use anyhow::{Context, Result};
use field_common::{
    ArrowStyle, ContourStyle, FigureOptions, LineStyle, RenderSurface, VectorView,
};
use grid_processor::{
    build_interpolated_grid_default, ClampRange, InterpolatedGrid, InterpolationMethod,
};
use renderer::{ColorMap, Figure, StyleConfig};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use table_reader::{
    read_pairs_from_path, read_rows_from_path, read_scalar_field, read_vector_field,
    DecimalConvention, ScalarSamples,
};
use tracing::{debug, error, info};

use crate::config::{FieldviewConfig, JobConfig, JobKind};

/// Line colours, cycled per input file.
const LINE_PALETTE: [&str; 6] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b",
];

/// Outcome of one successful job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobReport {
    pub name: String,
    pub kind: JobKind,
    pub output: PathBuf,
    /// Rows read across all inputs.
    pub samples: usize,
    /// Grid nodes left without a value (contour and overlay jobs).
    pub missing_nodes: usize,
}

/// Outcome of a batch.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub succeeded: Vec<JobReport>,
    /// Job name and the error chain.
    pub failed: Vec<(String, String)>,
}

impl BatchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Labels, styling and interpolation a job kind starts from.
struct KindDefaults {
    /// Used for scalar inputs unless the job or the config defaults set one.
    method: InterpolationMethod,
    title: Option<&'static str>,
    x_label: &'static str,
    y_label: &'static str,
    colormap: &'static str,
    levels: usize,
    colorbar_label: &'static str,
    grid: bool,
    equal_aspect: bool,
}

impl KindDefaults {
    fn for_kind(kind: JobKind) -> Self {
        match kind {
            JobKind::Contour => Self {
                method: InterpolationMethod::Cubic,
                title: Some("Temperature Field"),
                x_label: "X Coordinate",
                y_label: "Y Coordinate",
                colormap: "coolwarm",
                levels: 100,
                colorbar_label: "Temperature",
                grid: false,
                equal_aspect: false,
            },
            JobKind::Vectors => Self {
                method: InterpolationMethod::Cubic,
                title: Some("Velocity Field"),
                x_label: "X Coordinate",
                y_label: "Y Coordinate",
                colormap: "coolwarm",
                levels: 100,
                colorbar_label: "",
                grid: true,
                equal_aspect: true,
            },
            JobKind::Overlay => Self {
                method: InterpolationMethod::Linear,
                title: Some("Computational Field"),
                x_label: "R",
                y_label: "Z",
                colormap: "plasma",
                levels: 50,
                colorbar_label: "T",
                grid: false,
                equal_aspect: false,
            },
            JobKind::Line => Self {
                method: InterpolationMethod::Cubic,
                title: None,
                x_label: "X",
                y_label: "Y",
                colormap: "coolwarm",
                levels: 100,
                colorbar_label: "",
                grid: true,
                equal_aspect: false,
            },
        }
    }
}

/// Runs the jobs of one config.
pub struct JobRunner<'a> {
    config: &'a FieldviewConfig,
    colormaps: HashMap<String, ColorMap>,
}

impl<'a> JobRunner<'a> {
    /// Prepare a runner, loading the style file if one is configured.
    pub fn new(config: &'a FieldviewConfig) -> Result<Self> {
        let colormaps = match &config.defaults.style_file {
            Some(raw) => {
                let path = config.resolve_path(raw)?;
                let styles = StyleConfig::from_file(&path)
                    .with_context(|| format!("Failed to load style file {:?}", path))?;
                let maps = styles.colormaps()?;
                info!(path = %path.display(), colormaps = maps.len(), "Loaded style file");
                maps
            }
            None => HashMap::new(),
        };
        Ok(Self { config, colormaps })
    }

    /// Run every job. A failing job is logged and the batch continues.
    pub fn run_all(&self) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for job in &self.config.jobs {
            match self.run_job(job) {
                Ok(report) => summary.succeeded.push(report),
                Err(e) => {
                    let message = format!("{:#}", e);
                    error!(job = %job.name, kind = %job.kind, error = %message, "Job failed");
                    summary.failed.push((job.name.clone(), message));
                }
            }
        }
        info!(
            succeeded = summary.succeeded.len(),
            failed = summary.failed.len(),
            "Batch finished"
        );
        summary
    }

    /// Run one job.
    pub fn run_job(&self, job: &JobConfig) -> Result<JobReport> {
        let start = Instant::now();
        info!(job = %job.name, kind = %job.kind, inputs = job.inputs.len(), "Running job");

        let inputs = job
            .inputs
            .iter()
            .map(|raw| self.config.resolve_path(raw))
            .collect::<Result<Vec<_>>>()?;
        let output = self.config.resolve_path(&job.output)?;
        let kind = KindDefaults::for_kind(job.kind);
        let mut figure =
            Figure::new(self.figure_options(job, &kind)).with_colormaps(self.colormaps.clone());

        let (samples, missing_nodes) = match job.kind {
            JobKind::Contour => self.draw_contour(&mut figure, job, &kind, &inputs[0])?,
            JobKind::Vectors => {
                let style = vector_style(job);
                (self.draw_vectors(&mut figure, job, &inputs[0], style)?, 0)
            }
            JobKind::Overlay => {
                let (samples, missing) = self.draw_contour(&mut figure, job, &kind, &inputs[0])?;
                let vectors = match inputs.get(1) {
                    Some(path) => {
                        self.draw_vectors(&mut figure, job, path, overlay_arrow_style(job))?
                    }
                    None => 0,
                };
                (samples + vectors, missing)
            }
            JobKind::Line => (self.draw_lines(&mut figure, job, &inputs)?, 0),
        };

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory {:?}", parent))?;
        }
        figure
            .save_png(&output)
            .with_context(|| format!("Failed to write {:?}", output))?;

        info!(
            job = %job.name,
            output = %output.display(),
            samples,
            missing_nodes,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Job complete"
        );

        Ok(JobReport {
            name: job.name.clone(),
            kind: job.kind,
            output,
            samples,
            missing_nodes,
        })
    }

    fn decimal(&self, job: &JobConfig) -> DecimalConvention {
        job.decimal.unwrap_or(self.config.defaults.decimal)
    }

    fn figure_options(&self, job: &JobConfig, kind: &KindDefaults) -> FigureOptions {
        let style = &job.style;
        let defaults = &self.config.defaults;
        FigureOptions {
            width_px: style.width_px.unwrap_or(defaults.width_px),
            height_px: style.height_px.unwrap_or(defaults.height_px),
            title: style.title.clone().or_else(|| kind.title.map(str::to_string)),
            x_label: Some(style.x_label.clone().unwrap_or_else(|| kind.x_label.to_string())),
            y_label: Some(style.y_label.clone().unwrap_or_else(|| kind.y_label.to_string())),
            grid: kind.grid,
            equal_aspect: kind.equal_aspect,
            ..Default::default()
        }
    }

    /// Method for `job`: the job's own, then the config default, then the kind's.
    pub fn method_for(&self, job: &JobConfig) -> InterpolationMethod {
        job.method
            .or(self.config.defaults.method)
            .unwrap_or_else(|| KindDefaults::for_kind(job.kind).method)
    }

    /// Interpolate a scalar file onto the configured mesh.
    pub fn interpolate(
        &self,
        job: &JobConfig,
        samples: &ScalarSamples,
    ) -> Result<InterpolatedGrid> {
        let defaults = &self.config.defaults;
        let max = job.clamp.resolve(&samples.value)?;
        let clamp = ClampRange::new(defaults.clamp_min, max);
        let resolution = job
            .resolution
            .unwrap_or(defaults.resolution)
            .resolve(&samples.x, &samples.y);
        let method = self.method_for(job);

        debug!(
            job = %job.name,
            clamp = %job.clamp,
            max,
            resolution = %resolution,
            method = %method,
            "Resolved grid settings"
        );

        let (xs, ys, values) = (&samples.x, &samples.y, &samples.value);
        build_interpolated_grid_default(xs, ys, values, resolution, clamp, method)
            .with_context(|| format!("Failed to interpolate {} samples", samples.len()))
    }

    fn draw_contour(
        &self,
        figure: &mut Figure,
        job: &JobConfig,
        kind: &KindDefaults,
        path: &Path,
    ) -> Result<(usize, usize)> {
        let samples = read_scalar_field(path, self.decimal(job))
            .with_context(|| format!("Failed to read scalar field {:?}", path))?;
        let grid = self.interpolate(job, &samples)?;

        let style = ContourStyle {
            colormap: job.style.colormap.clone().unwrap_or_else(|| kind.colormap.to_string()),
            levels: job.style.levels.unwrap_or(kind.levels),
            value_range: None,
            colorbar_label: Some(
                job.style
                    .colorbar_label
                    .clone()
                    .unwrap_or_else(|| kind.colorbar_label.to_string()),
            ),
            isolines: job.style.isolines.unwrap_or(false),
        };
        figure.filled_contour(grid.view(), &style)?;
        Ok((samples.len(), grid.missing_count()))
    }

    fn draw_vectors(
        &self,
        figure: &mut Figure,
        job: &JobConfig,
        path: &Path,
        style: ArrowStyle,
    ) -> Result<usize> {
        let samples = read_vector_field(path, self.decimal(job))
            .with_context(|| format!("Failed to read vector field {:?}", path))?;
        figure.vector_field(
            VectorView {
                x: &samples.x,
                y: &samples.y,
                u: &samples.u,
                v: &samples.v,
            },
            &style,
        )?;
        Ok(samples.len())
    }

    fn draw_lines(
        &self,
        figure: &mut Figure,
        job: &JobConfig,
        inputs: &[PathBuf],
    ) -> Result<usize> {
        let mut total = 0;
        for (i, path) in inputs.iter().enumerate() {
            let (xs, ys) = match self.decimal(job) {
                DecimalConvention::Period => read_pairs_from_path(path),
                decimal => read_rows_from_path(path, 2, decimal).map(|dataset| {
                    let mut columns = dataset.into_columns().into_iter();
                    (columns.next().unwrap_or_default(), columns.next().unwrap_or_default())
                }),
            }
            .with_context(|| format!("Failed to read series {:?}", path))?;

            let label = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned());
            let style = LineStyle {
                color: LINE_PALETTE[i % LINE_PALETTE.len()].to_string(),
                width: 1.5,
                label,
            };
            total += xs.len();
            figure.polyline(&xs, &ys, &style)?;
        }
        Ok(total)
    }
}

fn vector_style(job: &JobConfig) -> ArrowStyle {
    let defaults = ArrowStyle::default();
    ArrowStyle {
        scale_factor: job.style.scale_factor.unwrap_or(defaults.scale_factor),
        scale: job.style.scale.unwrap_or(defaults.scale),
        color: job.style.arrow_color.clone().unwrap_or(defaults.color.clone()),
        ..defaults
    }
}

/// Solid black arrows that stay readable on top of a filled contour.
fn overlay_arrow_style(job: &JobConfig) -> ArrowStyle {
    ArrowStyle {
        scale_factor: job.style.scale_factor.unwrap_or(20.0),
        scale: job.style.scale.unwrap_or(0.7),
        shaft_width: 0.002,
        head_width: 6.0,
        head_length: 6.0,
        color: job.style.arrow_color.clone().unwrap_or_else(|| "#000000".to_string()),
        alpha: 1.0,
        ..Default::default()
    }
}
