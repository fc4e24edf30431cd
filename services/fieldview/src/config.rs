//! Job configuration for fieldview.
//!
//! A job file lists plots to produce. Shared settings live under `defaults`
//! and each job may override them:
//!
//! ```yaml
//! defaults:
//!   decimal: comma
//!   method: cubic
//!   resolution: 100x100
//!   style_file: ~/styles/heat.json
//!
//! jobs:
//!   - name: temperature
//!     kind: contour
//!     inputs: [$RUN_DIR/data600.txt]
//!     output: temperature.png
//!     clamp: 2000
//!   - name: overlay
//!     kind: overlay
//!     inputs: [data600.txt, velocity.txt]
//!     output: overlay.png
//!     clamp: nth_largest:2
//!     style:
//!       colormap: plasma
//!       levels: 50
//! ```
//!
//! Paths go through `shellexpand` (`~`, `$VAR`, `${VAR}`). Relative paths are
//! resolved against the directory of the job file.

use anyhow::{bail, Context, Result};
use field_common::{finite_range, nth_largest};
use grid_processor::{infer_grid_shape, GridProcessorConfig, GridShape, InterpolationMethod};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use table_reader::DecimalConvention;
use tracing::warn;

/// Relative tolerance used when checking whether samples sit on a lattice.
const LATTICE_TOLERANCE: f64 = 1e-6;

// ============================================================================
// Clamp bound
// ============================================================================

/// Where the upper clamp bound of an interpolated grid comes from.
///
/// In YAML a number is a fixed bound, `data_max` uses the largest sample and
/// `nth_largest:N` the N-th largest distinct sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ClampValue", into = "String")]
pub enum ClampBound {
    Fixed(f64),
    DataMax,
    NthLargest(usize),
}

impl Default for ClampBound {
    fn default() -> Self {
        Self::Fixed(2000.0)
    }
}

impl ClampBound {
    /// Resolve the bound against the sample values.
    pub fn resolve(&self, values: &[f64]) -> Result<f64> {
        match *self {
            Self::Fixed(max) => Ok(max),
            Self::DataMax => finite_range(values)
                .map(|(_, max)| max)
                .context("no finite samples to take the maximum of"),
            Self::NthLargest(n) => nth_largest(values, n)
                .with_context(|| format!("fewer than {} distinct sample values", n)),
        }
    }
}

impl FromStr for ClampBound {
    type Err = String;

    /// Parse `2000`, `data_max` or `nth_largest:2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if lower == "data_max" || lower == "max" {
            return Ok(Self::DataMax);
        }
        if let Some(n) = lower.strip_prefix("nth_largest:") {
            return match n.trim().parse::<usize>() {
                Ok(n) if n > 0 => Ok(Self::NthLargest(n)),
                _ => Err(format!("'{}' needs a positive rank", s)),
            };
        }
        match lower.parse::<f64>() {
            Ok(max) if max.is_finite() => Ok(Self::Fixed(max)),
            _ => Err(format!(
                "unknown clamp bound '{}', expected a number, 'data_max' or 'nth_largest:N'",
                s
            )),
        }
    }
}

impl fmt::Display for ClampBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(max) => write!(f, "{}", max),
            Self::DataMax => write!(f, "data_max"),
            Self::NthLargest(n) => write!(f, "nth_largest:{}", n),
        }
    }
}

impl From<ClampBound> for String {
    fn from(bound: ClampBound) -> Self {
        bound.to_string()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ClampValue {
    Number(f64),
    Text(String),
}

impl TryFrom<ClampValue> for ClampBound {
    type Error = String;

    fn try_from(value: ClampValue) -> Result<Self, Self::Error> {
        match value {
            ClampValue::Number(max) if max.is_finite() => Ok(Self::Fixed(max)),
            ClampValue::Number(max) => Err(format!("clamp bound {} is not finite", max)),
            ClampValue::Text(text) => text.parse(),
        }
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Mesh size for interpolation: fixed, or taken from the sample lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Resolution {
    Native,
    Fixed(GridShape),
}

impl Default for Resolution {
    fn default() -> Self {
        Self::Fixed(GridShape::default())
    }
}

impl Resolution {
    /// Mesh shape for these samples.
    ///
    /// `Native` falls back to the default shape when the samples are not on
    /// a complete lattice.
    pub fn resolve(&self, xs: &[f64], ys: &[f64]) -> GridShape {
        match self {
            Self::Fixed(shape) => *shape,
            Self::Native => infer_grid_shape(xs, ys, LATTICE_TOLERANCE).unwrap_or_else(|| {
                let fallback = GridShape::default();
                warn!(
                    samples = xs.len(),
                    fallback = %fallback,
                    "Samples are not on a lattice, using the default resolution"
                );
                fallback
            }),
        }
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("native") {
            return Ok(Self::Native);
        }
        s.parse::<GridShape>()
            .map(Self::Fixed)
            .map_err(|e| e.to_string())
    }
}

impl TryFrom<String> for Resolution {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Fixed(shape) => write!(f, "{}", shape),
        }
    }
}

impl From<Resolution> for String {
    fn from(resolution: Resolution) -> Self {
        resolution.to_string()
    }
}

// ============================================================================
// Jobs
// ============================================================================

/// What a job plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    /// Filled contour of an `x y T` file.
    Contour,
    /// Arrow plot of an `x y u v` file.
    Vectors,
    /// Filled contour with an optional arrow overlay.
    Overlay,
    /// One polyline per `x y` file.
    Line,
}

impl JobKind {
    /// Allowed number of input files.
    fn input_range(&self) -> (usize, usize) {
        match self {
            Self::Contour | Self::Vectors => (1, 1),
            Self::Overlay => (1, 2),
            Self::Line => (1, usize::MAX),
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contour => write!(f, "contour"),
            Self::Vectors => write!(f, "vectors"),
            Self::Overlay => write!(f, "overlay"),
            Self::Line => write!(f, "line"),
        }
    }
}

/// Per-job style overrides. Unset fields take the job kind's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleOverrides {
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub colormap: Option<String>,
    pub levels: Option<usize>,
    pub colorbar_label: Option<String>,
    pub isolines: Option<bool>,
    pub scale_factor: Option<f64>,
    pub scale: Option<f64>,
    pub arrow_color: Option<String>,
    pub width_px: Option<u32>,
    pub height_px: Option<u32>,
}

/// One plot to produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    pub kind: JobKind,
    pub inputs: Vec<String>,
    pub output: String,
    #[serde(default)]
    pub clamp: ClampBound,
    #[serde(default)]
    pub decimal: Option<DecimalConvention>,
    #[serde(default)]
    pub method: Option<InterpolationMethod>,
    #[serde(default)]
    pub resolution: Option<Resolution>,
    #[serde(default)]
    pub style: StyleOverrides,
}

/// Settings shared by every job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub decimal: DecimalConvention,
    /// Method for every job kind. Unset, each kind uses its own default.
    pub method: Option<InterpolationMethod>,
    pub resolution: Resolution,
    /// Lower clamp bound for interpolated grids.
    pub clamp_min: f64,
    pub width_px: u32,
    pub height_px: u32,
    /// JSON file with extra colour maps.
    pub style_file: Option<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self::from_grid_config(GridProcessorConfig::default())
    }
}

impl Defaults {
    fn from_grid_config(grid: GridProcessorConfig) -> Self {
        Self {
            decimal: DecimalConvention::Period,
            method: None,
            resolution: Resolution::Fixed(grid.resolution),
            clamp_min: grid.clamp_min,
            width_px: 800,
            height_px: 600,
            style_file: None,
        }
    }

    /// Defaults from environment variables.
    ///
    /// Grid settings come from [`GridProcessorConfig::from_env`]; the decimal
    /// convention from `FIELDVIEW_DECIMAL`. The method is only pinned when
    /// `GRID_INTERPOLATION` is set.
    pub fn from_env() -> Self {
        let grid = GridProcessorConfig::from_env();
        let method = std::env::var_os("GRID_INTERPOLATION").map(|_| grid.method);
        let mut defaults = Self {
            method,
            ..Self::from_grid_config(grid)
        };
        if let Ok(val) = std::env::var("FIELDVIEW_DECIMAL") {
            match val.parse() {
                Ok(decimal) => defaults.decimal = decimal,
                Err(e) => warn!(error = %e, "Ignoring FIELDVIEW_DECIMAL"),
            }
        }
        defaults
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.clamp_min.is_finite() {
            return Err("clamp_min must be finite".to_string());
        }
        if self.width_px < 100 || self.height_px < 100 {
            return Err(format!(
                "figure size {}x{} is too small, need at least 100x100",
                self.width_px, self.height_px
            ));
        }
        Ok(())
    }
}

/// A parsed job file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldviewConfig {
    #[serde(default)]
    pub defaults: Defaults,
    pub jobs: Vec<JobConfig>,
    /// Directory relative paths are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl FieldviewConfig {
    /// Parse YAML text. Relative paths resolve against `base_dir`.
    pub fn from_yaml(yaml: &str, base_dir: impl Into<PathBuf>) -> Result<Self> {
        let mut config: Self =
            serde_yaml::from_str(yaml).context("Failed to parse job config YAML")?;
        config.base_dir = base_dir.into();
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid job config: {}", e))?;
        Ok(config)
    }

    /// Load a job file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = expand_path(&path.as_ref().to_string_lossy(), Path::new("."))?;
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read job config from {:?}", path))?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::from_yaml(&content, base_dir)
            .with_context(|| format!("Failed to load job config from {:?}", path))
    }

    /// Validate every job and the defaults.
    pub fn validate(&self) -> Result<(), String> {
        self.defaults.validate()?;
        if self.jobs.is_empty() {
            return Err("no jobs configured".to_string());
        }

        let mut names = HashSet::new();
        for job in &self.jobs {
            if job.name.trim().is_empty() {
                return Err("job name must not be empty".to_string());
            }
            if !names.insert(job.name.as_str()) {
                return Err(format!("duplicate job name '{}'", job.name));
            }
            let (min, max) = job.kind.input_range();
            if job.inputs.len() < min || job.inputs.len() > max {
                return Err(format!(
                    "job '{}' ({}) takes {} input file(s), got {}",
                    job.name,
                    job.kind,
                    if min == max { min.to_string() } else { format!("at least {}", min) },
                    job.inputs.len()
                ));
            }
            if job.output.trim().is_empty() {
                return Err(format!("job '{}' has no output path", job.name));
            }
        }
        Ok(())
    }

    /// Expand and resolve a path from the job file.
    pub fn resolve_path(&self, raw: &str) -> Result<PathBuf> {
        expand_path(raw, &self.base_dir)
    }
}

/// Expand `~` and environment variables, then resolve relative paths
/// against `base_dir`.
pub fn expand_path(raw: &str, base_dir: &Path) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw)
        .with_context(|| format!("Failed to expand path '{}'", raw))?;
    let path = PathBuf::from(expanded.as_ref());
    if path.as_os_str().is_empty() {
        bail!("empty path");
    }
    Ok(if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    })
}
