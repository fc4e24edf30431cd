//! fieldview command line.
//!
//! Runs a batch of plot jobs from a YAML file, or a single plot described by
//! flags.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand};
use grid_processor::InterpolationMethod;
use table_reader::DecimalConvention;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use fieldview::{
    ClampBound, Defaults, FieldviewConfig, JobConfig, JobKind, JobRunner, Resolution,
    StyleOverrides,
};

#[derive(Parser, Debug)]
#[command(name = "fieldview")]
#[command(about = "Render scalar and vector field data files as PNG plots")]
struct Args {
    /// Log level
    #[arg(long, default_value = "info", env = "FIELDVIEW_LOG_LEVEL")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every job in a YAML job file
    Run {
        /// Job file path
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Filled contour of an `x y T` file
    Contour {
        #[arg(short, long)]
        input: String,
        #[command(flatten)]
        grid: GridArgs,
        #[command(flatten)]
        plot: PlotArgs,
    },
    /// Arrow plot of an `x y u v` file
    Vectors {
        #[arg(short, long)]
        input: String,
        /// Multiplier applied to every vector
        #[arg(long)]
        scale_factor: Option<f64>,
        #[command(flatten)]
        plot: PlotArgs,
    },
    /// Filled contour with velocity arrows on top
    Overlay {
        /// `x y T` file
        #[arg(long)]
        scalar: String,
        /// `x y u v` file
        #[arg(long)]
        vectors: Option<String>,
        #[arg(long)]
        scale_factor: Option<f64>,
        #[command(flatten)]
        grid: GridArgs,
        #[command(flatten)]
        plot: PlotArgs,
    },
    /// Line plot of one or more `x y` files
    Line {
        #[arg(short, long, required = true)]
        input: Vec<String>,
        #[command(flatten)]
        plot: PlotArgs,
    },
}

#[derive(ClapArgs, Debug)]
struct GridArgs {
    /// Interpolation method (nearest, linear, cubic)
    #[arg(long)]
    method: Option<String>,

    /// Mesh size as ROWSxCOLS, or "native" to follow the sample lattice
    #[arg(long)]
    resolution: Option<Resolution>,

    /// Fixed upper clamp bound
    #[arg(long, conflicts_with_all = ["clamp_data_max", "clamp_nth_largest"])]
    clamp_max: Option<f64>,

    /// Clamp to the largest sample value
    #[arg(long, conflicts_with = "clamp_nth_largest")]
    clamp_data_max: bool,

    /// Clamp to the N-th largest distinct sample value
    #[arg(long)]
    clamp_nth_largest: Option<usize>,

    /// Number of colour bands
    #[arg(long)]
    levels: Option<usize>,

    /// Colour map name
    #[arg(long)]
    colormap: Option<String>,

    /// Draw isolines over the bands
    #[arg(long)]
    isolines: bool,
}

impl GridArgs {
    fn clamp(&self) -> ClampBound {
        match (self.clamp_max, self.clamp_data_max, self.clamp_nth_largest) {
            (Some(max), _, _) => ClampBound::Fixed(max),
            (_, true, _) => ClampBound::DataMax,
            (_, _, Some(n)) => ClampBound::NthLargest(n),
            _ => ClampBound::default(),
        }
    }
}

#[derive(ClapArgs, Debug)]
struct PlotArgs {
    /// Decimal separator of the input files (period or comma)
    #[arg(long)]
    decimal: Option<DecimalConvention>,

    /// Output PNG path
    #[arg(short, long)]
    output: String,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// JSON style file with extra colour maps
    #[arg(long)]
    style_file: Option<String>,
}

impl PlotArgs {
    fn overrides(&self) -> StyleOverrides {
        StyleOverrides {
            title: self.title.clone(),
            width_px: self.width,
            height_px: self.height,
            ..Default::default()
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(&args.log_level, args.json_logs)?;

    let config = match args.command {
        Command::Run { config } => FieldviewConfig::load(&config)?,
        command => single_job_config(command)?,
    };
    info!(jobs = config.jobs.len(), "Loaded configuration");

    let runner = JobRunner::new(&config)?;
    let summary = runner.run_all();
    if summary.all_succeeded() {
        Ok(ExitCode::SUCCESS)
    } else {
        for (name, reason) in &summary.failed {
            error!(job = %name, reason = %reason, "Failed job");
        }
        Ok(ExitCode::FAILURE)
    }
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// Build a one-job config from command-line flags.
fn single_job_config(command: Command) -> Result<FieldviewConfig> {
    let mut defaults = Defaults::from_env();

    let (kind, inputs, plot, grid, scale_factor) = match command {
        Command::Contour { input, grid, plot } => {
            (JobKind::Contour, vec![input], plot, Some(grid), None)
        }
        Command::Vectors { input, scale_factor, plot } => {
            (JobKind::Vectors, vec![input], plot, None, scale_factor)
        }
        Command::Overlay { scalar, vectors, scale_factor, grid, plot } => {
            let inputs = std::iter::once(scalar).chain(vectors).collect();
            (JobKind::Overlay, inputs, plot, Some(grid), scale_factor)
        }
        Command::Line { input, plot } => (JobKind::Line, input, plot, None, None),
        Command::Run { .. } => anyhow::bail!("job files are loaded with FieldviewConfig::load"),
    };

    if let Some(decimal) = plot.decimal {
        defaults.decimal = decimal;
    }
    defaults.style_file = plot.style_file.clone();

    let mut style = plot.overrides();
    style.scale_factor = scale_factor;
    let mut job = JobConfig {
        name: kind.to_string(),
        kind,
        inputs,
        output: plot.output,
        clamp: ClampBound::default(),
        decimal: None,
        method: None,
        resolution: None,
        style,
    };
    if let Some(grid) = grid {
        job.clamp = grid.clamp();
        job.method = grid.method.as_deref().map(InterpolationMethod::from_str);
        job.resolution = grid.resolution;
        job.style.levels = grid.levels;
        job.style.colormap = grid.colormap;
        job.style.isolines = Some(grid.isolines);
    }

    let config = FieldviewConfig {
        defaults,
        jobs: vec![job],
        base_dir: PathBuf::from("."),
    };
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid arguments: {}", e))?;
    Ok(config)
}
