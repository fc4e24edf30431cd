//! fieldview service library.
//!
//! Turns solver data files into PNG plots: filled temperature contours,
//! velocity arrow plots, a combined overlay and line series. Jobs come from a
//! YAML file or from the command line.

pub mod config;
pub mod jobs;

pub use config::{
    ClampBound, Defaults, FieldviewConfig, JobConfig, JobKind, Resolution, StyleOverrides,
};
pub use jobs::{BatchSummary, JobReport, JobRunner};
