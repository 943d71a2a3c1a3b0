//! Error types for profiling and program generation.
//!
//! Both kinds are fatal: a run that hits either one produces no program text.

use crate::types::Axis;
use std::path::PathBuf;
use thiserror::Error;

/// The input model could not be reduced to a usable cylinder envelope.
#[derive(Error, Debug)]
pub enum GeometryError {
    /// The model file could not be opened or read.
    #[error("geometry: cannot read model {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The geometry backend rejected the model as malformed.
    #[error("geometry: model read failed for {}: {reason}", path.display())]
    ReadFailed { path: PathBuf, reason: String },

    /// The model contained no exploitable 3-D points.
    #[error("geometry: no 3-D points found in {}", path.display())]
    NoPoints { path: PathBuf },

    /// The bounding box collapses along one axis.
    #[error("geometry: degenerate bounding box, {axis} extent is {extent}")]
    Degenerate { axis: Axis, extent: f64 },

    /// A profile handed to the generator has a non-positive dimension.
    #[error("geometry: profile {field} must be positive, got {value}")]
    InvalidProfile { field: &'static str, value: f64 },

    /// The requested backend was not compiled into this build.
    #[error("geometry: backend '{0}' is not available in this build")]
    BackendUnavailable(&'static str),
}

/// A parameter set that cannot produce a valid pass plan.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("configuration: '{name}' must be greater than zero, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("configuration: '{name}' must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("configuration: '{name}' must be a finite number")]
    NotFinite { name: &'static str },

    #[error("configuration: '{name}' is below the 0.001 output resolution, got {value}")]
    BelowResolution { name: &'static str, value: f64 },

    #[error("configuration: '{name}' must be a tool station 1..=99, got {value}")]
    ToolStation { name: &'static str, value: u8 },

    #[error("configuration: 'program_number' must be in 1..=9999, got {value}")]
    ProgramNumber { value: u32 },

    /// Roughing would take more passes than one plan allows.
    #[error("configuration: roughing needs about {passes} passes, more than the limit of {limit}")]
    TooManyPasses { passes: f64, limit: usize },

    /// Stock diameter does not exceed the diameter left for finishing.
    #[error(
        "configuration: stock diameter {stock:.3} does not exceed the pre-finish diameter {target:.3}"
    )]
    StockNotAboveTarget { stock: f64, target: f64 },
}

/// Any failure of the model → program pipeline.
#[derive(Error, Debug)]
pub enum TurnError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

pub type TurnResult<T> = Result<T, TurnError>;
