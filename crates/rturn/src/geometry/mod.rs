//! Reduction of a solid model to a cylinder envelope.
//!
//! A [`GeometryReader`] turns a model file into an axis-aligned
//! [`BoundingBox`]; [`profile_from_bounds`] reduces that box to a
//! [`CylinderProfile`]. The reduction assumes the part's rotation axis is
//! aligned with a global axis. The diameter is the larger of the two cross
//! extents, not a circle fit.

use crate::error::GeometryError;
use crate::types::{Axis, BoundingBox, CylinderProfile};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

#[cfg(feature = "occt")]
pub mod exact;
pub mod points;

#[cfg(feature = "occt")]
pub use exact::ExactReader;
pub use points::ApproximateReader;

/// Source of bounding boxes for model files.
pub trait GeometryReader {
    /// Short backend name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Compute the axis-aligned bounds of the model at `path`.
    fn read_bounds(&self, path: &Path) -> Result<BoundingBox, GeometryError>;

    /// True when bounds come from raw vertex positions rather than the solid.
    fn is_approximate(&self) -> bool {
        false
    }
}

/// Which reader the caller asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Exact when compiled in, approximate otherwise.
    #[default]
    Auto,
    Exact,
    Approximate,
}

/// Geometry capabilities compiled into this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub exact: bool,
}

impl Capabilities {
    pub fn detect() -> Self {
        Self {
            exact: cfg!(feature = "occt"),
        }
    }
}

/// Select a reader for `backend` given the declared capabilities.
pub fn reader_for(
    backend: Backend,
    caps: Capabilities,
) -> Result<Box<dyn GeometryReader>, GeometryError> {
    let reader: Box<dyn GeometryReader> = match (backend, caps.exact) {
        (Backend::Exact, false) => return Err(GeometryError::BackendUnavailable("exact")),
        (Backend::Exact, true) | (Backend::Auto, true) => exact_reader()?,
        (Backend::Approximate, _) | (Backend::Auto, false) => Box::new(ApproximateReader),
    };
    info!(reader = reader.name(), "selected geometry reader");
    Ok(reader)
}

#[cfg(feature = "occt")]
fn exact_reader() -> Result<Box<dyn GeometryReader>, GeometryError> {
    Ok(Box::new(ExactReader))
}

#[cfg(not(feature = "occt"))]
fn exact_reader() -> Result<Box<dyn GeometryReader>, GeometryError> {
    Err(GeometryError::BackendUnavailable("exact"))
}

/// Read a model with `reader` and reduce it to a cylinder profile.
pub fn profile_model(
    path: &Path,
    reader: &dyn GeometryReader,
) -> Result<CylinderProfile, GeometryError> {
    let bbox = reader.read_bounds(path)?;
    if reader.is_approximate() {
        warn!(
            path = %path.display(),
            "profile built from vertex positions; length and diameter may be over-estimated"
        );
    }
    profile_from_bounds(bbox)
}

/// Reduce six extents to a cylinder profile.
///
/// The longest extent becomes the rotation axis; equal extents resolve in
/// `x`, `y`, `z` order. Any extent that is not strictly positive is an error.
pub fn profile_from_bounds(bbox: BoundingBox) -> Result<CylinderProfile, GeometryError> {
    for axis in Axis::ALL {
        let extent = bbox.extent(axis);
        if !(extent > 0.0 && extent.is_finite()) {
            return Err(GeometryError::Degenerate { axis, extent });
        }
    }

    let mut axis = Axis::X;
    for candidate in [Axis::Y, Axis::Z] {
        if bbox.extent(candidate) > bbox.extent(axis) {
            axis = candidate;
        }
    }

    let diameter = Axis::ALL
        .into_iter()
        .filter(|a| *a != axis)
        .map(|a| bbox.extent(a))
        .fold(f64::NEG_INFINITY, f64::max);

    let profile = CylinderProfile {
        length: bbox.extent(axis),
        diameter,
        axis,
        bbox,
    };
    debug!(
        axis = %profile.axis,
        length = profile.length,
        diameter = profile.diameter,
        "reduced bounding box to cylinder"
    );
    Ok(profile)
}
