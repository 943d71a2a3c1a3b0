//! Vertex-scan fallback for STEP files.
//!
//! Collects every three-coordinate `CARTESIAN_POINT` record and bounds them
//! directly. Control points and placement origins that sit off the solid's
//! extremal envelope can push the box outward, so length and diameter may be
//! slightly over-estimated. They are never corrected here.

use super::GeometryReader;
use crate::error::GeometryError;
use crate::types::BoundingBox;
use glam::DVec3;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

static CARTESIAN_POINT: LazyLock<Regex> = LazyLock::new(|| {
    let num = r"([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)";
    let pattern = format!(
        r"CARTESIAN_POINT\s*\(\s*'[^']*'\s*,\s*\(\s*{num}\s*,\s*{num}\s*,\s*{num}\s*\)\s*\)"
    );
    Regex::new(&pattern).expect("CARTESIAN_POINT pattern is valid")
});

/// Bounds a STEP file by scanning its point records as text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateReader;

impl ApproximateReader {
    pub const NAME: &'static str = "approximate";

    /// Extract all three-coordinate `CARTESIAN_POINT` positions from STEP text.
    ///
    /// Two-coordinate points (parameter-space curves) do not match.
    pub fn points_from_str(text: &str) -> Vec<DVec3> {
        CARTESIAN_POINT
            .captures_iter(text)
            .filter_map(|caps| {
                let x = caps[1].parse::<f64>().ok()?;
                let y = caps[2].parse::<f64>().ok()?;
                let z = caps[3].parse::<f64>().ok()?;
                Some(DVec3::new(x, y, z))
            })
            .collect()
    }
}

impl GeometryReader for ApproximateReader {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn read_bounds(&self, path: &Path) -> Result<BoundingBox, GeometryError> {
        let bytes = fs::read(path).map_err(|source| GeometryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8_lossy(&bytes);
        let points = Self::points_from_str(&text);
        debug!(path = %path.display(), points = points.len(), "scanned CARTESIAN_POINT records");

        BoundingBox::from_points(&points).ok_or_else(|| GeometryError::NoPoints {
            path: path.to_path_buf(),
        })
    }

    fn is_approximate(&self) -> bool {
        true
    }
}
