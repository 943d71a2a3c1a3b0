use anyhow::{Context, Result};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// A global coordinate axis. Declaration order is the tie-break priority when
/// two extents are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn as_str(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Axis-aligned bounds of a model, in model units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub zmin: f64,
    pub zmax: f64,
}

impl BoundingBox {
    pub fn from_min_max(min: DVec3, max: DVec3) -> Self {
        Self {
            xmin: min.x,
            xmax: max.x,
            ymin: min.y,
            ymax: max.y,
            zmin: min.z,
            zmax: max.z,
        }
    }

    /// Bounds of a point set, or `None` when the set is empty.
    pub fn from_points(points: &[DVec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(Self::from_min_max(min, max))
    }

    pub fn min(&self) -> DVec3 {
        DVec3::new(self.xmin, self.ymin, self.zmin)
    }

    pub fn max(&self) -> DVec3 {
        DVec3::new(self.xmax, self.ymax, self.zmax)
    }

    /// The box grown by `margin` on every side.
    pub fn expanded(&self, margin: f64) -> Self {
        Self::from_min_max(self.min() - DVec3::splat(margin), self.max() + DVec3::splat(margin))
    }

    /// Extent (max - min) along one axis.
    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.xmax - self.xmin,
            Axis::Y => self.ymax - self.ymin,
            Axis::Z => self.zmax - self.zmin,
        }
    }
}

/// Cylindrical envelope inferred from a model's bounding box.
///
/// Serializes as a flat record: `length`, `diameter`, `axis` and the six
/// bounding box fields side by side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CylinderProfile {
    /// Extent along the rotation axis.
    pub length: f64,
    /// Larger of the two extents across the rotation axis.
    pub diameter: f64,
    pub axis: Axis,
    #[serde(flatten)]
    pub bbox: BoundingBox,
}

impl CylinderProfile {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serialize cylinder profile")
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("deserialize cylinder profile")
    }

    /// Write the profile as pretty JSON.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)
            .with_context(|| format!("write profile {}", path.display()))
    }
}

/// Program phases in the only order they may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    Setup,
    Facing,
    Roughing,
    Finishing,
    ToolChange,
    Parting,
    End,
}

/// One address word of an NC block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Word {
    G(u16),
    M(u8),
    /// Tool station and offset register, e.g. `T0101`.
    T { station: u8, offset: u8 },
    /// Spindle speed in rev/min.
    S(u32),
    X(f64),
    Z(f64),
    U(f64),
    V(f64),
    W(f64),
    F(f64),
}

/// One block of the program, tagged with the phase that emitted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub phase: Phase,
    pub words: Vec<Word>,
}

impl Instruction {
    pub fn new(phase: Phase, words: impl Into<Vec<Word>>) -> Self {
        Self {
            phase,
            words: words.into(),
        }
    }
}

/// An ordered NC program for a two-axis lathe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Program number, rendered as the `O` label.
    pub number: u32,
    pub instructions: Vec<Instruction>,
}

impl Program {
    /// Instructions emitted by one phase, in program order.
    pub fn phase(&self, phase: Phase) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter().filter(move |i| i.phase == phase)
    }
}

/// Represents the final, machine-specific G-code output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GCode {
    /// A list of G-code command strings.
    pub lines: Vec<String>,
}

impl GCode {
    /// Newline-joined text with a trailing newline.
    pub fn to_text(&self) -> String {
        let mut text = self.lines.join("\n");
        if !self.lines.is_empty() {
            text.push('\n');
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_from_points() {
        let points = vec![
            DVec3::new(1.0, -2.0, 0.0),
            DVec3::new(-1.0, 2.0, 50.0),
            DVec3::new(0.5, 0.0, 25.0),
        ];
        let bbox = BoundingBox::from_points(&points).unwrap();
        assert_eq!(bbox.min(), DVec3::new(-1.0, -2.0, 0.0));
        assert_eq!(bbox.max(), DVec3::new(1.0, 2.0, 50.0));
        assert_eq!(bbox.extent(Axis::Z), 50.0);
    }

    #[test]
    fn test_expanded_covers_chord_sag() {
        // Ø20 circle sampled at 16 points, none of them on the X or Y axis.
        let segments = 16;
        let half_step = std::f64::consts::PI / segments as f64;
        let points: Vec<DVec3> = (0..segments)
            .flat_map(|k| {
                let angle = (2 * k + 1) as f64 * half_step;
                let (sin, cos) = angle.sin_cos();
                [
                    DVec3::new(10.0 * cos, 10.0 * sin, 0.0),
                    DVec3::new(10.0 * cos, 10.0 * sin, 50.0),
                ]
            })
            .collect();
        let sampled = BoundingBox::from_points(&points).unwrap();
        assert!(sampled.extent(Axis::X) < 20.0);

        let sag = 10.0 * (1.0 - half_step.cos());
        let covering = sampled.expanded(sag);
        assert!(covering.extent(Axis::X) > 20.0 - 1e-9);
        assert!(covering.extent(Axis::Y) > 20.0 - 1e-9);
        assert_eq!(covering.zmin, -sag);
    }

    #[test]
    fn test_bbox_from_no_points() {
        assert!(BoundingBox::from_points(&[]).is_none());
    }

    #[test]
    fn test_axis_order_is_priority() {
        assert!(Axis::X < Axis::Y && Axis::Y < Axis::Z);
        assert_eq!(Axis::Z.to_string(), "z");
    }

    #[test]
    fn test_gcode_text_has_trailing_newline() {
        let gcode = GCode {
            lines: vec!["%".to_string(), "O0001".to_string()],
        };
        assert_eq!(gcode.to_text(), "%\nO0001\n");
        assert_eq!(GCode { lines: vec![] }.to_text(), "");
    }
}
