use crate::error::ConfigurationError;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Machining parameters for one run. Lengths in mm, feeds in mm/rev.
///
/// | field | default |
/// |---|---|
/// | `spindle_rpm` | 1200 |
/// | `feed_rough` | 0.20 |
/// | `feed_finish` | 0.10 |
/// | `feed_face` | 0.10 |
/// | `feed_part` | 0.05 |
/// | `stock_allowance` | 1.0 |
/// | `finish_allowance` | 0.2 |
/// | `rough_step` | 1.0 |
/// | `safe_z` | 3.0 |
/// | `cutoff_extra` | 1.5 |
/// | `approach_clearance` | 2.0 |
/// | `part_overtravel` | 1.0 |
/// | `program_number` | 1 |
/// | `turning_tool` | 1 |
/// | `parting_tool` | 3 |
/// | `optional_stop` | true |
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnParams {
    /// Constant spindle speed, rev/min.
    pub spindle_rpm: u32,
    pub feed_rough: f64,
    pub feed_finish: f64,
    pub feed_face: f64,
    pub feed_part: f64,
    /// Radial allowance on the blank. Doubled on diameter.
    pub stock_allowance: f64,
    /// Diameter left by roughing for the finish pass.
    pub finish_allowance: f64,
    /// Diameter removed per roughing pass.
    pub rough_step: f64,
    /// Z of every rapid retract.
    pub safe_z: f64,
    /// Parting position beyond the finished length.
    pub cutoff_extra: f64,
    /// Added to the stock diameter for the rapid approach.
    pub approach_clearance: f64,
    /// How far past centerline the parting tool feeds.
    pub part_overtravel: f64,
    /// `O` label of the program, 1..=9999.
    pub program_number: u32,
    /// Turret station of the turning tool; its offset register matches.
    pub turning_tool: u8,
    /// Turret station of the parting tool; its offset register matches.
    pub parting_tool: u8,
    /// Emit `M01` at the tool change.
    pub optional_stop: bool,
}

impl Default for TurnParams {
    fn default() -> Self {
        Self {
            spindle_rpm: 1200,
            feed_rough: 0.20,
            feed_finish: 0.10,
            feed_face: 0.10,
            feed_part: 0.05,
            stock_allowance: 1.0,
            finish_allowance: 0.2,
            rough_step: 1.0,
            safe_z: 3.0,
            cutoff_extra: 1.5,
            approach_clearance: 2.0,
            part_overtravel: 1.0,
            program_number: 1,
            turning_tool: 1,
            parting_tool: 3,
            optional_stop: true,
        }
    }
}

impl TurnParams {
    /// Check every field on its own. The stock/target relation depends on
    /// the part and is checked by the generator.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.spindle_rpm == 0 {
            return Err(ConfigurationError::NonPositive {
                name: "spindle_rpm",
                value: 0.0,
            });
        }

        for (name, value) in [
            ("turning_tool", self.turning_tool),
            ("parting_tool", self.parting_tool),
        ] {
            if !(1..=99).contains(&value) {
                return Err(ConfigurationError::ToolStation { name, value });
            }
        }

        if !(1..=9999).contains(&self.program_number) {
            return Err(ConfigurationError::ProgramNumber {
                value: self.program_number,
            });
        }

        let positive = [
            ("feed_rough", self.feed_rough),
            ("feed_finish", self.feed_finish),
            ("feed_face", self.feed_face),
            ("feed_part", self.feed_part),
            ("rough_step", self.rough_step),
            ("safe_z", self.safe_z),
            ("part_overtravel", self.part_overtravel),
        ];
        for (name, value) in positive {
            ensure_finite(name, value)?;
            if value <= 0.0 {
                return Err(ConfigurationError::NonPositive { name, value });
            }
        }

        let non_negative = [
            ("stock_allowance", self.stock_allowance),
            ("finish_allowance", self.finish_allowance),
            ("cutoff_extra", self.cutoff_extra),
            ("approach_clearance", self.approach_clearance),
        ];
        for (name, value) in non_negative {
            ensure_finite(name, value)?;
            if value < 0.0 {
                return Err(ConfigurationError::Negative { name, value });
            }
        }

        Ok(())
    }

    /// Load parameters from a JSON file. Missing files yield the defaults;
    /// missing fields take their default value.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let data = fs::read(path).with_context(|| format!("read params {}", path.display()))?;
        let params: TurnParams = serde_json::from_slice(&data)
            .with_context(|| format!("deserialize params {}", path.display()))?;
        Ok(params)
    }

    /// Persist the parameters, ensuring the directory exists.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create params directory {}", parent.display()))?;
        }

        let data = serde_json::to_vec_pretty(self).context("serialize params to JSON bytes")?;
        fs::write(path, data).with_context(|| format!("write params {}", path.display()))
    }

    /// Resolve the default parameter file path (`~/.rturn/params.json`).
    pub fn default_params_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("could not determine home directory"))?;
        Ok(home.join(".rturn").join("params.json"))
    }
}

fn ensure_finite(name: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigurationError::NotFinite { name })
    }
}
