//! Turning program generation for a cylindrical part.
//!
//! The program is built phase by phase: setup, facing, roughing, finishing,
//! tool change, parting and end. Output depends only on the profile and the
//! parameters.

use crate::error::{ConfigurationError, GeometryError, TurnError};
use crate::params::TurnParams;
use crate::pass_planner::{plan_roughing_passes, round3};
use crate::types::{CylinderProfile, Instruction, Phase, Program, Word};
use tracing::info;

/// Diameters and Z positions derived from a profile and a parameter set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutPlan {
    pub finish_diameter: f64,
    pub prefinish_diameter: f64,
    pub stock_diameter: f64,
    /// Diameter of every rapid approach.
    pub start_diameter: f64,
    /// End of every axial cut. The part face is at Z0.
    pub z_end: f64,
    /// Parting position.
    pub part_z: f64,
}

impl CutPlan {
    pub fn new(profile: &CylinderProfile, params: &TurnParams) -> Result<Self, TurnError> {
        for (field, value) in [("length", profile.length), ("diameter", profile.diameter)] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(GeometryError::InvalidProfile { field, value }.into());
            }
        }

        let finish_diameter = round3(profile.diameter);
        let stock_diameter = round3(finish_diameter + 2.0 * params.stock_allowance);
        let prefinish_diameter = round3(finish_diameter + params.finish_allowance);
        if stock_diameter <= prefinish_diameter {
            return Err(ConfigurationError::StockNotAboveTarget {
                stock: stock_diameter,
                target: prefinish_diameter,
            }
            .into());
        }

        let z_end = -round3(profile.length);
        Ok(Self {
            finish_diameter,
            prefinish_diameter,
            stock_diameter,
            start_diameter: round3(stock_diameter + params.approach_clearance),
            z_end,
            part_z: round3(z_end - params.cutoff_extra),
        })
    }
}

/// Collects blocks and keeps phases in order.
struct ProgramBuilder {
    phase: Phase,
    instructions: Vec<Instruction>,
}

impl ProgramBuilder {
    fn new() -> Self {
        Self {
            phase: Phase::Setup,
            instructions: Vec::new(),
        }
    }

    fn enter(&mut self, phase: Phase) {
        debug_assert!(phase >= self.phase, "phase {phase:?} after {:?}", self.phase);
        self.phase = phase;
    }

    fn block(&mut self, words: impl Into<Vec<Word>>) {
        self.instructions.push(Instruction::new(self.phase, words));
    }

    /// Rapid to reference, spindle stop, offset cancel.
    fn home_and_release(&mut self, tool: u8) {
        self.block([
            Word::G(28),
            Word::U(0.0),
            Word::V(0.0),
            Word::W(0.0),
            Word::M(5),
        ]);
        self.block([Word::T {
            station: tool,
            offset: 0,
        }]);
    }

    fn select_tool(&mut self, tool: u8, rpm: u32) {
        self.block([
            Word::G(0),
            Word::T {
                station: tool,
                offset: tool,
            },
        ]);
        self.block([Word::G(97), Word::S(rpm), Word::M(3)]);
    }
}

/// Generate the complete turning program for `profile`.
///
/// Parameters are validated first; no program is produced on error.
pub fn generate_program(
    profile: &CylinderProfile,
    params: &TurnParams,
) -> Result<Program, TurnError> {
    params.validate()?;
    let plan = CutPlan::new(profile, params)?;
    let passes = plan_roughing_passes(
        plan.stock_diameter,
        plan.finish_diameter,
        params.finish_allowance,
        params.rough_step,
    )?;

    let safe_z = params.safe_z;
    let mut b = ProgramBuilder::new();

    b.block([Word::G(21)]);
    b.block([Word::G(18)]);
    b.block([Word::G(40)]);
    b.block([Word::G(80)]);
    b.block([Word::G(97)]);
    b.select_tool(params.turning_tool, params.spindle_rpm);
    b.block([
        Word::G(0),
        Word::G(54),
        Word::X(plan.start_diameter),
        Word::Z(safe_z),
        Word::M(8),
    ]);

    b.enter(Phase::Facing);
    b.block([Word::G(99), Word::G(1), Word::Z(0.0), Word::F(params.feed_face)]);
    b.block([Word::X(0.0)]);
    b.block([Word::G(0), Word::X(plan.start_diameter), Word::Z(safe_z)]);

    b.enter(Phase::Roughing);
    for diameter in &passes {
        b.block([Word::G(0), Word::X(*diameter), Word::Z(safe_z)]);
        b.block([Word::G(1), Word::Z(plan.z_end), Word::F(params.feed_rough)]);
        b.block([Word::G(0), Word::Z(safe_z)]);
    }

    b.enter(Phase::Finishing);
    b.block([Word::G(0), Word::X(plan.prefinish_diameter), Word::Z(safe_z)]);
    b.block([Word::G(1), Word::Z(plan.z_end), Word::F(params.feed_finish)]);
    b.block([Word::G(1), Word::X(plan.finish_diameter)]);
    b.block([Word::G(0), Word::Z(safe_z)]);

    b.enter(Phase::ToolChange);
    b.home_and_release(params.turning_tool);
    if params.optional_stop {
        b.block([Word::M(1)]);
    }

    b.enter(Phase::Parting);
    b.select_tool(params.parting_tool, params.spindle_rpm);
    b.block([
        Word::G(0),
        Word::G(54),
        Word::X(plan.start_diameter),
        Word::Z(plan.part_z),
    ]);
    b.block([
        Word::G(1),
        Word::X(-params.part_overtravel),
        Word::F(params.feed_part),
    ]);
    b.block([Word::G(0), Word::Z(safe_z)]);
    b.home_and_release(params.parting_tool);

    b.enter(Phase::End);
    b.block([Word::M(30)]);

    info!(
        axis = %profile.axis,
        finish_diameter = plan.finish_diameter,
        roughing_passes = passes.len(),
        blocks = b.instructions.len(),
        "generated turning program"
    );
    Ok(Program {
        number: params.program_number,
        instructions: b.instructions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Axis, BoundingBox};

    fn profile(length: f64, diameter: f64) -> CylinderProfile {
        CylinderProfile {
            length,
            diameter,
            axis: Axis::Z,
            bbox: BoundingBox {
                xmin: -diameter / 2.0,
                xmax: diameter / 2.0,
                ymin: -diameter / 2.0,
                ymax: diameter / 2.0,
                zmin: 0.0,
                zmax: length,
            },
        }
    }

    #[test]
    fn test_cut_plan_defaults() {
        let plan = CutPlan::new(&profile(50.0, 20.0), &TurnParams::default()).unwrap();
        assert_eq!(plan.finish_diameter, 20.0);
        assert_eq!(plan.stock_diameter, 22.0);
        assert_eq!(plan.prefinish_diameter, 20.2);
        assert_eq!(plan.start_diameter, 24.0);
        assert_eq!(plan.z_end, -50.0);
        assert_eq!(plan.part_z, -51.5);
    }

    #[test]
    fn test_stock_not_above_target() {
        let params = TurnParams {
            stock_allowance: 0.1,
            finish_allowance: 0.2,
            ..TurnParams::default()
        };
        let err = CutPlan::new(&profile(50.0, 20.0), &params).unwrap_err();
        assert!(matches!(
            err,
            TurnError::Configuration(ConfigurationError::StockNotAboveTarget { .. })
        ));
    }

    #[test]
    fn test_phases_never_go_back() {
        let program = generate_program(&profile(50.0, 20.0), &TurnParams::default()).unwrap();
        assert!(program
            .instructions
            .windows(2)
            .all(|pair| pair[0].phase <= pair[1].phase));
        assert_eq!(program.instructions.first().unwrap().phase, Phase::Setup);
        assert_eq!(program.instructions.last().unwrap().phase, Phase::End);
    }

    #[test]
    fn test_optional_stop_can_be_disabled() {
        let params = TurnParams {
            optional_stop: false,
            ..TurnParams::default()
        };
        let program = generate_program(&profile(50.0, 20.0), &params).unwrap();
        assert!(!program
            .phase(Phase::ToolChange)
            .any(|i| i.words == [Word::M(1)]));
    }
}
