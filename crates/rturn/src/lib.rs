mod error;
mod geometry;
mod params;
mod pass_planner;
mod pipeline;
mod postprocessor;
mod program;
mod types;

pub use error::*;
pub use geometry::*;
pub use params::TurnParams;
pub use pass_planner::{plan_roughing_passes, round3, MAX_ROUGH_PASSES, MIN_ROUGH_STEP};
pub use pipeline::*;
pub use postprocessor::{post_process_fanuc, render_block};
pub use program::{generate_program, CutPlan};
pub use types::*;
