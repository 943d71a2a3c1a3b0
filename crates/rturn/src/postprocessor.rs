use crate::pass_planner::round3;
use crate::types::{GCode, Instruction, Program, Word};
use std::fmt::Write as _;

/// Render a program as Fanuc-style lathe G-code.
///
/// Blocks are written without spaces between words. Coordinates and feeds
/// always carry exactly three decimals; controllers downstream read them as
/// fixed-width fields.
pub fn post_process_fanuc(program: &Program) -> GCode {
    let mut lines = Vec::with_capacity(program.instructions.len() + 3);

    lines.push("%".to_string());
    lines.push(format!("O{:04}", program.number));
    lines.extend(program.instructions.iter().map(render_block));
    lines.push("%".to_string());

    GCode { lines }
}

/// Render one block.
pub fn render_block(instruction: &Instruction) -> String {
    let mut block = String::new();
    for word in &instruction.words {
        // Writing to a String cannot fail.
        let _ = match *word {
            Word::G(code) => write!(block, "G{code}"),
            Word::M(code) => write!(block, "M{code:02}"),
            Word::T { station, offset } => write!(block, "T{station:02}{offset:02}"),
            Word::S(rpm) => write!(block, "S{rpm}"),
            Word::X(v) => write!(block, "X{}", fixed3(v)),
            Word::Z(v) => write!(block, "Z{}", fixed3(v)),
            Word::U(v) => write!(block, "U{}", fixed3(v)),
            Word::V(v) => write!(block, "V{}", fixed3(v)),
            Word::W(v) => write!(block, "W{}", fixed3(v)),
            Word::F(v) => write!(block, "F{}", fixed3(v)),
        };
    }
    block
}

/// Three decimals, with negative zero printed as `0.000`.
fn fixed3(value: f64) -> String {
    let rounded = round3(value);
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.3}")
}
