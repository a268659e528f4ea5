//! Instruction formatting.
//!
//! Renders instructions back into the assembly syntax accepted by
//! [`crate::isa::asm`], which is what the pipeline view shows in each stage.

use std::fmt;

use crate::isa::instruction::Instruction;

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = self.opcode();
        match *self {
            Instruction::Alu { rd, rs1, rs2, .. } => write!(f, "{op} {rd}, {rs1}, {rs2}"),
            Instruction::Addi { rd, rs1, imm } => write!(f, "{op} {rd}, {rs1}, {imm}"),
            Instruction::Lw { rd, rs1, imm } => write!(f, "{op} {rd}, {imm}({rs1})"),
            Instruction::Sw { rs1, rs2, imm } => write!(f, "{op} {rs2}, {imm}({rs1})"),
            Instruction::Branch { rs1, rs2, imm, .. } => write!(f, "{op} {rs1}, {rs2}, {imm}"),
        }
    }
}

/// Formats a program as a numbered listing, one instruction per line.
pub fn listing(program: &[Instruction]) -> String {
    program
        .iter()
        .enumerate()
        .map(|(pc, inst)| format!("{pc:>4}: {inst}\n"))
        .collect()
}
