//! Instruction Set Architecture definitions.
//!
//! The simulated ISA is a small RV32I-like subset: six register-register ALU
//! operations, `ADDI`, `LW`, `SW`, `BEQ` and `BNE`. Programs are written as
//! assembly text, one instruction per line.

/// Line-oriented assembly parser.
pub mod asm;

/// Textual formatting of instructions.
pub mod disasm;

/// Decoded instruction representation.
pub mod instruction;

pub use asm::{parse_line, parse_program};
pub use instruction::{AluOp, BranchOp, Instruction, Opcode};
