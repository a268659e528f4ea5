//! Decoded instruction representation.
//!
//! Instructions are grouped by format. Each variant carries only the fields
//! that format uses, so stages match on the variant instead of probing for
//! optional fields.

use std::fmt;

use crate::common::{Reg, Word};

/// Operation kind, one per supported mnemonic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// `rd = rs1 + rs2`
    Add,
    /// `rd = rs1 - rs2`
    Sub,
    /// `rd = rs1 & rs2`
    And,
    /// `rd = rs1 | rs2`
    Or,
    /// `rd = rs1 * rs2`
    Mul,
    /// `rd = (rs1 < rs2) as Word`
    Slt,
    /// `rd = rs1 + imm`
    Addi,
    /// `rd = mem[rs1 + imm]`
    Lw,
    /// `mem[rs1 + imm] = rs2`
    Sw,
    /// Branch to `pc + imm` when `rs1 == rs2`.
    Beq,
    /// Branch to `pc + imm` when `rs1 != rs2`.
    Bne,
}

impl Opcode {
    /// All opcodes, in mnemonic table order.
    pub const ALL: [Opcode; 11] = [
        Opcode::Add,
        Opcode::Sub,
        Opcode::And,
        Opcode::Or,
        Opcode::Mul,
        Opcode::Slt,
        Opcode::Addi,
        Opcode::Lw,
        Opcode::Sw,
        Opcode::Beq,
        Opcode::Bne,
    ];

    /// Upper-case assembly mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Mul => "MUL",
            Opcode::Slt => "SLT",
            Opcode::Addi => "ADDI",
            Opcode::Lw => "LW",
            Opcode::Sw => "SW",
            Opcode::Beq => "BEQ",
            Opcode::Bne => "BNE",
        }
    }

    /// Looks up a mnemonic, ignoring case.
    pub fn from_mnemonic(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Register-register ALU operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AluOp {
    /// Wrapping addition.
    Add,
    /// Wrapping subtraction.
    Sub,
    /// Bitwise AND.
    And,
    /// Bitwise OR.
    Or,
    /// Wrapping multiplication.
    Mul,
    /// Signed set-less-than.
    Slt,
}

impl AluOp {
    /// Computes the operation on two register values.
    pub fn apply(self, a: Word, b: Word) -> Word {
        match self {
            AluOp::Add => a.wrapping_add(b),
            AluOp::Sub => a.wrapping_sub(b),
            AluOp::And => a & b,
            AluOp::Or => a | b,
            AluOp::Mul => a.wrapping_mul(b),
            AluOp::Slt => Word::from(a < b),
        }
    }
}

/// Conditional branch comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BranchOp {
    /// Taken when the operands are equal.
    Beq,
    /// Taken when the operands differ.
    Bne,
}

impl BranchOp {
    /// Evaluates the branch condition.
    pub fn taken(self, a: Word, b: Word) -> bool {
        match self {
            BranchOp::Beq => a == b,
            BranchOp::Bne => a != b,
        }
    }
}

/// A decoded instruction template as held in program memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// R-type: `OP rd, rs1, rs2`.
    Alu {
        /// ALU operation.
        op: AluOp,
        /// Destination register.
        rd: Reg,
        /// First source register.
        rs1: Reg,
        /// Second source register.
        rs2: Reg,
    },
    /// `ADDI rd, rs1, imm`.
    Addi {
        /// Destination register.
        rd: Reg,
        /// Source register.
        rs1: Reg,
        /// Signed immediate.
        imm: Word,
    },
    /// `LW rd, imm(rs1)`.
    Lw {
        /// Destination register.
        rd: Reg,
        /// Base address register.
        rs1: Reg,
        /// Address offset.
        imm: Word,
    },
    /// `SW rs2, imm(rs1)`.
    Sw {
        /// Base address register.
        rs1: Reg,
        /// Register holding the value to store.
        rs2: Reg,
        /// Address offset.
        imm: Word,
    },
    /// `BEQ`/`BNE rs1, rs2, imm`.
    Branch {
        /// Comparison kind.
        op: BranchOp,
        /// First compared register.
        rs1: Reg,
        /// Second compared register.
        rs2: Reg,
        /// Target offset, in instructions, from the branch's own pc.
        imm: Word,
    },
}

impl Instruction {
    /// Returns the operation kind.
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Alu { op, .. } => match op {
                AluOp::Add => Opcode::Add,
                AluOp::Sub => Opcode::Sub,
                AluOp::And => Opcode::And,
                AluOp::Or => Opcode::Or,
                AluOp::Mul => Opcode::Mul,
                AluOp::Slt => Opcode::Slt,
            },
            Instruction::Addi { .. } => Opcode::Addi,
            Instruction::Lw { .. } => Opcode::Lw,
            Instruction::Sw { .. } => Opcode::Sw,
            Instruction::Branch { op, .. } => match op {
                BranchOp::Beq => Opcode::Beq,
                BranchOp::Bne => Opcode::Bne,
            },
        }
    }

    /// Destination register, if the instruction writes one.
    ///
    /// `x0` is reported like any other register; the hazard unit compares
    /// against it as written.
    pub fn dest(&self) -> Option<Reg> {
        match *self {
            Instruction::Alu { rd, .. }
            | Instruction::Addi { rd, .. }
            | Instruction::Lw { rd, .. } => Some(rd),
            Instruction::Sw { .. } | Instruction::Branch { .. } => None,
        }
    }

    /// Source registers `(rs1, rs2)`. `rs2` is absent for `ADDI` and `LW`.
    pub fn sources(&self) -> (Option<Reg>, Option<Reg>) {
        match *self {
            Instruction::Alu { rs1, rs2, .. }
            | Instruction::Sw { rs1, rs2, .. }
            | Instruction::Branch { rs1, rs2, .. } => (Some(rs1), Some(rs2)),
            Instruction::Addi { rs1, .. } | Instruction::Lw { rs1, .. } => (Some(rs1), None),
        }
    }

    /// Returns `true` for `LW`.
    pub fn is_load(&self) -> bool {
        matches!(self, Instruction::Lw { .. })
    }

    /// Returns `true` for `SW`.
    pub fn is_store(&self) -> bool {
        matches!(self, Instruction::Sw { .. })
    }

    /// Returns `true` for `BEQ` and `BNE`.
    pub fn is_branch(&self) -> bool {
        matches!(self, Instruction::Branch { .. })
    }
}
