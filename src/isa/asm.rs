//! Assembly parser.
//!
//! Turns source text into instruction templates. Parsing is line-oriented and
//! forgiving: commas are treated as whitespace, mnemonics are matched without
//! regard to case, and tokens after the required operands are ignored. A line
//! that fits none of the instruction forms is reported as a [`ParseError`];
//! [`parse_program`] drops such lines and keeps the rest.

use tracing::debug;

use crate::common::{LoadError, ParseError, Reg, Word};
use crate::isa::instruction::{AluOp, BranchOp, Instruction, Opcode};

/// Character that starts a comment line.
const COMMENT_PREFIX: char = '#';

/// Parses a single source line.
///
/// Returns `Ok(None)` for blank lines and comment lines.
///
/// # Examples
///
/// ```
/// use riscv_pipeline::isa::{parse_line, Instruction};
/// use riscv_pipeline::common::Reg;
///
/// let inst = parse_line("lw x1, 8(x2)").unwrap().unwrap();
/// assert_eq!(
///     inst,
///     Instruction::Lw { rd: Reg::new(1).unwrap(), rs1: Reg::new(2).unwrap(), imm: 8 }
/// );
/// assert_eq!(parse_line("# comment").unwrap(), None);
/// ```
pub fn parse_line(line: &str) -> Result<Option<Instruction>, ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
        return Ok(None);
    }

    let normalized = line.replace(',', " ");
    let tokens: Vec<&str> = normalized.split_whitespace().collect();
    let Some((&mnemonic, operands)) = tokens.split_first() else {
        return Ok(None);
    };

    let opcode = Opcode::from_mnemonic(mnemonic)
        .ok_or_else(|| ParseError::UnknownMnemonic(mnemonic.to_string()))?;

    let operand = |i: usize, expected: usize| {
        operands
            .get(i)
            .copied()
            .ok_or_else(|| ParseError::MissingOperand {
                mnemonic: mnemonic.to_string(),
                expected,
            })
    };

    let inst = match opcode {
        Opcode::Add | Opcode::Sub | Opcode::And | Opcode::Or | Opcode::Mul | Opcode::Slt => {
            let op = match opcode {
                Opcode::Add => AluOp::Add,
                Opcode::Sub => AluOp::Sub,
                Opcode::And => AluOp::And,
                Opcode::Or => AluOp::Or,
                Opcode::Mul => AluOp::Mul,
                _ => AluOp::Slt,
            };
            Instruction::Alu {
                op,
                rd: parse_reg(operand(0, 3)?)?,
                rs1: parse_reg(operand(1, 3)?)?,
                rs2: parse_reg(operand(2, 3)?)?,
            }
        }
        Opcode::Addi => Instruction::Addi {
            rd: parse_reg(operand(0, 3)?)?,
            rs1: parse_reg(operand(1, 3)?)?,
            imm: parse_imm(operand(2, 3)?)?,
        },
        Opcode::Lw => {
            let rd = parse_reg(operand(0, 2)?)?;
            let (imm, rs1) = parse_mem_operand(operand(1, 2)?)?;
            Instruction::Lw { rd, rs1, imm }
        }
        Opcode::Sw => {
            let rs2 = parse_reg(operand(0, 2)?)?;
            let (imm, rs1) = parse_mem_operand(operand(1, 2)?)?;
            Instruction::Sw { rs1, rs2, imm }
        }
        Opcode::Beq | Opcode::Bne => Instruction::Branch {
            op: if opcode == Opcode::Beq {
                BranchOp::Beq
            } else {
                BranchOp::Bne
            },
            rs1: parse_reg(operand(0, 3)?)?,
            rs2: parse_reg(operand(1, 3)?)?,
            imm: parse_imm(operand(2, 3)?)?,
        },
    };

    Ok(Some(inst))
}

/// Parses a whole program, skipping blank, comment and malformed lines.
///
/// # Errors
///
/// Returns [`LoadError::NoValidInstructions`] when no line yields an
/// instruction.
pub fn parse_program(source: &str) -> Result<Vec<Instruction>, LoadError> {
    let mut program = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(inst)) => program.push(inst),
            Ok(None) => {}
            Err(err) => debug!(line = idx + 1, text = line.trim(), %err, "skipping source line"),
        }
    }

    if program.is_empty() {
        return Err(LoadError::NoValidInstructions);
    }
    Ok(program)
}

/// Parses a register name `x0`..`x31`.
fn parse_reg(token: &str) -> Result<Reg, ParseError> {
    token
        .strip_prefix(['x', 'X'])
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse::<usize>().ok())
        .and_then(Reg::new)
        .ok_or_else(|| ParseError::InvalidRegister(token.to_string()))
}

/// Parses a signed decimal immediate.
fn parse_imm(token: &str) -> Result<Word, ParseError> {
    token
        .parse::<Word>()
        .map_err(|_| ParseError::InvalidImmediate(token.to_string()))
}

/// Parses an `imm(xN)` memory operand into `(imm, base)`.
fn parse_mem_operand(token: &str) -> Result<(Word, Reg), ParseError> {
    let invalid = || ParseError::InvalidAddress(token.to_string());

    let (imm, rest) = token.split_once('(').ok_or_else(invalid)?;
    let (base, _) = rest.split_once(')').ok_or_else(invalid)?;

    let digits = imm.strip_prefix('-').unwrap_or(imm);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let imm = imm.parse::<Word>().map_err(|_| invalid())?;
    let base = parse_reg(base).map_err(|_| invalid())?;
    Ok((imm, base))
}
