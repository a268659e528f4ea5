//! Register indices and machine words.
//!
//! Registers are named `x0`..`x31`. `Reg` guarantees the index is in range so
//! the register file can index its array without further checks.

use std::fmt;

/// Number of general-purpose registers.
pub const REG_COUNT: usize = 32;

/// Machine word held by registers and data memory.
pub type Word = i64;

/// Index of a general-purpose register (`x0`..`x31`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Reg(u8);

impl Reg {
    /// The hardwired zero register `x0`.
    pub const ZERO: Reg = Reg(0);

    /// Creates a register index, returning `None` when `idx` is not below 32.
    pub fn new(idx: usize) -> Option<Self> {
        if idx < REG_COUNT {
            Some(Reg(idx as u8))
        } else {
            None
        }
    }

    /// Returns the register number as an array index.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns `true` for `x0`.
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}
