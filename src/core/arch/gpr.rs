//! General-Purpose Register File.
//!
//! This module implements the 32-entry integer register file. It enforces the
//! architectural invariant that register x0 is always hardwired to zero.

use crate::common::{Reg, Word, REG_COUNT};

/// General-Purpose Register file.
///
/// Contains 32 general-purpose registers (x0-x31). Register x0 is hardwired
/// to zero and cannot be modified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gpr {
    regs: [Word; REG_COUNT],
}

impl Default for Gpr {
    fn default() -> Self {
        Self::new()
    }
}

impl Gpr {
    /// Creates a new register file with all registers initialized to zero.
    pub fn new() -> Self {
        Self {
            regs: [0; REG_COUNT],
        }
    }

    /// Reads a register value.
    ///
    /// Register x0 always returns 0 regardless of storage.
    pub fn read(&self, reg: Reg) -> Word {
        if reg.is_zero() {
            0
        } else {
            self.regs[reg.index()]
        }
    }

    /// Writes a value to a register.
    ///
    /// Writes to register x0 are silently ignored as x0 is hardwired to zero.
    pub fn write(&mut self, reg: Reg, val: Word) {
        if !reg.is_zero() {
            self.regs[reg.index()] = val;
        }
    }

    /// Forces the stored value of x0 back to zero.
    ///
    /// Called at the end of every write-back so the stored array, and not
    /// only `read`, satisfies the x0 invariant.
    pub fn hardwire_zero(&mut self) {
        self.regs[0] = 0;
    }

    /// All 32 register values, indexed by register number.
    pub fn as_slice(&self) -> &[Word] {
        &self.regs
    }

    /// Dumps the contents of all registers to stdout, four per line.
    pub fn dump(&self) {
        for row in (0..REG_COUNT).step_by(4) {
            let line: Vec<String> = (row..row + 4)
                .map(|i| format!("x{:02}: {:<8}", i, self.regs[i]))
                .collect();
            println!("{}", line.join("  ").trim_end());
        }
    }
}
