//! Memory Access Types.
//!
//! Classifies data memory accesses made by the MEM stage. The data memory
//! has no protection model, so the classification only feeds diagnostics
//! for accesses that fall outside the array and are skipped.

use std::fmt;

/// Type of data memory access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    /// Data read performed by `LW`.
    Read,

    /// Data write performed by `SW`.
    Write,
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessType::Read => write!(f, "load"),
            AccessType::Write => write!(f, "store"),
        }
    }
}
