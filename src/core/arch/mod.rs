//! Architectural state.
//!
//! Holds the programmer-visible register file of the simulated core.

/// General-Purpose Register file implementation.
pub mod gpr;

pub use gpr::Gpr;
