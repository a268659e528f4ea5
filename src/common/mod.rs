//! Common types shared throughout the pipeline simulator.
//!
//! This module provides the register index and word types, the memory access
//! classification, and the error types used by the parser, loader and driver.

/// Memory access type definitions.
pub mod data;

/// Error types for parsing, loading and running programs.
pub mod error;

/// Register index and machine word types.
pub mod reg;

pub use data::AccessType;
pub use error::{LoadError, ParseError, SimError};
pub use reg::{Reg, Word, REG_COUNT};
