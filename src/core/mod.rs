//! CPU core.
//!
//! The pipeline engine, its architectural state and the per-stage logic.

/// Architectural state (register file).
pub mod arch;

/// The pipeline engine.
pub mod cpu;

/// Stage slots, hazard unit and stage implementations.
pub mod pipeline;

pub use cpu::Cpu;
