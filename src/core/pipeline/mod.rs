//! Instruction pipeline implementation.
//!
//! This module contains the five-stage instruction pipeline (fetch, decode,
//! execute, memory, writeback), the per-stage slots, and hazard detection
//! and forwarding logic.

/// Pipeline hazard detection and forwarding logic.
pub mod hazards;

/// Per-stage slots and the in-flight instruction entry.
pub mod latches;

/// Pipeline stage implementations (fetch, decode, execute, memory, writeback).
pub mod stages;

/// Traits for pipeline slots.
pub mod traits;
