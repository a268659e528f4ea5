//! Simulation harness.
//!
//! Program loading, single and two-engine runs, and state snapshots.

/// Two-engine comparison and run history.
pub mod compare;

/// Assembly program loading.
pub mod loader;

/// One engine configured from `[pipeline]`.
pub mod single;

/// Serializable engine state.
pub mod snapshot;

pub use compare::{Comparison, History, RunRecord};
pub use loader::load_program;
pub use single::run_single;
pub use snapshot::Snapshot;
