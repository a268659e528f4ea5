//! Pipeline stage implementations.
//!
//! Each stage is a free function over the CPU state. The engine calls them
//! once per cycle in the order writeback, memory, execute, then (after the
//! slots shift) fetch and decode.

/// Hazard evaluation for the instruction entering ID.
pub mod decode;

/// Branch resolution and IF/ID flush.
pub mod execute;

/// Copies the next program instruction into IF.
pub mod fetch;

/// Data memory loads and stores.
pub mod memory;

/// Register commit and x0 enforcement.
pub mod writeback;

pub use decode::decode_stage;
pub use execute::execute_stage;
pub use fetch::fetch_stage;
pub use memory::mem_stage;
pub use writeback::wb_stage;
