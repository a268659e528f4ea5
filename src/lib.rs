//! Five-Stage Pipeline Simulator Library.
//!
//! This crate implements a cycle-accurate simulator of a classic in-order
//! RISC-V style pipeline (IF, ID, EX, MEM, WB) for a small integer subset:
//! ADD, SUB, AND, OR, MUL, SLT, ADDI, LW, SW, BEQ and BNE.
//!
//! # Architecture
//!
//! * **Core**: the pipeline engine, advancing one clock cycle per step.
//! * **Hazards**: load-use and RAW detection with EX/MEM/WB forwarding.
//! * **Branches**: resolved in EX, with an optional fixed one-cycle penalty.
//!
//! # Modules
//!
//! * `common`: Shared types and error handling.
//! * `config`: Configuration loading and parsing.
//! * `core`: Pipeline engine and stage logic.
//! * `isa`: Instruction definitions, assembler and disassembler.
//! * `sim`: Program loading, comparison harness and snapshots.
//! * `stats`: Performance statistics collection.

/// Shared types, error handling, and register definitions.
pub mod common;

/// Configuration system for memory, pipeline and driver settings.
///
/// Loads and parses TOML configuration files.
pub mod config;

/// Pipeline engine implementation.
///
/// Implements the 5-stage in-order pipeline (Fetch, Decode, Execute, Memory,
/// Writeback), the register file, data memory and hazard unit.
pub mod core;

/// Instruction set definitions, assembler and disassembler.
pub mod isa;

/// Simulation harness, program loader, and execution orchestration.
pub mod sim;

/// Performance statistics collection and reporting.
pub mod stats;
