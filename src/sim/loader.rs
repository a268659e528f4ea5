//! Program Loader.
//!
//! Reads assembly source files from disk and assembles them into the
//! instruction list consumed by the pipeline engine.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::common::LoadError;
use crate::isa::{self, Instruction};

/// Loads and assembles a program file.
///
/// Malformed lines are dropped by the assembler; the load only fails when the
/// file cannot be read or yields no instructions at all.
pub fn load_program(path: impl AsRef<Path>) -> Result<Vec<Instruction>, LoadError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let program = isa::parse_program(&source)?;
    info!(path = %path.display(), instructions = program.len(), "loaded program");
    Ok(program)
}
