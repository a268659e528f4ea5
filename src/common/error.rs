//! Error definitions.
//!
//! Parse errors are per source line and non-fatal: the loader drops the line
//! and keeps going. Load and simulation errors are reported by the driver.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Reason a single assembly line could not be turned into an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The first token is not one of the supported mnemonics.
    #[error("unknown mnemonic `{0}`")]
    UnknownMnemonic(String),

    /// Fewer operands than the instruction form requires.
    #[error("`{mnemonic}` expects {expected} operands")]
    MissingOperand {
        /// Mnemonic as written in the source.
        mnemonic: String,
        /// Number of operands the form requires.
        expected: usize,
    },

    /// Operand is not a register name in `x0`..`x31`.
    #[error("invalid register `{0}`")]
    InvalidRegister(String),

    /// Operand is not a signed decimal integer.
    #[error("invalid immediate `{0}`")]
    InvalidImmediate(String),

    /// Operand is not of the form `imm(xN)`.
    #[error("invalid memory operand `{0}`, expected `imm(xN)`")]
    InvalidAddress(String),
}

/// Failure to produce a program from assembly source.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The program file could not be read.
    #[error("could not read program '{}': {source}", path.display())]
    Io {
        /// Path of the program file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Every line was blank, a comment, or malformed.
    #[error("no valid instructions detected")]
    NoValidInstructions,
}

/// Errors surfaced by the simulation driver.
#[derive(Debug, Error)]
pub enum SimError {
    /// The configuration file could not be read.
    #[error("could not read config '{}': {source}", path.display())]
    ConfigIo {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML for [`crate::config::Config`].
    #[error("could not parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A program failed to load.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// A run did not finish within the configured cycle budget.
    #[error("run exceeded {limit} cycles without finishing")]
    CycleLimit {
        /// The configured `max_cycles`.
        limit: u64,
    },

    /// Snapshot serialization failed.
    #[error("could not serialize snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Terminal I/O failed while driving the simulation.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}
