//! Simulator configuration.
//!
//! Settings are read from a TOML file. Every section and key is optional and
//! falls back to the defaults below, so an empty file is a valid
//! configuration.

use std::fmt;
use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::common::{SimError, Word};
use crate::core::cpu::memory::DEFAULT_MEMORY_WORDS;

const DEFAULT_CLOCK_HZ: u64 = 1_000_000_000;
const DEFAULT_MAX_CYCLES: u64 = 100_000;
const DEFAULT_AUTO_DELAY_MS: u64 = 400;
const DEFAULT_HISTORY_LEN: usize = 20;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub memory: MemoryConfig,
    pub pipeline: PipelineConfig,
    pub compare: CompareConfig,
}

impl Config {
    /// Reads and parses a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SimError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, SimError> {
        Ok(toml::from_str(content)?)
    }
}

/// How the driver paces cycles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Wait for Enter between cycles.
    Step,
    /// Sleep `auto_delay_ms` between cycles.
    Auto,
    /// Run to completion without pausing.
    #[default]
    Fast,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub trace_instructions: bool,
    pub clock_hz: u64,
    pub max_cycles: u64,
    pub run_mode: RunMode,
    pub auto_delay_ms: u64,
    pub history_len: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace_instructions: false,
            clock_hz: DEFAULT_CLOCK_HZ,
            max_cycles: DEFAULT_MAX_CYCLES,
            run_mode: RunMode::default(),
            auto_delay_ms: DEFAULT_AUTO_DELAY_MS,
            history_len: DEFAULT_HISTORY_LEN,
        }
    }
}

/// One preloaded data memory word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MemInit {
    pub addr: usize,
    pub value: Word,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Data memory size in words.
    pub words: usize,
    /// Words written into memory before the first cycle.
    pub init: Vec<MemInit>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            words: DEFAULT_MEMORY_WORDS,
            init: Vec::new(),
        }
    }
}

/// Behavior switches of one pipeline, fixed for the whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Bypass results from EX to the decode stage instead of stalling.
    pub forwarding: bool,
    /// Resolve branches without the fixed one-cycle penalty.
    pub branch_prediction: bool,
}

impl PipelineConfig {
    pub fn new(forwarding: bool, branch_prediction: bool) -> Self {
        Self {
            forwarding,
            branch_prediction,
        }
    }
}

/// Named combinations of the two pipeline switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum HazardPolicy {
    /// No forwarding, no branch prediction.
    #[value(name = "no_hazard")]
    NoHazard,
    /// Forwarding only.
    #[value(name = "hazard")]
    Hazard,
    /// Branch prediction only.
    #[value(name = "branch")]
    Branch,
    /// Forwarding and branch prediction.
    #[value(name = "hazard_branch")]
    HazardBranch,
}

impl HazardPolicy {
    pub const ALL: [HazardPolicy; 4] = [
        HazardPolicy::NoHazard,
        HazardPolicy::Hazard,
        HazardPolicy::Branch,
        HazardPolicy::HazardBranch,
    ];

    /// The pipeline switches this policy stands for.
    pub fn pipeline(self) -> PipelineConfig {
        match self {
            HazardPolicy::NoHazard => PipelineConfig::new(false, false),
            HazardPolicy::Hazard => PipelineConfig::new(true, false),
            HazardPolicy::Branch => PipelineConfig::new(false, true),
            HazardPolicy::HazardBranch => PipelineConfig::new(true, true),
        }
    }

    /// Human-readable description for reports.
    pub fn describe(self) -> &'static str {
        match self {
            HazardPolicy::NoHazard => "no forwarding, no branch prediction",
            HazardPolicy::Hazard => "forwarding, no branch prediction",
            HazardPolicy::Branch => "branch prediction, no forwarding",
            HazardPolicy::HazardBranch => "forwarding and branch prediction",
        }
    }

    fn name(self) -> &'static str {
        match self {
            HazardPolicy::NoHazard => "no_hazard",
            HazardPolicy::Hazard => "hazard",
            HazardPolicy::Branch => "branch",
            HazardPolicy::HazardBranch => "hazard_branch",
        }
    }
}

impl From<HazardPolicy> for PipelineConfig {
    fn from(policy: HazardPolicy) -> Self {
        policy.pipeline()
    }
}

impl fmt::Display for HazardPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Policies of the two processors compared side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    pub p1: HazardPolicy,
    pub p2: HazardPolicy,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            p1: HazardPolicy::Hazard,
            p2: HazardPolicy::HazardBranch,
        }
    }
}
