//! Single-engine runs driven by the `[pipeline]` configuration section.

use tracing::info;

use crate::common::SimError;
use crate::config::Config;
use crate::core::Cpu;
use crate::isa::Instruction;

/// Builds one engine from `config.pipeline` and `config.memory` and runs it
/// to completion.
///
/// # Errors
///
/// [`SimError::CycleLimit`] if the run does not finish within
/// `general.max_cycles`.
pub fn run_single(program: Vec<Instruction>, config: &Config) -> Result<Cpu, SimError> {
    let mut cpu = Cpu::with_memory(program, config.pipeline, &config.memory);
    let limit = config.general.max_cycles;
    if !cpu.run(limit) {
        return Err(SimError::CycleLimit { limit });
    }
    info!(
        cycles = cpu.cycle(),
        stalls = cpu.stats().stalls(),
        "single run finished"
    );
    Ok(cpu)
}
