//! Instruction Fetch (IF) Stage.

use tracing::trace;

use crate::core::pipeline::latches::{PipeEntry, Slot};
use crate::core::Cpu;

/// Executes the fetch stage.
///
/// Copies `program[pc]` into IF, tagged with its PC, and advances the PC by
/// one. Once the PC is past the end of the program IF stays empty.
///
/// # Arguments
///
/// * `cpu` - Mutable reference to the CPU state.
pub fn fetch_stage(cpu: &mut Cpu) {
    cpu.pipe.fetch = match cpu.program.get(cpu.pc) {
        Some(&inst) => {
            trace!(pc = cpu.pc, %inst, "IF");
            let entry = PipeEntry::new(cpu.pc, inst);
            cpu.pc += 1;
            Slot::from(entry)
        }
        None => Slot::Empty,
    };
}
