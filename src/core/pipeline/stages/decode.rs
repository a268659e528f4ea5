//! Instruction Decode (ID) Stage.
//!
//! Runs hazard detection for the instruction that just entered ID and
//! records whether the next cycle stalls.

use tracing::trace;

use crate::core::pipeline::hazards::HazardDecision;
use crate::core::Cpu;

/// Executes the decode stage.
///
/// Consults the hazard unit against the current EX, MEM and WB contents. A
/// pending branch penalty forces a stall even when no data hazard exists.
/// The resulting stall flag holds IF and ID during the next cycle.
///
/// # Arguments
///
/// * `cpu` - Mutable reference to the CPU state.
/// * `branch_penalty` - Whether a branch was resolved in EX this cycle with
///   prediction disabled.
pub fn decode_stage(cpu: &mut Cpu, branch_penalty: bool) -> HazardDecision {
    let mut decision = cpu.hazard_unit.decide(&cpu.pipe, cpu.pipe.decode.entry());

    if branch_penalty {
        decision.branch_penalty = true;
        decision.stall = true;
    }

    if let Some(entry) = cpu.pipe.decode.entry() {
        trace!(
            pc = entry.pc,
            inst = %entry.inst,
            stall = decision.stall,
            fwd_a = %decision.forward_a,
            fwd_b = %decision.forward_b,
            "ID"
        );
    }

    if decision.stall {
        if decision.branch_penalty {
            cpu.stats.stalls_control += 1;
        } else {
            cpu.stats.stalls_data += 1;
        }
    }

    cpu.stalled = decision.stall;
    cpu.last_decision = Some(decision);
    decision
}
