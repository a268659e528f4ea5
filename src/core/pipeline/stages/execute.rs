//! Execute (EX) Stage.
//!
//! Resolves conditional branches. Arithmetic results are produced at
//! writeback, so the only work here is control flow: comparing the branch
//! operands, redirecting the PC and flushing the younger instructions.

use tracing::{debug, trace};

use crate::core::pipeline::traits::PipelineLatch;
use crate::core::Cpu;
use crate::isa::Instruction;

/// Executes the execute stage.
///
/// A taken branch redirects the PC to `pc + imm` and flushes IF and ID. A
/// target outside the program sets the PC to the program length so the
/// pipeline drains. Branch operands come straight from the register file.
///
/// # Arguments
///
/// * `cpu` - Mutable reference to the CPU state.
///
/// # Returns
///
/// `true` if a branch was in EX and branch prediction is disabled, meaning
/// the next cycle pays the fixed branch penalty.
pub fn execute_stage(cpu: &mut Cpu) -> bool {
    let Some(entry) = cpu.pipe.execute.entry() else {
        return false;
    };
    let Instruction::Branch { op, rs1, rs2, imm } = entry.inst else {
        trace!(pc = entry.pc, inst = %entry.inst, "EX");
        return false;
    };
    let pc = entry.pc;

    let taken = op.taken(cpu.regs.read(rs1), cpu.regs.read(rs2));
    trace!(pc, inst = %entry.inst, taken, "EX branch");

    if taken {
        let len = cpu.program.len();
        cpu.pc = i64::try_from(pc)
            .ok()
            .map(|base| base.wrapping_add(imm))
            .and_then(|target| usize::try_from(target).ok())
            .filter(|&target| target < len)
            .unwrap_or(len);
        cpu.pipe.fetch.flush();
        cpu.pipe.decode.flush();
        cpu.stats.branches_taken += 1;
        cpu.stats.flushes += 1;
        debug!(pc, target = cpu.pc, "branch taken, flushing IF/ID");
    }

    !cpu.config.branch_prediction
}
