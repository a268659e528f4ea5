//! Writeback (WB) Stage.
//!
//! Commits the result of the instruction in WB to the register file. Results
//! are computed here from the register file as it stands at the start of the
//! cycle, since this stage runs before any other stage touches state.

use tracing::trace;

use crate::common::Word;
use crate::core::Cpu;
use crate::isa::Instruction;

/// Executes the writeback stage.
///
/// Stores, branches and empty slots write nothing. A load whose address was
/// out of range writes 0. After the write x0 is forced back to zero.
///
/// # Arguments
///
/// * `cpu` - Mutable reference to the CPU state.
pub fn wb_stage(cpu: &mut Cpu) {
    let Some(wb) = cpu.pipe.writeback.entry() else {
        return;
    };
    let (pc, inst, load_data) = (wb.pc, wb.inst, wb.load_data);

    cpu.stats.record_retired(&inst);

    let result: Option<Word> = match inst {
        Instruction::Alu { op, rs1, rs2, .. } => {
            Some(op.apply(cpu.regs.read(rs1), cpu.regs.read(rs2)))
        }
        Instruction::Addi { rs1, imm, .. } => Some(cpu.regs.read(rs1).wrapping_add(imm)),
        Instruction::Lw { .. } => Some(load_data.unwrap_or(0)),
        Instruction::Sw { .. } | Instruction::Branch { .. } => None,
    };

    match (inst.dest(), result) {
        (Some(rd), Some(val)) => {
            trace!(pc, %inst, %rd, val, "WB");
            cpu.regs.write(rd, val);
        }
        _ => trace!(pc, %inst, "WB"),
    }

    cpu.regs.hardwire_zero();
}
