//! Memory Access (MEM) Stage.
//!
//! Performs the data memory access of the instruction in MEM. Addresses are
//! word indices: base register plus immediate offset. Accesses outside the
//! data memory are skipped.

use tracing::trace;

use crate::core::Cpu;
use crate::isa::Instruction;

/// Executes the memory stage.
///
/// `SW` writes the `rs2` value and updates the last-write marker. `LW`
/// captures the word into the entry so writeback can commit it.
///
/// # Arguments
///
/// * `cpu` - Mutable reference to the CPU state.
pub fn mem_stage(cpu: &mut Cpu) {
    let Some(entry) = cpu.pipe.memory.entry_mut() else {
        return;
    };

    match entry.inst {
        Instruction::Sw { rs1, rs2, imm } => {
            let addr = cpu.regs.read(rs1).wrapping_add(imm);
            let val = cpu.regs.read(rs2);
            let stored = cpu.memory.store(addr, val);
            trace!(pc = entry.pc, addr, val, stored, "MEM store");
        }
        Instruction::Lw { rs1, imm, .. } => {
            let addr = cpu.regs.read(rs1).wrapping_add(imm);
            entry.load_data = cpu.memory.load(addr);
            trace!(pc = entry.pc, addr, loaded = ?entry.load_data, "MEM load");
        }
        _ => trace!(pc = entry.pc, "MEM"),
    }
}
