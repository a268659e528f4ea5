//! Serializable view of an engine.
//!
//! A [`Snapshot`] captures everything a renderer needs to draw one engine at
//! the current cycle.

use serde::Serialize;

use crate::common::Word;
use crate::core::pipeline::hazards::HazardDecision;
use crate::core::pipeline::latches::Stage;
use crate::core::Cpu;

/// Disassembly of one stage slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StageView {
    pub stage: Stage,
    pub pc: Option<usize>,
    pub inst: Option<String>,
}

/// Engine state at a cycle boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub cycle: u64,
    pub pc: usize,
    pub finished: bool,
    pub stages: Vec<StageView>,
    pub registers: Vec<Word>,
    pub memory: Vec<Word>,
    pub last_mem_write: Option<usize>,
    pub decision: Option<HazardDecision>,
}

impl Snapshot {
    pub fn capture(cpu: &Cpu) -> Self {
        let stages = cpu
            .pipeline()
            .iter()
            .map(|(stage, slot)| StageView {
                stage,
                pc: slot.entry().map(|e| e.pc),
                inst: slot.inst().map(ToString::to_string),
            })
            .collect();

        Self {
            cycle: cpu.cycle(),
            pc: cpu.pc(),
            finished: cpu.is_finished(),
            stages,
            registers: cpu.regs().as_slice().to_vec(),
            memory: cpu.memory().as_slice().to_vec(),
            last_mem_write: cpu.last_mem_write(),
            decision: cpu.last_decision(),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
