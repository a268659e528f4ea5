//! Pipeline slot structures.
//!
//! Each of the five stages owns one slot. A slot is either empty (a bubble)
//! or holds the fetched copy of one instruction. Entries move from slot to
//! slot as the pipeline advances; they are never shared between stages.

use std::fmt;
use std::mem;

use serde::Serialize;

use crate::common::Word;
use crate::core::pipeline::traits::PipelineLatch;
use crate::isa::Instruction;

/// Pipeline stage identifiers, in program order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Stage {
    /// Instruction fetch.
    If,
    /// Instruction decode and hazard detection.
    Id,
    /// Execute and branch resolution.
    Ex,
    /// Data memory access.
    Mem,
    /// Register write-back.
    Wb,
}

impl Stage {
    /// All stages from fetch to write-back.
    pub const ALL: [Stage; 5] = [Stage::If, Stage::Id, Stage::Ex, Stage::Mem, Stage::Wb];

    /// Short upper-case stage name.
    pub fn name(self) -> &'static str {
        match self {
            Stage::If => "IF",
            Stage::Id => "ID",
            Stage::Ex => "EX",
            Stage::Mem => "MEM",
            Stage::Wb => "WB",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fetched instruction in flight.
///
/// Carries the annotations that accumulate as the instruction moves down the
/// pipeline: the program counter it was fetched from and, for `LW` once it has
/// passed MEM, the loaded word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipeEntry {
    /// Index of the instruction in program memory.
    pub pc: usize,
    /// The decoded instruction.
    pub inst: Instruction,
    /// Word read by the MEM stage for loads; `None` until then, and left
    /// `None` when the address was out of range.
    pub load_data: Option<Word>,
}

impl PipeEntry {
    /// Creates the entry for an instruction fetched at `pc`.
    pub fn new(pc: usize, inst: Instruction) -> Self {
        Self {
            pc,
            inst,
            load_data: None,
        }
    }
}

/// Contents of one stage: a bubble or one in-flight instruction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Slot {
    /// No instruction; the stage does no work this cycle.
    #[default]
    Empty,
    /// One in-flight instruction.
    Occupied(PipeEntry),
}

impl Slot {
    /// Returns the entry held by the slot, if any.
    pub fn entry(&self) -> Option<&PipeEntry> {
        match self {
            Slot::Empty => None,
            Slot::Occupied(entry) => Some(entry),
        }
    }

    /// Mutable access to the held entry.
    pub fn entry_mut(&mut self) -> Option<&mut PipeEntry> {
        match self {
            Slot::Empty => None,
            Slot::Occupied(entry) => Some(entry),
        }
    }

    /// Moves the contents out, leaving a bubble behind.
    pub fn take(&mut self) -> Slot {
        mem::take(self)
    }

    /// The held instruction, if any.
    pub fn inst(&self) -> Option<&Instruction> {
        self.entry().map(|e| &e.inst)
    }
}

impl From<PipeEntry> for Slot {
    fn from(entry: PipeEntry) -> Self {
        Slot::Occupied(entry)
    }
}

impl PipelineLatch for Slot {
    fn flush(&mut self) {
        *self = Slot::Empty;
    }

    fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Empty => f.write_str("--"),
            Slot::Occupied(entry) => write!(f, "{}", entry.inst),
        }
    }
}

/// The five pipeline slots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineState {
    /// IF slot.
    pub fetch: Slot,
    /// ID slot.
    pub decode: Slot,
    /// EX slot.
    pub execute: Slot,
    /// MEM slot.
    pub memory: Slot,
    /// WB slot.
    pub writeback: Slot,
}

impl PipelineState {
    /// Returns the slot for `stage`.
    pub fn slot(&self, stage: Stage) -> &Slot {
        match stage {
            Stage::If => &self.fetch,
            Stage::Id => &self.decode,
            Stage::Ex => &self.execute,
            Stage::Mem => &self.memory,
            Stage::Wb => &self.writeback,
        }
    }

    /// Iterates over `(stage, slot)` pairs from IF to WB.
    pub fn iter(&self) -> impl Iterator<Item = (Stage, &Slot)> + '_ {
        Stage::ALL.into_iter().map(move |stage| (stage, self.slot(stage)))
    }

    /// Returns `true` when no stage holds an instruction.
    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, slot)| slot.is_empty())
    }
}
