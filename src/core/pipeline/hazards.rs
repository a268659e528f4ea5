//! Data Hazard Detection and Forwarding.
//!
//! This module decides, once per cycle, how the instruction in the decode
//! stage gets its operands. It provides:
//! 1. **Hazard Detection:** Identifies load-use hazards, and RAW hazards that
//!    cannot be forwarded, both of which stall the pipeline for a cycle.
//! 2. **Operand Forwarding:** Selects the nearest later stage (EX, then MEM,
//!    then WB) whose destination matches each source register.
//!
//! The decision is a pure function of the pipeline contents and the
//! forwarding setting.

use std::fmt;

use serde::Serialize;

use crate::common::Reg;
use crate::core::pipeline::latches::{PipeEntry, PipelineState, Slot};

/// Stage an operand is forwarded from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ForwardSource {
    /// Operand is read from the register file.
    #[default]
    None,
    /// Result of the instruction in EX.
    Ex,
    /// Result of the instruction in MEM.
    Mem,
    /// Result of the instruction in WB.
    Wb,
}

impl ForwardSource {
    /// Returns `true` unless the source is [`ForwardSource::None`].
    pub fn is_forwarded(self) -> bool {
        self != ForwardSource::None
    }
}

impl fmt::Display for ForwardSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ForwardSource::None => "NO",
            ForwardSource::Ex => "EX",
            ForwardSource::Mem => "MEM",
            ForwardSource::Wb => "WB",
        })
    }
}

/// Outcome of hazard detection for one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HazardDecision {
    /// Stall the next cycle: hold IF/ID and insert a bubble into EX.
    pub stall: bool,
    /// Source of the decode instruction's `rs1`.
    pub forward_a: ForwardSource,
    /// Source of the decode instruction's `rs2`.
    pub forward_b: ForwardSource,
    /// A branch reached EX with prediction disabled this cycle.
    pub branch_penalty: bool,
}

/// Hazard detection unit for the decode stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HazardUnit {
    forwarding: bool,
}

impl HazardUnit {
    /// Creates a hazard unit; `forwarding` enables bypassing from EX.
    pub fn new(forwarding: bool) -> Self {
        Self { forwarding }
    }

    /// Decides stalls and forwarding for the instruction in decode.
    ///
    /// Rules, in precedence order:
    /// 1. Load in EX feeding a decode source: stall, no forwarding.
    /// 2. EX destination matches a source: forward from EX, or stall when
    ///    forwarding is disabled.
    /// 3. MEM destination matches a still unresolved source: forward from MEM.
    /// 4. WB destination matches a still unresolved source: forward from WB.
    ///
    /// # Arguments
    ///
    /// * `state` - The pipeline slots; only EX, MEM and WB are consulted.
    /// * `decode` - The instruction in ID, if any.
    pub fn decide(&self, state: &PipelineState, decode: Option<&PipeEntry>) -> HazardDecision {
        let mut hazard = HazardDecision::default();
        let Some(id_entry) = decode else {
            return hazard;
        };

        if need_stall_load_use(&state.execute, id_entry) {
            hazard.stall = true;
            return hazard;
        }

        let (rs1, rs2) = id_entry.inst.sources();

        if let Some(rd) = dest_of(&state.execute) {
            if same_reg(rd, rs1) {
                if self.forwarding {
                    hazard.forward_a = ForwardSource::Ex;
                } else {
                    hazard.stall = true;
                }
            }
            if same_reg(rd, rs2) {
                if self.forwarding {
                    hazard.forward_b = ForwardSource::Ex;
                } else {
                    hazard.stall = true;
                }
            }
        }

        for (slot, source) in [
            (&state.memory, ForwardSource::Mem),
            (&state.writeback, ForwardSource::Wb),
        ] {
            let Some(rd) = dest_of(slot) else {
                continue;
            };
            if same_reg(rd, rs1) && !hazard.forward_a.is_forwarded() {
                hazard.forward_a = source;
            }
            if same_reg(rd, rs2) && !hazard.forward_b.is_forwarded() {
                hazard.forward_b = source;
            }
        }

        hazard
    }
}

/// Checks if a stall is needed due to a load-use data hazard.
///
/// A load-use hazard occurs when the instruction in decode reads a register
/// that the load currently in EX has not fetched from memory yet. The value
/// only exists after MEM, so forwarding cannot help this cycle.
///
/// # Arguments
///
/// * `ex` - The EX slot.
/// * `id_entry` - The instruction in decode.
///
/// # Returns
///
/// `true` if the decode instruction must wait one cycle, `false` otherwise.
pub fn need_stall_load_use(ex: &Slot, id_entry: &PipeEntry) -> bool {
    let Some(ex_entry) = ex.entry() else {
        return false;
    };
    if !ex_entry.inst.is_load() {
        return false;
    }
    let Some(rd) = ex_entry.inst.dest() else {
        return false;
    };

    let (rs1, rs2) = id_entry.inst.sources();
    same_reg(rd, rs1) || same_reg(rd, rs2)
}

fn dest_of(slot: &Slot) -> Option<Reg> {
    slot.inst().and_then(|inst| inst.dest())
}

fn same_reg(rd: Reg, src: Option<Reg>) -> bool {
    src == Some(rd)
}
