//! Pipeline Engine.
//!
//! The CPU owns the five stage slots, the register file, the data memory and
//! the program counter, and advances the whole machine by one clock cycle per
//! [`Cpu::step`].

/// Word-addressed data memory.
pub mod memory;

use tracing::debug;

use self::memory::DataMemory;
use crate::common::{Reg, Word};
use crate::config::{MemoryConfig, PipelineConfig};
use crate::core::arch::Gpr;
use crate::core::pipeline::hazards::{HazardDecision, HazardUnit};
use crate::core::pipeline::latches::{PipelineState, Slot, Stage};
use crate::core::pipeline::stages;
use crate::isa::Instruction;
use crate::stats::SimStats;

/// A five-stage in-order pipeline running one program.
#[derive(Clone, Debug)]
pub struct Cpu {
    pub(crate) program: Vec<Instruction>,
    pub(crate) pipe: PipelineState,
    pub(crate) regs: Gpr,
    pub(crate) memory: DataMemory,
    pub(crate) pc: usize,
    cycle: u64,
    /// Stall decided at the end of the previous cycle.
    pub(crate) stalled: bool,
    finished: bool,
    pub(crate) hazard_unit: HazardUnit,
    pub(crate) config: PipelineConfig,
    pub(crate) last_decision: Option<HazardDecision>,
    pub(crate) stats: SimStats,
}

impl Cpu {
    /// Creates an engine with the default 64-word data memory.
    pub fn new(program: Vec<Instruction>, config: PipelineConfig) -> Self {
        Self::with_memory(program, config, &MemoryConfig::default())
    }

    /// Creates an engine with a configured data memory.
    ///
    /// Initial words from `memory.init` are preloaded; entries outside the
    /// memory are ignored.
    pub fn with_memory(
        program: Vec<Instruction>,
        config: PipelineConfig,
        memory: &MemoryConfig,
    ) -> Self {
        let mut data = DataMemory::new(memory.words);
        for init in &memory.init {
            data.preload(init.addr, init.value);
        }

        Self {
            program,
            pipe: PipelineState::default(),
            regs: Gpr::new(),
            memory: data,
            pc: 0,
            cycle: 0,
            stalled: false,
            finished: false,
            hazard_unit: HazardUnit::new(config.forwarding),
            config,
            last_decision: None,
            stats: SimStats::default(),
        }
    }

    /// Advances the pipeline by one clock cycle.
    ///
    /// # Logic Flow
    /// 1. **Writeback**, **Memory**, **Execute** run against the slots as
    ///    they stood at the end of the previous cycle. Execute may redirect
    ///    the PC and flush IF/ID.
    /// 2. **Shift**: every instruction moves down one stage. If the previous
    ///    cycle decided to stall, EX receives a bubble and IF/ID hold.
    /// 3. **Fetch** runs only when no stall was pending.
    /// 4. If every slot is now empty the run is finished.
    /// 5. **Decode** evaluates hazards for the next cycle.
    ///
    /// # Returns
    ///
    /// The hazard decision for the next cycle, or `None` once the run has
    /// finished. The step that drains the pipeline commits its writeback but
    /// does not count as a cycle.
    pub fn step(&mut self) -> Option<HazardDecision> {
        if self.finished {
            return None;
        }

        let stall_pending = self.stalled;

        stages::wb_stage(self);
        stages::mem_stage(self);
        let branch_penalty = stages::execute_stage(self);

        self.advance(stall_pending);

        if !stall_pending {
            stages::fetch_stage(self);
        }

        if self.pipe.is_empty() {
            self.finished = true;
            self.stalled = false;
            debug!(cycles = self.cycle, "pipeline drained");
            return None;
        }

        self.cycle += 1;
        self.stats.cycles = self.cycle;

        Some(stages::decode_stage(self, branch_penalty))
    }

    /// Steps until the run finishes or `max_cycles` cycles have elapsed.
    ///
    /// # Returns
    ///
    /// `true` if the run finished within the budget.
    pub fn run(&mut self, max_cycles: u64) -> bool {
        while self.step().is_some() {
            if self.cycle > max_cycles {
                return false;
            }
        }
        true
    }

    fn advance(&mut self, stall_pending: bool) {
        let pipe = &mut self.pipe;
        pipe.writeback = pipe.memory.take();
        pipe.memory = pipe.execute.take();
        if stall_pending {
            pipe.execute = Slot::Empty;
        } else {
            pipe.execute = pipe.decode.take();
            pipe.decode = pipe.fetch.take();
        }
    }

    /// Number of cycles executed so far.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Index of the next instruction to fetch.
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Returns `true` once every slot is empty and nothing is left to fetch.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether the next cycle stalls.
    pub fn is_stalled(&self) -> bool {
        self.stalled
    }

    pub fn pipeline(&self) -> &PipelineState {
        &self.pipe
    }

    pub fn slot(&self, stage: Stage) -> &Slot {
        self.pipe.slot(stage)
    }

    pub fn regs(&self) -> &Gpr {
        &self.regs
    }

    pub fn memory(&self) -> &DataMemory {
        &self.memory
    }

    /// Address of the most recent store, if any.
    pub fn last_mem_write(&self) -> Option<usize> {
        self.memory.last_write()
    }

    /// Decision returned by the most recent counted cycle.
    pub fn last_decision(&self) -> Option<HazardDecision> {
        self.last_decision
    }

    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    pub fn config(&self) -> PipelineConfig {
        self.config
    }

    pub fn program(&self) -> &[Instruction] {
        &self.program
    }

    /// Seeds a register before the run. Writes to x0 are ignored.
    pub fn write_register(&mut self, reg: Reg, val: Word) {
        self.regs.write(reg, val);
    }

    /// Seeds a data memory word before the run. Out-of-range addresses are
    /// ignored and the last-write marker is left alone.
    pub fn write_memory(&mut self, addr: usize, val: Word) {
        self.memory.preload(addr, val);
    }

    /// Prints the slots, registers and data memory to stdout.
    pub fn dump_state(&self) {
        println!(
            "CYCLE = {}  PC = {}  {}",
            self.cycle,
            self.pc,
            if self.finished { "FINISHED" } else { "RUNNING" }
        );
        for (stage, slot) in self.pipe.iter() {
            println!("  {:<4}{}", stage, slot);
        }
        self.regs.dump();
        self.memory.dump();
    }
}
