//! Side-by-side comparison of two pipeline configurations.
//!
//! A [`Comparison`] runs the same program on two independent engines and
//! counts the stall cycles each one reports. Finished comparisons are kept
//! in a bounded [`History`].

use std::collections::VecDeque;

use serde::Serialize;

use crate::config::{HazardPolicy, MemoryConfig};
use crate::core::Cpu;
use crate::isa::Instruction;

/// One engine of a comparison together with its stall counter.
#[derive(Clone, Debug)]
pub struct Contender {
    pub policy: HazardPolicy,
    pub cpu: Cpu,
    pub stalls: u64,
}

impl Contender {
    fn new(policy: HazardPolicy, program: Vec<Instruction>, memory: &MemoryConfig) -> Self {
        Self {
            policy,
            cpu: Cpu::with_memory(program, policy.pipeline(), memory),
            stalls: 0,
        }
    }

    fn tick(&mut self) {
        if self.cpu.is_finished() {
            return;
        }
        if self.cpu.step().is_some_and(|decision| decision.stall) {
            self.stalls += 1;
        }
    }
}

/// Two engines running the same program under different policies.
#[derive(Clone, Debug)]
pub struct Comparison {
    pub p1: Contender,
    pub p2: Contender,
}

impl Comparison {
    pub fn new(
        program: &[Instruction],
        p1: HazardPolicy,
        p2: HazardPolicy,
        memory: &MemoryConfig,
    ) -> Self {
        Self {
            p1: Contender::new(p1, program.to_vec(), memory),
            p2: Contender::new(p2, program.to_vec(), memory),
        }
    }

    /// Advances each unfinished engine by one cycle.
    pub fn tick(&mut self) {
        self.p1.tick();
        self.p2.tick();
    }

    /// Returns `true` once both engines have finished.
    pub fn is_finished(&self) -> bool {
        self.p1.cpu.is_finished() && self.p2.cpu.is_finished()
    }

    /// Ticks until both engines finish or either exceeds `max_cycles`.
    ///
    /// # Returns
    ///
    /// `true` if both finished within the budget.
    pub fn run(&mut self, max_cycles: u64) -> bool {
        while !self.is_finished() {
            self.tick();
            if self.p1.cpu.cycle() > max_cycles || self.p2.cpu.cycle() > max_cycles {
                return false;
            }
        }
        true
    }

    /// Summary of this comparison as history entry number `run`.
    pub fn record(&self, run: usize) -> RunRecord {
        RunRecord {
            run,
            cycles_p1: self.p1.cpu.cycle(),
            stalls_p1: self.p1.stalls,
            cycles_p2: self.p2.cpu.cycle(),
            stalls_p2: self.p2.stalls,
        }
    }
}

/// Cycle and stall totals of one finished comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RunRecord {
    pub run: usize,
    pub cycles_p1: u64,
    pub stalls_p1: u64,
    pub cycles_p2: u64,
    pub stalls_p2: u64,
}

/// The most recent comparison records, oldest first.
#[derive(Clone, Debug, Serialize)]
pub struct History {
    capacity: usize,
    records: VecDeque<RunRecord>,
    runs: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity),
            runs: 0,
        }
    }

    /// Number of the next run, starting at 1.
    pub fn next_run(&self) -> usize {
        self.runs + 1
    }

    /// Appends a record, evicting the oldest one beyond capacity.
    pub fn push(&mut self, record: RunRecord) {
        self.runs += 1;
        self.records.push_back(record);
        while self.records.len() > self.capacity {
            self.records.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RunRecord> + '_ {
        self.records.iter()
    }

    /// Prints the records as a table.
    pub fn print(&self) {
        println!(
            "{:>4} | {:>10} | {:>10} | {:>10} | {:>10}",
            "Run", "Cycles P1", "Stalls P1", "Cycles P2", "Stalls P2"
        );
        println!("{}", "-".repeat(56));
        for r in &self.records {
            println!(
                "{:>4} | {:>10} | {:>10} | {:>10} | {:>10}",
                r.run, r.cycles_p1, r.stalls_p1, r.cycles_p2, r.stalls_p2
            );
        }
    }
}
