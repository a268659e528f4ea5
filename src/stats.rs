//! Simulation statistics collection and reporting.
//!
//! Tracks cycle and instruction counts, the retired instruction mix, branch
//! outcomes and stall cycles split by cause.

use serde::Serialize;

use crate::isa::Instruction;

/// Simulation statistics of one pipeline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SimStats {
    pub cycles: u64,
    pub instructions_retired: u64,

    pub inst_alu: u64,
    pub inst_load: u64,
    pub inst_store: u64,
    pub inst_branch: u64,

    pub branches_taken: u64,
    pub flushes: u64,

    /// Stall cycles requested by the hazard unit.
    pub stalls_data: u64,
    /// Stall cycles caused by the fixed branch penalty.
    pub stalls_control: u64,
}

impl SimStats {
    /// Counts an instruction leaving writeback.
    pub fn record_retired(&mut self, inst: &Instruction) {
        self.instructions_retired += 1;
        match inst {
            Instruction::Alu { .. } | Instruction::Addi { .. } => self.inst_alu += 1,
            Instruction::Lw { .. } => self.inst_load += 1,
            Instruction::Sw { .. } => self.inst_store += 1,
            Instruction::Branch { .. } => self.inst_branch += 1,
        }
    }

    /// Total stall cycles of either cause.
    pub fn stalls(&self) -> u64 {
        self.stalls_data + self.stalls_control
    }

    /// Cycles per retired instruction, or 0 before anything retires.
    pub fn cpi(&self) -> f64 {
        if self.instructions_retired == 0 {
            0.0
        } else {
            self.cycles as f64 / self.instructions_retired as f64
        }
    }

    /// Retired instructions per cycle, or 0 before the first cycle.
    pub fn ipc(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.instructions_retired as f64 / self.cycles as f64
        }
    }

    /// Simulated wall time in nanoseconds at the given clock.
    pub fn simulated_time_ns(&self, clock_hz: u64) -> f64 {
        if clock_hz == 0 {
            return 0.0;
        }
        self.cycles as f64 * 1e9 / clock_hz as f64
    }

    /// Prints a formatted summary of the statistics.
    pub fn print(&self, clock_hz: u64) {
        let cyc = self.cycles.max(1) as f64;
        let instr = self.instructions_retired.max(1) as f64;
        let pct = |n: u64, total: f64| (n as f64 / total) * 100.0;

        println!("==========================================================");
        println!("PIPELINE SIMULATION STATISTICS");
        println!("==========================================================");
        println!("sim_cycles               {}", self.cycles);
        println!("sim_insts                {}", self.instructions_retired);
        println!("sim_ipc                  {:.4}", self.ipc());
        println!("sim_cpi                  {:.4}", self.cpi());
        println!(
            "sim_time                 {}",
            format_time_ns(self.simulated_time_ns(clock_hz))
        );
        println!("----------------------------------------------------------");
        println!("STALLS");
        println!(
            "  stalls.data            {} ({:.2}%)",
            self.stalls_data,
            pct(self.stalls_data, cyc)
        );
        println!(
            "  stalls.control         {} ({:.2}%)",
            self.stalls_control,
            pct(self.stalls_control, cyc)
        );
        println!("----------------------------------------------------------");
        println!("INSTRUCTION MIX");
        println!(
            "  op.alu                 {} ({:.2}%)",
            self.inst_alu,
            pct(self.inst_alu, instr)
        );
        println!(
            "  op.load                {} ({:.2}%)",
            self.inst_load,
            pct(self.inst_load, instr)
        );
        println!(
            "  op.store               {} ({:.2}%)",
            self.inst_store,
            pct(self.inst_store, instr)
        );
        println!(
            "  op.branch              {} ({:.2}%)",
            self.inst_branch,
            pct(self.inst_branch, instr)
        );
        println!("----------------------------------------------------------");
        println!("BRANCHES");
        println!("  br.taken               {}", self.branches_taken);
        println!("  br.flushes             {}", self.flushes);
        println!("==========================================================");
    }
}

/// Formats a duration in nanoseconds with the largest unit that keeps the
/// value at or above one.
///
/// ```
/// use riscv_pipeline::stats::format_time_ns;
///
/// assert_eq!(format_time_ns(6.0), "6 ns");
/// assert_eq!(format_time_ns(2_500.0), "2.50 μs");
/// ```
pub fn format_time_ns(ns: f64) -> String {
    if ns < 1e3 {
        format!("{:.0} ns", ns)
    } else if ns < 1e6 {
        format!("{:.2} μs", ns / 1e3)
    } else if ns < 1e9 {
        format!("{:.2} ms", ns / 1e6)
    } else {
        format!("{:.2} s", ns / 1e9)
    }
}
