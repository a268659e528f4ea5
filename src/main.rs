//! Pipeline Simulator CLI.
//!
//! Runs one or more assembly programs on two pipelines configured with
//! different hazard policies and reports cycles and stalls for each. With
//! `--single`, each program runs on one pipeline built from the `[pipeline]`
//! configuration section instead.
//!
//! # Usage
//!
//! ```text
//! pipesim --file programs/load_use.s --p1 no_hazard --p2 hazard_branch
//! pipesim --config configs/default.toml --single --file programs/loop.s
//! ```

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process;
use std::thread;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use riscv_pipeline::common::SimError;
use riscv_pipeline::config::{Config, HazardPolicy, RunMode};
use riscv_pipeline::core::Cpu;
use riscv_pipeline::isa::disasm::listing;
use riscv_pipeline::sim::{loader, run_single, Comparison, History, Snapshot};
use riscv_pipeline::stats::format_time_ns;

/// Command-line arguments for the pipeline simulator.
#[derive(Parser, Debug)]
#[command(author, version, about = "Five-stage pipeline hazard simulator")]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Assembly program; repeat to run several programs in sequence.
    #[arg(short, long, required = true)]
    file: Vec<PathBuf>,

    /// Policy of the first processor.
    #[arg(long, value_enum)]
    p1: Option<HazardPolicy>,

    /// Policy of the second processor.
    #[arg(long, value_enum)]
    p2: Option<HazardPolicy>,

    /// Cycle pacing.
    #[arg(long, value_enum)]
    mode: Option<RunMode>,

    /// Print a JSON snapshot of both processors after every cycle.
    #[arg(long)]
    json: bool,

    /// Log every pipeline stage at TRACE level.
    #[arg(long)]
    trace: bool,

    /// Print registers, memory and statistics of both processors after each run.
    #[arg(long)]
    dump: bool,

    /// Run one processor configured by the `[pipeline]` section.
    #[arg(long)]
    single: bool,
}

fn init_tracing(trace: bool) {
    let default = if trace || cfg!(feature = "always-trace") {
        "trace"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .init();
}

/// Main entry point for the pipeline simulator.
///
/// # Behavior
///
/// 1. **Configuration**: Parses arguments and loads the optional TOML file.
/// 2. **Runs**: For each program, builds a two-processor comparison and
///    steps it according to the run mode.
/// 3. **Report**: Prints per-run statistics and the history table.
fn main() {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path).unwrap_or_else(|e| fatal(&e)),
        None => Config::default(),
    };
    if let Some(p1) = args.p1 {
        config.compare.p1 = p1;
    }
    if let Some(p2) = args.p2 {
        config.compare.p2 = p2;
    }
    if let Some(mode) = args.mode {
        config.general.run_mode = mode;
    }

    init_tracing(args.trace || config.general.trace_instructions);

    println!("Configuration");
    println!("--------------------");
    println!(
        "  P1:                 {} ({})",
        config.compare.p1,
        config.compare.p1.describe()
    );
    println!(
        "  P2:                 {} ({})",
        config.compare.p2,
        config.compare.p2.describe()
    );
    println!("  Memory Words:       {}", config.memory.words);
    println!("  Clock:              {} Hz", config.general.clock_hz);
    println!("  Max Cycles:         {}", config.general.max_cycles);
    println!(
        "  Single:             forwarding={} branch_prediction={}",
        config.pipeline.forwarding, config.pipeline.branch_prediction
    );
    println!("--------------------");

    if args.single {
        for path in &args.file {
            if let Err(e) = run_file_single(path, &config, &args) {
                fatal(&e);
            }
        }
        return;
    }

    let mut history = History::new(config.general.history_len);
    for path in &args.file {
        if let Err(e) = run_file(path, &config, &args, &mut history) {
            fatal(&e);
        }
    }

    println!();
    history.print();
}

fn run_file(
    path: &Path,
    config: &Config,
    args: &Args,
    history: &mut History,
) -> Result<(), SimError> {
    let json = args.json;
    let program = loader::load_program(path)?;
    println!("\n[*] Running {} ({} instructions)", path.display(), program.len());
    if args.dump {
        print!("{}", listing(&program));
    }

    let mut cmp = Comparison::new(
        &program,
        config.compare.p1,
        config.compare.p2,
        &config.memory,
    );
    let max_cycles = config.general.max_cycles;

    match config.general.run_mode {
        RunMode::Fast if !json => {
            if !cmp.run(max_cycles) {
                return Err(SimError::CycleLimit { limit: max_cycles });
            }
        }
        mode => {
            let stdin = io::stdin();
            let mut line = String::new();
            while !cmp.is_finished() {
                cmp.tick();
                if cmp.p1.cpu.cycle() > max_cycles || cmp.p2.cpu.cycle() > max_cycles {
                    return Err(SimError::CycleLimit { limit: max_cycles });
                }
                if json {
                    println!("{}", Snapshot::capture(&cmp.p1.cpu).to_json()?);
                    println!("{}", Snapshot::capture(&cmp.p2.cpu).to_json()?);
                }
                match mode {
                    RunMode::Step => {
                        line.clear();
                        stdin.lock().read_line(&mut line)?;
                    }
                    RunMode::Auto => {
                        thread::sleep(Duration::from_millis(config.general.auto_delay_ms));
                    }
                    RunMode::Fast => {}
                }
            }
        }
    }

    for (name, contender) in [("P1", &cmp.p1), ("P2", &cmp.p2)] {
        report(name, &contender.cpu, contender.stalls, config.general.clock_hz);
        if args.dump {
            contender.cpu.dump_state();
            contender.cpu.stats().print(config.general.clock_hz);
        }
    }

    history.push(cmp.record(history.next_run()));
    Ok(())
}

fn run_file_single(path: &Path, config: &Config, args: &Args) -> Result<(), SimError> {
    let program = loader::load_program(path)?;
    println!("\n[*] Running {} ({} instructions)", path.display(), program.len());
    if args.dump {
        print!("{}", listing(&program));
    }

    let cpu = run_single(program, config)?;
    report("CPU", &cpu, cpu.stats().stalls(), config.general.clock_hz);
    if args.json {
        println!("{}", Snapshot::capture(&cpu).to_json()?);
    }
    if args.dump {
        cpu.dump_state();
        cpu.stats().print(config.general.clock_hz);
    }
    Ok(())
}

fn report(name: &str, cpu: &Cpu, stalls: u64, clock_hz: u64) {
    let stats = cpu.stats();
    println!(
        "  {}: cycles={} stalls={} retired={} cpi={:.2} time={}",
        name,
        cpu.cycle(),
        stalls,
        stats.instructions_retired,
        stats.cpi(),
        format_time_ns(stats.simulated_time_ns(clock_hz))
    );
}

fn fatal(e: &SimError) -> ! {
    eprintln!("\n[!] FATAL: {}", e);
    process::exit(1);
}
