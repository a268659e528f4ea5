//! End-to-end tests: configuration, loading, comparison and reporting.

use std::collections::HashSet;
use std::io::Write;

use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::NamedTempFile;

use riscv_pipeline::common::{LoadError, SimError};
use riscv_pipeline::config::{Config, HazardPolicy, MemInit, MemoryConfig, PipelineConfig, RunMode};
use riscv_pipeline::core::pipeline::latches::Stage;
use riscv_pipeline::core::Cpu;
use riscv_pipeline::isa::parse_program;
use riscv_pipeline::sim::{load_program, run_single, Comparison, History, RunRecord, Snapshot};
use riscv_pipeline::stats::format_time_ns;

/// Writes `content` to a temporary file.
fn temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

/// Tests the four policies against their pipeline switches.
#[rstest]
#[case(HazardPolicy::NoHazard, false, false)]
#[case(HazardPolicy::Hazard, true, false)]
#[case(HazardPolicy::Branch, false, true)]
#[case(HazardPolicy::HazardBranch, true, true)]
fn test_policy_mapping(
    #[case] policy: HazardPolicy,
    #[case] forwarding: bool,
    #[case] branch_prediction: bool,
) {
    assert_eq!(
        PipelineConfig::from(policy),
        PipelineConfig::new(forwarding, branch_prediction)
    );
    assert!(!policy.describe().is_empty());
}

/// Tests that every policy is distinct and parses back from its name.
#[test]
fn test_policy_names() {
    let pipelines: HashSet<_> = HazardPolicy::ALL.iter().map(|p| p.pipeline()).collect();
    assert_eq!(pipelines.len(), HazardPolicy::ALL.len());

    for policy in HazardPolicy::ALL {
        let config = Config::from_toml(&format!("[compare]\np1 = \"{}\"", policy)).unwrap();
        assert_eq!(config.compare.p1, policy);
    }
}

/// Tests that an empty configuration yields the defaults.
#[test]
fn test_config_defaults() {
    let config = Config::from_toml("").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.general.clock_hz, 1_000_000_000);
    assert_eq!(config.general.max_cycles, 100_000);
    assert_eq!(config.general.run_mode, RunMode::Fast);
    assert_eq!(config.general.history_len, 20);
    assert_eq!(config.memory.words, 64);
    assert_eq!(config.compare.p1, HazardPolicy::Hazard);
    assert_eq!(config.compare.p2, HazardPolicy::HazardBranch);
}

/// Tests reading a full configuration file.
#[test]
fn test_config_from_file() {
    let file = temp_file(
        r#"
[general]
trace_instructions = true
max_cycles = 500
run_mode = "auto"

[memory]
words = 16
init = [{ addr = 0, value = 11 }, { addr = 3, value = -2 }]

[pipeline]
forwarding = true

[compare]
p1 = "no_hazard"
p2 = "branch"
"#,
    );
    let config = Config::from_file(file.path()).unwrap();

    assert!(config.general.trace_instructions);
    assert_eq!(config.general.max_cycles, 500);
    assert_eq!(config.general.run_mode, RunMode::Auto);
    assert_eq!(config.general.auto_delay_ms, 400);
    assert_eq!(config.memory.words, 16);
    assert_eq!(
        config.memory.init,
        vec![MemInit { addr: 0, value: 11 }, MemInit { addr: 3, value: -2 }]
    );
    assert_eq!(config.pipeline, PipelineConfig::new(true, false));
    assert_eq!(config.compare.p1, HazardPolicy::NoHazard);
    assert_eq!(config.compare.p2, HazardPolicy::Branch);
}

/// Tests the configuration error paths.
#[test]
fn test_config_errors() {
    assert!(matches!(
        Config::from_file("/nonexistent/pipesim.toml"),
        Err(SimError::ConfigIo { .. })
    ));
    assert!(matches!(
        Config::from_toml("[compare]\np1 = \"turbo\""),
        Err(SimError::ConfigParse(_))
    ));
}

/// Tests loading a program from disk.
#[test]
fn test_load_program() {
    let file = temp_file("# demo\nADDI x1, x0, 5\nADD x2, x1, x1\n");
    let program = load_program(file.path()).unwrap();
    assert_eq!(program, parse_program("ADDI x1, x0, 5\nADD x2, x1, x1").unwrap());

    let empty = temp_file("# nothing here\n");
    assert!(matches!(
        load_program(empty.path()),
        Err(LoadError::NoValidInstructions)
    ));
    assert!(matches!(
        load_program("/nonexistent/prog.s"),
        Err(LoadError::Io { .. })
    ));
}

/// Tests that configured memory contents are visible to the program.
#[test]
fn test_memory_init() {
    let memory = MemoryConfig {
        words: 8,
        init: vec![MemInit { addr: 0, value: 11 }, MemInit { addr: 20, value: 1 }],
    };
    let program = parse_program("LW x1, 0(x2)\nADD x3, x1, x1").unwrap();
    let mut cpu = Cpu::with_memory(program, HazardPolicy::Hazard.pipeline(), &memory);

    assert!(cpu.run(100));
    assert_eq!(cpu.memory().len(), 8);
    assert_eq!(cpu.regs().as_slice()[3], 22);
}

/// Tests that a single run follows the `[pipeline]` section.
#[rstest]
#[case("forwarding = true", 6, 0)]
#[case("forwarding = false", 7, 1)]
fn test_single_run_uses_pipeline_section(
    #[case] pipeline: &str,
    #[case] cycles: u64,
    #[case] stalls: u64,
) {
    let config = Config::from_toml(&format!("[pipeline]\n{}", pipeline)).unwrap();
    let program = parse_program("ADDI x1, x0, 5\nADD x2, x1, x1").unwrap();
    let cpu = run_single(program, &config).unwrap();

    assert_eq!(cpu.config(), config.pipeline);
    assert_eq!((cpu.cycle(), cpu.stats().stalls()), (cycles, stalls));
    assert_eq!(cpu.regs().as_slice()[2], 10);
}

/// Tests that a single run reports the cycle budget.
#[test]
fn test_single_run_cycle_limit() {
    let toml = "[general]\nmax_cycles = 20\n[pipeline]\nbranch_prediction = true";
    let config = Config::from_toml(toml).unwrap();
    let program = parse_program("BEQ x0, x0, 0").unwrap();

    assert!(matches!(
        run_single(program, &config),
        Err(SimError::CycleLimit { limit: 20 })
    ));
}

/// Tests a comparison of the two default policies on the branch scenario.
#[test]
fn test_comparison() {
    let program = parse_program("ADDI x1, x0, 1\nADDI x2, x0, 1\nBEQ x1, x2, -4").unwrap();
    let mut cmp = Comparison::new(
        &program,
        HazardPolicy::Hazard,
        HazardPolicy::HazardBranch,
        &MemoryConfig::default(),
    );

    assert!(cmp.run(1_000));
    assert!(cmp.is_finished());
    assert_eq!(
        cmp.record(1),
        RunRecord {
            run: 1,
            cycles_p1: 7,
            stalls_p1: 1,
            cycles_p2: 7,
            stalls_p2: 0,
        }
    );

    // Finished engines are not stepped again.
    cmp.tick();
    assert_eq!(cmp.p1.cpu.cycle(), 7);
}

/// Tests that one engine keeps running after the other finishes.
#[test]
fn test_comparison_uneven_finish() {
    let program = parse_program("ADDI x1, x0, 5\nADD x2, x1, x1").unwrap();
    let mut cmp = Comparison::new(
        &program,
        HazardPolicy::NoHazard,
        HazardPolicy::Hazard,
        &MemoryConfig::default(),
    );

    while !cmp.p2.cpu.is_finished() {
        cmp.tick();
    }
    assert!(!cmp.p1.cpu.is_finished());
    assert!(cmp.run(1_000));

    let record = cmp.record(1);
    assert_eq!((record.cycles_p1, record.stalls_p1), (7, 1));
    assert_eq!((record.cycles_p2, record.stalls_p2), (6, 0));
}

/// Tests that a looping program trips the cycle budget.
#[test]
fn test_comparison_budget() {
    let program = parse_program("BEQ x0, x0, 0").unwrap();
    let mut cmp = Comparison::new(
        &program,
        HazardPolicy::Branch,
        HazardPolicy::HazardBranch,
        &MemoryConfig::default(),
    );
    assert!(!cmp.run(100));
}

/// Tests that the history keeps only the most recent records.
#[test]
fn test_history_capacity() {
    let mut history = History::new(3);
    assert!(history.is_empty());

    for _ in 0..5 {
        let run = history.next_run();
        history.push(RunRecord {
            run,
            cycles_p1: run as u64 * 10,
            stalls_p1: 0,
            cycles_p2: run as u64 * 10,
            stalls_p2: 0,
        });
    }

    assert_eq!(history.len(), 3);
    let runs: Vec<_> = history.iter().map(|r| r.run).collect();
    assert_eq!(runs, vec![3, 4, 5]);
    assert_eq!(history.next_run(), 6);
}

/// Tests the serialized snapshot of a running engine.
#[test]
fn test_snapshot() {
    let program = parse_program("ADDI x1, x0, 9\nSW x1, 2(x0)").unwrap();
    let mut cpu = Cpu::new(program, HazardPolicy::Hazard.pipeline());
    cpu.step();
    cpu.step();

    let snap = Snapshot::capture(&cpu);
    assert_eq!(snap.cycle, 2);
    assert_eq!(snap.pc, 2);
    assert!(!snap.finished);
    assert_eq!(snap.stages.len(), 5);
    assert_eq!(snap.stages[0].stage, Stage::If);
    assert_eq!(snap.stages[0].inst.as_deref(), Some("SW x1, 2(x0)"));
    assert_eq!(snap.stages[1].pc, Some(0));
    assert_eq!(snap.stages[4].inst, None);
    assert_eq!(snap.registers.len(), 32);
    assert_eq!(snap.memory.len(), 64);

    let json: serde_json::Value = serde_json::from_str(&snap.to_json().unwrap()).unwrap();
    assert_eq!(json["cycle"], 2);
    assert_eq!(json["stages"][1]["inst"], "ADDI x1, x0, 9");
    assert_eq!(json["decision"]["stall"], false);

    while cpu.step().is_some() {}
    let snap = Snapshot::capture(&cpu);
    assert!(snap.finished);
    assert_eq!(snap.memory[2], 9);
    assert_eq!(snap.last_mem_write, Some(2));
}

/// Tests simulated time reporting.
#[test]
fn test_time_formatting() {
    assert_eq!(format_time_ns(0.0), "0 ns");
    assert_eq!(format_time_ns(999.0), "999 ns");
    assert_eq!(format_time_ns(1_500.0), "1.50 μs");
    assert_eq!(format_time_ns(2_000_000.0), "2.00 ms");
    assert_eq!(format_time_ns(3_250_000_000.0), "3.25 s");

    let program = parse_program("ADDI x1, x0, 5\nADD x2, x1, x1").unwrap();
    let mut cpu = Cpu::new(program, HazardPolicy::Hazard.pipeline());
    cpu.run(100);
    let stats = cpu.stats();
    assert_eq!(stats.simulated_time_ns(1_000_000_000), 6.0);
    assert_eq!(stats.simulated_time_ns(500_000_000), 12.0);
    assert_eq!(stats.instructions_retired, 2);
    assert!((stats.cpi() - 3.0).abs() < 1e-9);
}
