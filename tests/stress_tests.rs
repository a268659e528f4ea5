//! Property-based stress tests for the pipeline engine.

use proptest::prelude::*;

use riscv_pipeline::common::{Reg, Word};
use riscv_pipeline::config::{HazardPolicy, PipelineConfig};
use riscv_pipeline::core::pipeline::hazards::ForwardSource;
use riscv_pipeline::core::Cpu;
use riscv_pipeline::isa::{AluOp, BranchOp, Instruction};

const MEM_WORDS: usize = 64;

fn reg() -> impl Strategy<Value = Reg> {
    (0usize..8).prop_map(|i| Reg::new(i).unwrap())
}

fn alu_op() -> impl Strategy<Value = AluOp> {
    prop_oneof![
        Just(AluOp::Add),
        Just(AluOp::Sub),
        Just(AluOp::And),
        Just(AluOp::Or),
        Just(AluOp::Mul),
        Just(AluOp::Slt),
    ]
}

/// Any instruction except branches.
fn straight_line_inst() -> impl Strategy<Value = Instruction> {
    prop_oneof![
        (alu_op(), reg(), reg(), reg()).prop_map(|(op, rd, rs1, rs2)| Instruction::Alu {
            op,
            rd,
            rs1,
            rs2
        }),
        (reg(), reg(), -8i64..80).prop_map(|(rd, rs1, imm)| Instruction::Addi { rd, rs1, imm }),
        (reg(), reg(), -4i64..70).prop_map(|(rd, rs1, imm)| Instruction::Lw { rd, rs1, imm }),
        (reg(), reg(), -4i64..70).prop_map(|(rs1, rs2, imm)| Instruction::Sw { rs1, rs2, imm }),
    ]
}

/// Any instruction, with branches that only jump forward.
fn forward_branch_inst() -> impl Strategy<Value = Instruction> {
    prop_oneof![
        4 => straight_line_inst(),
        1 => (any::<bool>(), reg(), reg(), 1i64..6).prop_map(|(eq, rs1, rs2, imm)| {
            Instruction::Branch {
                op: if eq { BranchOp::Beq } else { BranchOp::Bne },
                rs1,
                rs2,
                imm,
            }
        }),
    ]
}

fn policy() -> impl Strategy<Value = HazardPolicy> {
    prop_oneof![
        Just(HazardPolicy::NoHazard),
        Just(HazardPolicy::Hazard),
        Just(HazardPolicy::Branch),
        Just(HazardPolicy::HazardBranch),
    ]
}

/// Executes a branch-free program one instruction at a time.
fn reference(program: &[Instruction]) -> (Vec<Word>, Vec<Word>) {
    let mut regs = vec![0 as Word; 32];
    let mut mem = vec![0 as Word; MEM_WORDS];
    let addr = |base: Word, imm: Word| {
        usize::try_from(base.wrapping_add(imm))
            .ok()
            .filter(|&a| a < MEM_WORDS)
    };

    for inst in program {
        match *inst {
            Instruction::Alu { op, rd, rs1, rs2 } => {
                regs[rd.index()] = op.apply(regs[rs1.index()], regs[rs2.index()]);
            }
            Instruction::Addi { rd, rs1, imm } => {
                regs[rd.index()] = regs[rs1.index()].wrapping_add(imm);
            }
            Instruction::Lw { rd, rs1, imm } => {
                regs[rd.index()] = addr(regs[rs1.index()], imm).map_or(0, |a| mem[a]);
            }
            Instruction::Sw { rs1, rs2, imm } => {
                if let Some(a) = addr(regs[rs1.index()], imm) {
                    mem[a] = regs[rs2.index()];
                }
            }
            Instruction::Branch { .. } => unreachable!("reference runs straight-line code"),
        }
        regs[0] = 0;
    }
    (regs, mem)
}

proptest! {
    /// x0 reads zero after every cycle.
    #[test]
    fn prop_x0_always_zero(
        program in prop::collection::vec(forward_branch_inst(), 1..24),
        policy in policy(),
    ) {
        let mut cpu = Cpu::new(program, policy.pipeline());
        while cpu.step().is_some() {
            prop_assert_eq!(cpu.regs().as_slice()[0], 0);
        }
        prop_assert_eq!(cpu.regs().as_slice()[0], 0);
    }

    /// Programs without backward branches always drain, and the cycle
    /// counter advances by one per counted step and then stops.
    #[test]
    fn prop_forward_programs_terminate(
        program in prop::collection::vec(forward_branch_inst(), 1..24),
        policy in policy(),
    ) {
        let len = program.len() as u64;
        let mut cpu = Cpu::new(program, policy.pipeline());
        let mut expected = 0;
        while cpu.step().is_some() {
            expected += 1;
            prop_assert_eq!(cpu.cycle(), expected);
            prop_assert!(cpu.cycle() <= 10 * len + 8);
        }
        prop_assert!(cpu.is_finished());
        prop_assert!(cpu.pipeline().iter().all(|(_, s)| s.entry().is_none()));
        prop_assert!(cpu.step().is_none());
        prop_assert_eq!(cpu.cycle(), expected);
    }

    /// Straight-line code produces sequential results under every policy
    /// and takes one cycle per instruction plus fill and stalls.
    #[test]
    fn prop_straight_line_matches_reference(
        program in prop::collection::vec(straight_line_inst(), 1..24),
        policy in policy(),
    ) {
        let (regs, mem) = reference(&program);
        let len = program.len() as u64;

        let mut cpu = Cpu::new(program, policy.pipeline());
        let mut stalls = 0;
        while let Some(decision) = cpu.step() {
            if decision.stall {
                stalls += 1;
            }
        }

        prop_assert_eq!(cpu.regs().as_slice(), &regs[..]);
        prop_assert_eq!(cpu.memory().as_slice(), &mem[..]);
        prop_assert_eq!(cpu.cycle(), len + 4 + stalls);
        prop_assert_eq!(cpu.stats().instructions_retired, len);
    }

    /// EX is never a forwarding source when forwarding is disabled, and a
    /// branch penalty is only reported when prediction is disabled.
    #[test]
    fn prop_decisions_respect_config(
        program in prop::collection::vec(forward_branch_inst(), 1..24),
        forwarding in any::<bool>(),
        branch_prediction in any::<bool>(),
    ) {
        let mut cpu = Cpu::new(program, PipelineConfig::new(forwarding, branch_prediction));
        while let Some(decision) = cpu.step() {
            if !forwarding {
                prop_assert_ne!(decision.forward_a, ForwardSource::Ex);
                prop_assert_ne!(decision.forward_b, ForwardSource::Ex);
            }
            if branch_prediction {
                prop_assert!(!decision.branch_penalty);
            }
            if decision.branch_penalty {
                prop_assert!(decision.stall);
            }
        }
    }

    /// Disabling prediction costs exactly one stall per branch that reaches EX.
    #[test]
    fn prop_branch_penalty_per_branch(
        program in prop::collection::vec(forward_branch_inst(), 1..24),
        forwarding in any::<bool>(),
    ) {
        let mut cpu = Cpu::new(program, PipelineConfig::new(forwarding, false));
        let mut penalties = 0;
        while let Some(decision) = cpu.step() {
            if decision.branch_penalty {
                penalties += 1;
            }
        }
        prop_assert_eq!(penalties, cpu.stats().inst_branch);
        prop_assert_eq!(cpu.stats().stalls_control, penalties);
    }
}
