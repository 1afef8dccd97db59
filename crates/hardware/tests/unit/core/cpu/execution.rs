//! CPU Step Unit Tests.
//!
//! Verifies whole-instruction semantics through `Cpu::step`: small programs, the
//! terminal-status contract, and fault atomicity.

use y86sim_core::config::Config;
use y86sim_core::core::Cpu;
use y86sim_core::core::arch::flags::ConditionCodes;
use y86sim_core::{RegId, Status};

use crate::common::builder::instruction::{ProgramBuilder, cond};
use crate::common::harness::TestContext;

// ══════════════════════════════════════════════════════════
// 1. Reset state
// ══════════════════════════════════════════════════════════

#[test]
fn reset_state() {
    let cpu = Cpu::new(&Config::default());
    assert_eq!(cpu.pc, 0);
    assert_eq!(cpu.status, Status::Running);
    assert_eq!(cpu.cc, ConditionCodes::new(true, false, false));
    assert!(cpu.regs.values().iter().all(|&v| v == 0));
    assert!(cpu.cache.is_none());
    assert_eq!(cpu.memory.len(), 0x10000);
}

#[test]
fn config_seeds_pc_and_stack_pointer() {
    let mut config = Config::default();
    config.general.start_pc = 0x40;
    config.general.initial_sp = Some(0x800);
    config.cache.enabled = true;
    let cpu = Cpu::new(&config);
    assert_eq!(cpu.pc, 0x40);
    assert_eq!(cpu.regs.read(RegId::Rsp), 0x800);
    assert!(cpu.cache.is_some());
}

// ══════════════════════════════════════════════════════════
// 2. Programs
// ══════════════════════════════════════════════════════════

#[test]
fn lone_halt() {
    let mut tc = TestContext::new().load_program(0, &[0x00]);
    let records = tc.run();
    assert_eq!(records.len(), 1);
    assert_eq!(tc.status(), Status::Halted);
    assert_eq!(tc.cpu().pc, 0);
}

#[test]
fn load_constant_then_copy() {
    let program = ProgramBuilder::new()
        .irmovq(5, RegId::Rax)
        .rrmovq(RegId::Rax, RegId::Rbx)
        .halt()
        .build();
    let mut tc = TestContext::new().load_program(0, &program);
    let _ = tc.run();
    assert_eq!(tc.get_reg(RegId::Rax), 5);
    assert_eq!(tc.get_reg(RegId::Rbx), 5);
    assert_eq!(tc.status(), Status::Halted);
}

#[test]
fn push_then_pop_restores_stack_pointer() {
    let program = ProgramBuilder::new()
        .irmovq(0x400, RegId::Rsp)
        .irmovq(42, RegId::Rax)
        .pushq(RegId::Rax)
        .popq(RegId::Rcx)
        .halt()
        .build();
    let mut tc = TestContext::new().load_program(0, &program);
    tc.step_n(2);
    let sp_before = tc.get_reg(RegId::Rsp);
    let _ = tc.run();
    assert_eq!(tc.get_reg(RegId::Rsp), sp_before);
    assert_eq!(tc.get_reg(RegId::Rcx), 42);
    assert_eq!(tc.read_long(0x3F8), 42);
}

#[test]
fn call_then_ret_returns_after_call() {
    const TARGET: i64 = 0x40;
    let program = ProgramBuilder::new()
        .call(TARGET)
        .halt()
        .pad_to(TARGET)
        .ret()
        .build();
    let mut tc = TestContext::new().load_program(0, &program);
    tc.set_reg(RegId::Rsp, 0x200);

    assert_eq!(tc.step(), Status::Running);
    assert_eq!(tc.cpu().pc, TARGET);
    let sp_after_call = tc.get_reg(RegId::Rsp);
    assert_eq!(sp_after_call, 0x1F8);
    assert_eq!(tc.read_long(sp_after_call), 9);

    assert_eq!(tc.step(), Status::Running);
    assert_eq!(tc.cpu().pc, 9);
    assert_eq!(tc.get_reg(RegId::Rsp), 0x200);
}

#[test]
fn counted_loop_sums_values() {
    // rax = 0; rcx = 3; rdx = 1
    // loop: addq rcx, rax; subq rdx, rcx; jne loop; halt
    let prologue = ProgramBuilder::new()
        .irmovq(0, RegId::Rax)
        .irmovq(3, RegId::Rcx)
        .irmovq(1, RegId::Rdx);
    let loop_start = prologue.here();
    let program = prologue
        .addq(RegId::Rcx, RegId::Rax)
        .subq(RegId::Rdx, RegId::Rcx)
        .jxx(cond::NE, loop_start)
        .halt()
        .build();
    let mut tc = TestContext::new().load_program(0, &program);
    let records = tc.run();

    assert_eq!(tc.get_reg(RegId::Rax), 6);
    assert_eq!(tc.get_reg(RegId::Rcx), 0);
    assert_eq!(records.len(), 3 + 3 * 3 + 1);
    assert_eq!(tc.cpu().stats.inst_alu, 6);
    assert_eq!(tc.cpu().stats.inst_control, 3);
}

#[test]
fn conditional_move_picks_maximum() {
    // rbx = max(rax, rbx) via subq/cmovg on a scratch copy
    let program = ProgramBuilder::new()
        .irmovq(9, RegId::Rax)
        .irmovq(4, RegId::Rbx)
        .rrmovq(RegId::Rax, RegId::Rsi)
        .subq(RegId::Rbx, RegId::Rsi)
        .cmov(cond::G, RegId::Rax, RegId::Rbx)
        .halt()
        .build();
    let mut tc = TestContext::new().load_program(0, &program);
    let _ = tc.run();
    assert_eq!(tc.get_reg(RegId::Rbx), 9);
}

// ══════════════════════════════════════════════════════════
// 3. Faults and terminal status
// ══════════════════════════════════════════════════════════

#[test]
fn illegal_opcode_leaves_state_untouched() {
    let mut tc = TestContext::new().load_program(0x10, &[0xC0, 0x12, 0x34]);
    tc.set_reg(RegId::Rdi, 17);
    let memory_before = tc.cpu().memory.clone();
    let regs_before = tc.cpu().regs.clone();

    assert_eq!(tc.step(), Status::IllegalInstruction);
    assert_eq!(tc.cpu().pc, 0x10);
    assert_eq!(tc.cpu().regs, regs_before);
    assert_eq!(tc.cpu().memory, memory_before);
    assert_eq!(tc.cpu().cc, ConditionCodes::default());
    assert_eq!(tc.cpu().stats.instructions_retired, 0);
}

#[test]
fn memory_fault_skips_writeback_and_pc_update() {
    let program = ProgramBuilder::new().popq(RegId::Rax).build();
    let mut tc = TestContext::new().load_program(0, &program);
    tc.set_reg(RegId::Rsp, 0xFFFC);
    tc.set_reg(RegId::Rax, 3);

    assert_eq!(tc.step(), Status::AddressFault);
    assert_eq!(tc.get_reg(RegId::Rsp), 0xFFFC);
    assert_eq!(tc.get_reg(RegId::Rax), 3);
    assert_eq!(tc.cpu().pc, 0);
}

#[test]
fn steps_after_termination_do_nothing() {
    let mut tc = TestContext::new().load_program(0, &ProgramBuilder::new().halt().nop().build());
    assert_eq!(tc.step(), Status::Halted);
    assert_eq!(tc.step(), Status::Halted);
    assert_eq!(tc.cpu().pc, 0);
    assert_eq!(tc.cpu().stats.steps, 1);
}

#[test]
fn falling_off_the_end_faults() {
    let mut config = Config::default();
    config.memory.size = 16;
    let mut tc = TestContext::with_config(&config);
    // fifteen nops, then the PC reaches the last byte
    let _ = tc.cpu_mut().memory.load(0, &[0x10; 15]);
    let records = tc.run();
    assert_eq!(tc.status(), Status::AddressFault);
    assert_eq!(tc.cpu().pc, 15);
    assert_eq!(records.len(), 16);
}

#[test]
fn can_step_tracks_status_and_pc() {
    let mut tc = TestContext::new().load_program(0, &ProgramBuilder::new().nop().halt().build());
    assert!(tc.cpu().can_step());
    let _ = tc.step();
    assert!(tc.cpu().can_step());
    let _ = tc.step();
    assert!(!tc.cpu().can_step());

    let mut tc = TestContext::new();
    tc.cpu_mut().pc = -1;
    assert!(!tc.cpu().can_step());
}
