//! Execute Stage Unit Tests.
//!
//! Verifies `valE` per opcode class, that only `OPq` touches the condition codes, and
//! that `halt` sets the status.

use y86sim_core::core::arch::flags::ConditionCodes;
use y86sim_core::core::pipeline::latches::ExecuteResult;
use y86sim_core::core::pipeline::stages::{decode_stage, execute_stage, fetch_stage};
use y86sim_core::{RegId, Status};

use crate::common::builder::instruction::{ProgramBuilder, cond};
use crate::common::harness::TestContext;

fn ctx(program: ProgramBuilder) -> TestContext {
    TestContext::new().load_program(0, &program.build())
}

fn execute(tc: &mut TestContext) -> ExecuteResult {
    let inst = fetch_stage(tc.cpu()).unwrap();
    let ops = decode_stage(tc.cpu(), &inst);
    execute_stage(tc.cpu_mut(), &inst, ops)
}

#[test]
fn opq_updates_flags() {
    let mut tc = ctx(ProgramBuilder::new().subq(RegId::Rax, RegId::Rbx));
    tc.set_reg(RegId::Rax, 5);
    tc.set_reg(RegId::Rbx, 3);
    let ex = execute(&mut tc);
    assert_eq!(ex.val_e, -2);
    assert_eq!(tc.cpu().cc, ConditionCodes::new(false, true, false));
}

#[test]
fn non_alu_classes_leave_flags_alone() {
    let mut tc = ctx(ProgramBuilder::new().irmovq(-5, RegId::Rax));
    tc.cpu_mut().cc = ConditionCodes::new(false, true, true);
    let ex = execute(&mut tc);
    assert_eq!(ex.val_e, -5);
    assert_eq!(tc.cpu().cc, ConditionCodes::new(false, true, true));
}

#[test]
fn stack_adjustments() {
    for (program, expected) in [
        (ProgramBuilder::new().pushq(RegId::Rax), 0x100 - 8),
        (ProgramBuilder::new().call(0x40), 0x100 - 8),
        (ProgramBuilder::new().popq(RegId::Rax), 0x100 + 8),
        (ProgramBuilder::new().ret(), 0x100 + 8),
    ] {
        let mut tc = ctx(program);
        tc.set_reg(RegId::Rsp, 0x100);
        assert_eq!(execute(&mut tc).val_e, expected);
    }
}

#[test]
fn memory_forms_compute_base_plus_displacement() {
    let mut tc = ctx(ProgramBuilder::new().mrmovq(-16, RegId::Rbp, RegId::Rax));
    tc.set_reg(RegId::Rbp, 0x200);
    assert_eq!(execute(&mut tc).val_e, 0x1F0);
}

#[test]
fn cmov_condition_uses_current_flags() {
    let mut tc = ctx(ProgramBuilder::new().cmov(cond::L, RegId::Rax, RegId::Rbx));
    tc.set_reg(RegId::Rax, 9);
    tc.cpu_mut().cc = ConditionCodes::new(false, true, false);
    let ex = execute(&mut tc);
    assert_eq!(ex, ExecuteResult { val_e: 9, cnd: true });
}

#[test]
fn unrecognized_jump_condition_is_false() {
    let mut tc = TestContext::new().load_program(0, &[0x7F, 0, 0, 0, 0, 0, 0, 0, 0]);
    assert!(!execute(&mut tc).cnd);
}

#[test]
fn halt_sets_status() {
    let mut tc = ctx(ProgramBuilder::new().halt());
    let _ = execute(&mut tc);
    assert_eq!(tc.status(), Status::Halted);
}
