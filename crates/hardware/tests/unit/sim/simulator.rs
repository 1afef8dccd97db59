//! Simulator Run Loop Unit Tests.
//!
//! Verifies every stop condition, that the terminal step is recorded, and that sink
//! failures surface as errors.

use std::io::{self, Write};

use mockall::Sequence;
use y86sim_core::config::Config;
use y86sim_core::{RegId, SinkError, Simulator, Status, StepSnapshot, StopReason};

use crate::common::builder::instruction::{ProgramBuilder, object_text};
use crate::common::harness::TestContext;
use crate::common::mocks::sink::MockSink;

fn simulator_with(config: &Config, program: &[u8]) -> Simulator {
    let mut sim = Simulator::new(config);
    let _ = sim.load_object(object_text(0, program).as_bytes()).unwrap();
    sim
}

#[test]
fn run_until_halt_records_every_step() {
    let program = ProgramBuilder::new().nop().nop().halt().build();
    let mut sim = simulator_with(&Config::default(), &program);
    let mut records: Vec<StepSnapshot> = Vec::new();
    let summary = sim.run(&mut records).unwrap();

    assert_eq!(summary.steps, 3);
    assert_eq!(summary.status, Status::Halted);
    assert_eq!(summary.reason, StopReason::Status(Status::Halted));
    let pcs: Vec<i64> = records.iter().map(|r| r.pc).collect();
    assert_eq!(pcs, vec![1, 2, 2]);
    assert_eq!(records.last().unwrap().status, Status::Halted);
}

#[test]
fn faulting_step_is_recorded() {
    let mut sim = simulator_with(&Config::default(), &[0x10, 0xF0]);
    let mut records: Vec<StepSnapshot> = Vec::new();
    let summary = sim.run(&mut records).unwrap();
    assert_eq!(summary.reason, StopReason::Status(Status::IllegalInstruction));
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].pc, 1);
}

#[test]
fn jump_outside_memory_stops_the_run() {
    let program = ProgramBuilder::new().jmp(0x2_0000).build();
    let mut sim = simulator_with(&Config::default(), &program);
    let mut records: Vec<StepSnapshot> = Vec::new();
    let summary = sim.run(&mut records).unwrap();

    assert_eq!(summary.reason, StopReason::PcOutOfRange(0x2_0000));
    assert_eq!(summary.status, Status::Running);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].pc, 0x2_0000);
}

#[test]
fn initial_pc_outside_memory_records_one_fault() {
    let mut config = Config::default();
    config.general.start_pc = -4;
    let mut sim = Simulator::new(&config);
    let mut records: Vec<StepSnapshot> = Vec::new();
    let summary = sim.run(&mut records).unwrap();
    assert_eq!(summary.reason, StopReason::Status(Status::AddressFault));
    assert_eq!(records.len(), 1);
}

#[test]
fn step_limit_stops_an_infinite_loop() {
    let mut config = Config::default();
    config.general.max_steps = Some(50);
    let program = ProgramBuilder::new().jmp(0).build();
    let mut sim = simulator_with(&config, &program);
    let mut records: Vec<StepSnapshot> = Vec::new();
    let summary = sim.run(&mut records).unwrap();

    assert_eq!(summary.reason, StopReason::StepLimit(50));
    assert_eq!(summary.steps, 50);
    assert_eq!(records.len(), 50);
    assert_eq!(sim.cpu.status, Status::Running);
}

#[test]
fn run_after_termination_records_nothing() {
    let mut sim = simulator_with(&Config::default(), &[0x00]);
    let mut first: Vec<StepSnapshot> = Vec::new();
    let _ = sim.run(&mut first).unwrap();

    let mut sink = MockSink::new();
    let _ = sink.expect_record().times(0);
    let _ = sink.expect_finish().times(1).returning(|| Ok(()));
    let summary = sim.run(&mut sink).unwrap();
    assert_eq!(summary.steps, 0);
    assert_eq!(summary.reason, StopReason::Status(Status::Halted));
}

#[test]
fn sink_sees_records_then_finish() {
    let mut sim = simulator_with(&Config::default(), &[0x10, 0x00]);
    let mut seq = Sequence::new();
    let mut sink = MockSink::new();
    let _ = sink
        .expect_record()
        .withf(|s| s.pc == 1 && s.status == Status::Running)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    let _ = sink
        .expect_record()
        .withf(|s| s.status == Status::Halted)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    let _ = sink
        .expect_finish()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(()));
    let _ = sim.run(&mut sink).unwrap();
}

#[test]
fn sink_failure_aborts_the_run() {
    let program = ProgramBuilder::new().nop().nop().halt().build();
    let mut sim = simulator_with(&Config::default(), &program);
    let mut sink = MockSink::new();
    let _ = sink
        .expect_record()
        .times(1)
        .returning(|_| Err(SinkError::Io(io::Error::other("closed"))));
    let _ = sink.expect_finish().times(0);

    let err = sim.run(&mut sink).unwrap_err();
    assert!(matches!(err, SinkError::Io(_)));
    assert_eq!(sim.cpu.pc, 1);
    assert_eq!(sim.cpu.stats.steps, 1);
}

#[test]
fn initial_stack_pointer_from_config() {
    let mut config = Config::default();
    config.general.initial_sp = Some(0x200);
    let program = ProgramBuilder::new().pushq(RegId::Rsp).halt().build();
    let mut sim = simulator_with(&config, &program);
    let mut records: Vec<StepSnapshot> = Vec::new();
    let _ = sim.run(&mut records).unwrap();
    assert_eq!(sim.cpu.regs.read(RegId::Rsp), 0x1F8);
    assert_eq!(sim.cpu.memory.read_long(0x1F8), Ok(0x200));
}

#[test]
fn stats_include_cache_counters_only_when_enabled() {
    let program = ProgramBuilder::new().halt().build();

    let mut tc = TestContext::new().load_program(0, &program);
    let _ = tc.run();
    assert!(tc.sim.stats().cache.is_none());

    let mut tc = TestContext::with_cache().load_program(0, &program);
    let _ = tc.run();
    let stats = tc.sim.stats();
    assert_eq!(stats.cache.map(|c| c.total()), Some(0));
    assert_eq!(stats.instructions_retired, 1);
}

#[test]
fn manual_step_returns_snapshot() {
    let program = ProgramBuilder::new().irmovq(7, RegId::R14).halt().build();
    let mut sim = simulator_with(&Config::default(), &program);
    let snap = sim.step();
    assert_eq!(snap.pc, 10);
    assert_eq!(snap.regs.read(RegId::R14), 7);
    assert_eq!(snap, sim.snapshot());
}

#[test]
fn object_file_loads_from_disk() {
    let program = ProgramBuilder::new().irmovq(3, RegId::Rdx).halt().build();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(object_text(0, &program).as_bytes()).unwrap();

    let mut sim = Simulator::new(&Config::default());
    let summary = sim.load_object_file(file.path()).unwrap();
    assert_eq!(summary.bytes_loaded, program.len());
    let mut records: Vec<StepSnapshot> = Vec::new();
    let _ = sim.run(&mut records).unwrap();
    assert_eq!(sim.cpu.regs.read(RegId::Rdx), 3);
}

#[test]
fn missing_object_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut sim = Simulator::new(&Config::default());
    assert!(sim.load_object_file(dir.path().join("absent.yo")).is_err());
}

#[test]
fn assembly_seeds_stack_at_end_of_memory() {
    let mut config = Config::default();
    config.memory.size = 0x400;
    let mut sim = Simulator::new(&config);
    let asm = sim.load_assembly("pushq %rax\nhalt", None).unwrap();
    assert_eq!(asm.bytes, ProgramBuilder::new().pushq(RegId::Rax).halt().build());
    assert_eq!(sim.cpu.regs.read(RegId::Rsp), 0x400);

    let mut records: Vec<StepSnapshot> = Vec::new();
    let _ = sim.run(&mut records).unwrap();
    assert_eq!(sim.cpu.regs.read(RegId::Rsp), 0x3F8);
}

#[test]
fn assembly_honors_explicit_stack() {
    let mut sim = Simulator::new(&Config::default());
    let _ = sim.load_assembly("halt", Some(0x80)).unwrap();
    assert_eq!(sim.cpu.regs.read(RegId::Rsp), 0x80);
}

#[test]
fn assembly_larger_than_memory_is_truncated() {
    let mut config = Config::default();
    config.memory.size = 16;
    let mut sim = Simulator::new(&config);
    let asm = sim.load_assembly(".pos 0x20\nhalt", None).unwrap();
    assert_eq!(asm.bytes.len(), 0x21);
    assert_eq!(sim.cpu.memory.as_bytes(), &[0u8; 16]);
}

#[test]
fn assembly_file_errors_surface() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"jmp missing\n").unwrap();
    let mut sim = Simulator::new(&Config::default());
    let err = sim.load_assembly_file(file.path(), None).unwrap_err();
    assert!(err.to_string().contains("undefined label 'missing'"));
}
