//! Y86-64 instruction-set simulator library.
//!
//! This crate interprets Y86-64 object code one instruction at a time with the following:
//! 1. **Core:** The SEQ engine (fetch, decode, execute, memory, writeback, PC update) and its
//!    architectural state (registers, condition codes, status).
//! 2. **Memory:** A flat byte-addressed image and an optional direct-mapped data cache model.
//! 3. **ISA:** Opcode classes, function codes, encodings and a disassembler.
//! 4. **Simulation:** Object loader, per-step JSON snapshots, configuration and statistics.
//!
//! ```
//! use y86sim_core::{Config, Simulator, Status};
//!
//! let mut sim = Simulator::new(&Config::default());
//! let _ = sim.load_object("0x000: 30f00500000000000000 | irmovq $5, %rax\n0x00a: 00 | halt\n".as_bytes())?;
//! let mut records: Vec<y86sim_core::StepSnapshot> = Vec::new();
//! let summary = sim.run(&mut records)?;
//! assert_eq!(summary.status, Status::Halted);
//! assert_eq!(records.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Common types and constants (register identifiers, faults, sizes).
pub mod common;
/// Simulator configuration (defaults, hierarchical config structures, validation).
pub mod config;
/// CPU core (architectural state, stage engine, execution units).
pub mod core;
/// Instruction set (opcodes, formats, disassembly).
pub mod isa;
/// Flat memory image.
pub mod memory;
/// Object loader, snapshots and the simulator driver.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Register identifier; parses and prints `%rax`..`%r14`.
pub use crate::common::RegId;
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Machine status (`AOK`, `HLT`, `ADR`, `INS`).
pub use crate::core::arch::status::Status;
/// Main CPU type; holds registers, memory, cache and stats.
pub use crate::core::Cpu;
/// `.ys` assembler entry point and its output.
pub use crate::sim::assembler::{AsmError, Assembly, assemble};
/// Per-step state record and its consumers.
pub use crate::sim::snapshot::{JsonSink, SinkError, StateSink, StepSnapshot};
/// Top-level simulator.
pub use crate::sim::simulator::{RunSummary, Simulator, StopReason};
