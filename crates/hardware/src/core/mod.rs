//! Core processor implementation.
//!
//! This module contains the CPU implementation: the architectural state, the
//! sequential stage engine, the execution units, and the step orchestration.

/// Architectural state (registers, condition codes, status).
pub mod arch;

/// CPU core implementation and step orchestration.
pub mod cpu;

/// Sequential stage engine (stages and intra-step latches).
pub mod pipeline;

/// Execution units (ALU, data cache).
pub mod units;

pub use self::cpu::Cpu;
