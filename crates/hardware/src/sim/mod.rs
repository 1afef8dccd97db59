//! Simulation driver, program loading and state reporting.
//!
//! Provides the assembler, the object-file loader, the per-step snapshot and sink types, and the
//! [`Simulator`](simulator::Simulator) that ties them to the CPU.

/// Assembler for `.ys` source.
pub mod assembler;

/// Object text loader.
pub mod loader;

/// Per-step snapshots and sinks.
pub mod snapshot;

/// Top-level simulator and run loop.
pub mod simulator;
