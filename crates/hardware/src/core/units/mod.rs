//! Execution units and functional components.
//!
//! This module contains the integer ALU used by the execute stage and the
//! direct-mapped data cache model consulted by the memory stage.

/// Arithmetic Logic Unit for integer operations.
pub mod alu;

/// Direct-mapped data cache model.
pub mod cache;
