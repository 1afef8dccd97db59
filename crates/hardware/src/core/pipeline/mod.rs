//! Sequential instruction engine.
//!
//! The Y86 processor model is SEQ: each step runs every stage to completion before the
//! next instruction is fetched. This module contains:
//! 1. **Latches:** Values handed from one stage to the next within a step.
//! 2. **Stages:** Fetch, Decode, Execute, Memory, Writeback and PC update.

/// Intra-step latches (`DecodedInstruction`, `Operands`, `ExecuteResult`, `MemoryResult`).
pub mod latches;

/// Stage implementations (fetch, decode, execute, memory, writeback, PC update).
pub mod stages;
