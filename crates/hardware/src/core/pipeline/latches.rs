//! Stage latch structures for intra-step communication.
//!
//! A single `step` runs fetch, decode, execute, memory, write-back and PC update back
//! to back. The values one stage hands to the next are carried in these structures:
//! 1. **Fetch → all:** [`DecodedInstruction`], the instruction fields and `valP`.
//! 2. **Decode → execute/memory:** [`Operands`], the register values `valA`/`valB`.
//! 3. **Execute → memory/write-back/PC:** [`ExecuteResult`], `valE` and the condition.
//! 4. **Memory → write-back/PC:** [`MemoryResult`], `valM` if a read happened.

use crate::common::RegId;
use crate::isa::Opcode;

/// An instruction after fetch.
///
/// Fields the opcode class does not encode are `None` / zero and are never read by
/// later stages for that class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedInstruction {
    /// Address of the opcode byte.
    pub pc: i64,
    /// Opcode with its function field resolved.
    pub opcode: Opcode,
    /// First register specifier (`rA`).
    pub ra: Option<RegId>,
    /// Second register specifier (`rB`).
    pub rb: Option<RegId>,
    /// Immediate, displacement, or destination (`valC`).
    pub imm: i64,
    /// Address immediately following the encoding (`valP`).
    pub next_addr: i64,
}

/// Register operands read in the decode stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Operands {
    /// Operand A (`valA`).
    pub val_a: i64,
    /// Operand B (`valB`).
    pub val_b: i64,
}

/// Output of the execute stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExecuteResult {
    /// ALU result or effective address (`valE`).
    pub val_e: i64,
    /// Outcome of the instruction's condition (`Cnd`); false for unconditional classes.
    pub cnd: bool,
}

/// Output of the memory stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryResult {
    /// Value read from memory (`valM`), if the opcode reads.
    pub val_m: Option<i64>,
}
