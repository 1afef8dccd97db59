//! Instruction Decode (ID) Stage.
//!
//! This module implements the second stage. It performs the following:
//! 1. **Source Selection:** Picks `srcA`/`srcB` from the explicit specifiers or `%rsp`.
//! 2. **Register Read:** Reads both operands; an unselected operand reads as zero.

use crate::common::RegId;
use crate::core::Cpu;
use crate::core::pipeline::latches::{DecodedInstruction, Operands};
use crate::isa::Opcode;

/// Register read as operand A for `inst`, if any.
pub const fn src_a(inst: &DecodedInstruction) -> Option<RegId> {
    match inst.opcode {
        Opcode::Cmov(_) | Opcode::Rmmovq | Opcode::Alu(_) | Opcode::Pushq => inst.ra,
        Opcode::Popq | Opcode::Ret => Some(RegId::Rsp),
        _ => None,
    }
}

/// Register read as operand B for `inst`, if any.
pub const fn src_b(inst: &DecodedInstruction) -> Option<RegId> {
    match inst.opcode {
        Opcode::Alu(_) | Opcode::Rmmovq | Opcode::Mrmovq => inst.rb,
        Opcode::Pushq | Opcode::Popq | Opcode::Call | Opcode::Ret => Some(RegId::Rsp),
        _ => None,
    }
}

/// Executes the instruction decode stage.
///
/// # Arguments
///
/// * `cpu`  - CPU state; only the register file is read.
/// * `inst` - Instruction produced by fetch.
///
/// # Returns
///
/// `valA` and `valB`. Decode never faults.
pub fn decode_stage(cpu: &Cpu, inst: &DecodedInstruction) -> Operands {
    Operands {
        val_a: cpu.regs.read_opt(src_a(inst)),
        val_b: cpu.regs.read_opt(src_b(inst)),
    }
}
