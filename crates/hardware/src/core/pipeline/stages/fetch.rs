//! Instruction Fetch (IF) Stage.
//!
//! This module implements the first stage. It performs the following:
//! 1. **Bounds Check:** Rejects a PC that leaves no room for even a one-byte encoding.
//! 2. **Opcode Split:** Separates the class and function nibbles and validates them.
//! 3. **Field Extraction:** Reads the register-specifier byte and the 8-byte immediate
//!    when the class encodes them, and computes `valP`.
//!
//! Fetch reads the memory image directly; the data cache only observes the memory stage.

use crate::common::constants::{
    IMMEDIATE_BYTES, NIBBLE_MASK, NIBBLE_SHIFT, OPCODE_BYTES, REGISTER_BYTES,
};
use crate::common::{Fault, RegId};
use crate::core::Cpu;
use crate::core::pipeline::latches::DecodedInstruction;
use crate::isa::Opcode;

/// Executes the instruction fetch stage.
///
/// # Arguments
///
/// * `cpu` - CPU state; only the PC and the memory image are read.
///
/// # Returns
///
/// The decoded instruction, or the fault that stops this step:
/// `Fault::Address` when the PC is outside `[0, size - 1)` or the encoding runs past
/// the end of the image, `Fault::IllegalInstruction` for an unknown class or `OPq` function.
pub fn fetch_stage(cpu: &Cpu) -> Result<DecodedInstruction, Fault> {
    let pc = cpu.pc;
    let mem = &cpu.memory;

    // Every encoding needs one byte past the opcode to be addressable.
    let start = mem.check_range(pc, OPCODE_BYTES as usize + 1)?;
    let byte0 = mem.as_bytes()[start];
    let opcode = Opcode::decode(byte0).ok_or(Fault::IllegalInstruction(byte0))?;

    let format = opcode.format();
    let _ = mem.check_range(pc, format.length() as usize)?;

    let mut next_addr = pc + OPCODE_BYTES;
    let (mut ra, mut rb) = (None, None);
    if format.needs_regs {
        let regs = mem.read_byte(next_addr)?;
        ra = RegId::from_nibble((regs >> NIBBLE_SHIFT) & NIBBLE_MASK);
        rb = RegId::from_nibble(regs & NIBBLE_MASK);
        next_addr += REGISTER_BYTES;
    }

    let mut imm = 0;
    if format.needs_imm {
        imm = mem.read_long(next_addr)?;
        next_addr += IMMEDIATE_BYTES;
    }

    Ok(DecodedInstruction {
        pc,
        opcode,
        ra,
        rb,
        imm,
        next_addr,
    })
}
