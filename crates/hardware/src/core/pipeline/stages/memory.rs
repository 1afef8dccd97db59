//! Memory Access (MEM) Stage.
//!
//! This module implements the fourth stage. It performs at most one 8-byte data access:
//! 1. **Stores:** `rmmovq`/`pushq` write `valA` to `valE`; `call` writes the return address.
//! 2. **Loads:** `mrmovq` reads from `valE`; `popq`/`ret` read from the pre-adjustment `%rsp`.
//!
//! All accesses go through [`Cpu::read_long`] and [`Cpu::write_long`], which consult the
//! data cache model when it is enabled.

use crate::common::Fault;
use crate::core::Cpu;
use crate::core::pipeline::latches::{DecodedInstruction, ExecuteResult, MemoryResult, Operands};
use crate::isa::Opcode;

/// Executes the memory access stage.
///
/// # Arguments
///
/// * `cpu`  - CPU state; memory and cache are updated.
/// * `inst` - Instruction produced by fetch.
/// * `ops`  - Operands produced by decode.
/// * `ex`   - Result of the execute stage.
///
/// # Returns
///
/// `valM` for loads, or `Fault::Address` if the access leaves the image. A faulting
/// store leaves memory untouched.
pub fn mem_stage(
    cpu: &mut Cpu,
    inst: &DecodedInstruction,
    ops: Operands,
    ex: ExecuteResult,
) -> Result<MemoryResult, Fault> {
    let val_m = match inst.opcode {
        Opcode::Rmmovq | Opcode::Pushq => {
            cpu.write_long(ex.val_e, ops.val_a)?;
            None
        }
        Opcode::Call => {
            cpu.write_long(ex.val_e, inst.next_addr)?;
            None
        }
        Opcode::Mrmovq => Some(cpu.read_long(ex.val_e)?),
        Opcode::Popq | Opcode::Ret => Some(cpu.read_long(ops.val_a)?),
        _ => None,
    };
    Ok(MemoryResult { val_m })
}
