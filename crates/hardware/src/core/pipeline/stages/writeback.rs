//! Writeback (WB) Stage.
//!
//! This module implements the fifth stage. It commits up to two register writes:
//! 1. **`dstE`:** `valE` to `rB` (`OPq`, `irmovq`, a taken `cmovXX`) or to `%rsp` (stack ops).
//! 2. **`dstM`:** `valM` to `rA` (`mrmovq`, `popq`), written after `dstE`.
//!
//! Because `dstM` lands second, `popq %rsp` leaves the popped value in `%rsp`.

use crate::common::RegId;
use crate::core::Cpu;
use crate::core::pipeline::latches::{DecodedInstruction, ExecuteResult, MemoryResult};
use crate::isa::Opcode;

/// Destination register for `valE`, if any.
pub const fn dst_e(inst: &DecodedInstruction, ex: ExecuteResult) -> Option<RegId> {
    match inst.opcode {
        Opcode::Cmov(_) if ex.cnd => inst.rb,
        Opcode::Alu(_) | Opcode::Irmovq => inst.rb,
        Opcode::Pushq | Opcode::Popq | Opcode::Call | Opcode::Ret => Some(RegId::Rsp),
        _ => None,
    }
}

/// Destination register for `valM`, if any.
pub const fn dst_m(inst: &DecodedInstruction) -> Option<RegId> {
    match inst.opcode {
        Opcode::Mrmovq | Opcode::Popq => inst.ra,
        _ => None,
    }
}

/// Executes the writeback stage.
///
/// # Arguments
///
/// * `cpu`  - CPU state; the register file is updated.
/// * `inst` - Instruction produced by fetch.
/// * `ex`   - Result of the execute stage.
/// * `mem`  - Result of the memory stage.
pub fn wb_stage(cpu: &mut Cpu, inst: &DecodedInstruction, ex: ExecuteResult, mem: MemoryResult) {
    cpu.regs.write_opt(dst_e(inst, ex), ex.val_e);
    if let Some(val_m) = mem.val_m {
        cpu.regs.write_opt(dst_m(inst), val_m);
    }
}
