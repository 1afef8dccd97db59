//! PC Update Stage.
//!
//! Selects the next program counter. Skipped once the status has left `AOK`, so a
//! halted machine keeps pointing at its `halt`.

use crate::core::Cpu;
use crate::core::pipeline::latches::{DecodedInstruction, ExecuteResult, MemoryResult};
use crate::isa::Opcode;

/// Executes the PC update stage.
///
/// `call` jumps to the immediate, `ret` to the popped address, a taken `jXX` to its
/// target. Everything else falls through to `valP`.
pub fn pc_update_stage(
    cpu: &mut Cpu,
    inst: &DecodedInstruction,
    ex: ExecuteResult,
    mem: MemoryResult,
) {
    if cpu.status.is_terminal() {
        return;
    }
    cpu.pc = match inst.opcode {
        Opcode::Call => inst.imm,
        Opcode::Ret => mem.val_m.unwrap_or(inst.next_addr),
        Opcode::Jump(_) if ex.cnd => inst.imm,
        _ => inst.next_addr,
    };
}
