//! Execute (EX) Stage.
//!
//! This module implements the third stage. It performs the following:
//! 1. **Arithmetic Execution:** Runs `OPq` through the ALU and latches the new condition codes.
//! 2. **Address Generation:** Computes effective addresses and stack pointer adjustments.
//! 3. **Condition Evaluation:** Resolves `cmovXX`/`jXX` against the current flags.
//! 4. **Halt:** Moves the machine to `HLT`.

use crate::common::constants::STACK_STEP;
use crate::core::Cpu;
use crate::core::arch::status::Status;
use crate::core::pipeline::latches::{DecodedInstruction, ExecuteResult, Operands};
use crate::core::units::alu::Alu;
use crate::isa::Opcode;

/// Executes the instruction execute stage.
///
/// # Arguments
///
/// * `cpu`  - CPU state; condition codes and status may be updated.
/// * `inst` - Instruction produced by fetch.
/// * `ops`  - Operands produced by decode.
///
/// # Returns
///
/// `valE` and the condition outcome.
pub fn execute_stage(cpu: &mut Cpu, inst: &DecodedInstruction, ops: Operands) -> ExecuteResult {
    let Operands { val_a, val_b } = ops;
    let mut cnd = false;

    let val_e = match inst.opcode {
        Opcode::Alu(op) => {
            let (result, cc) = Alu::execute(op, val_a, val_b);
            cpu.cc = cc;
            result
        }
        Opcode::Irmovq => inst.imm,
        Opcode::Cmov(cond) => {
            cnd = cpu.cc.satisfies(cond);
            val_a
        }
        Opcode::Jump(cond) => {
            cnd = cpu.cc.satisfies(cond);
            0
        }
        Opcode::Rmmovq | Opcode::Mrmovq => val_b.wrapping_add(inst.imm),
        Opcode::Pushq | Opcode::Call => val_b.wrapping_sub(STACK_STEP),
        Opcode::Popq | Opcode::Ret => val_b.wrapping_add(STACK_STEP),
        Opcode::Halt => {
            cpu.status = Status::Halted;
            0
        }
        Opcode::Nop => 0,
    };

    ExecuteResult { val_e, cnd }
}
