//! Main Execution Step.
//!
//! This module implements the SEQ step of the CPU. It performs the following:
//! 1. **Stage Coordination:** Runs fetch, decode, execute, memory, writeback and PC update in order.
//! 2. **Fault Handling:** Converts a stage fault into the terminal status and stops the step.
//! 3. **Observability:** Counts retired instructions and emits per-instruction trace events.

use super::Cpu;
use crate::common::Fault;
use crate::core::arch::status::Status;
use crate::core::pipeline::stages::{
    decode_stage, execute_stage, fetch_stage, mem_stage, pc_update_stage, wb_stage,
};
use crate::isa::disasm::Disasm;

impl Cpu {
    /// Executes one instruction.
    ///
    /// A step that faults stops at the faulting stage: a fetch fault leaves every
    /// register, flag and memory byte untouched, and a memory fault skips writeback and
    /// PC update. Calling `step` after the status has left `AOK` does nothing.
    ///
    /// # Returns
    ///
    /// The status after the step.
    pub fn step(&mut self) -> Status {
        if self.status.is_terminal() {
            return self.status;
        }
        self.stats.steps += 1;

        let inst = match fetch_stage(self) {
            Ok(inst) => inst,
            Err(fault) => return self.raise(fault),
        };
        let ops = decode_stage(self, &inst);
        let ex = execute_stage(self, &inst, ops);
        let mem = match mem_stage(self, &inst, ops, ex) {
            Ok(mem) => mem,
            Err(fault) => return self.raise(fault),
        };
        wb_stage(self, &inst, ex, mem);
        pc_update_stage(self, &inst, ex, mem);

        self.stats.record_retired(inst.opcode.class());
        if self.trace {
            tracing::trace!(
                step = self.stats.steps,
                pc = format_args!("{:#x}", inst.pc),
                inst = %Disasm(&inst),
                status = %self.status,
                "retired"
            );
        }
        self.status
    }

    /// Records `fault` as the terminal status.
    fn raise(&mut self, fault: Fault) -> Status {
        tracing::debug!(
            step = self.stats.steps,
            pc = format_args!("{:#x}", self.pc),
            %fault,
            "step faulted"
        );
        self.status = fault.status();
        self.status
    }
}
