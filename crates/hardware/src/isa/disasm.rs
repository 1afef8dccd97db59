//! Instruction disassembler.
//!
//! Renders a [`DecodedInstruction`] in Y86 assembler syntax for trace logs and
//! diagnostics, e.g. `irmovq $0x5, %rax` or `mrmovq 0x8(%rsp), %rbx`.

use std::fmt;

use crate::common::RegId;
use crate::core::pipeline::latches::DecodedInstruction;
use crate::isa::Opcode;

/// Display adapter that formats an instruction in assembler syntax.
#[derive(Clone, Copy, Debug)]
pub struct Disasm<'a>(pub &'a DecodedInstruction);

/// Formats an optional register, rendering the absent encoding as `%none`.
struct Reg(Option<RegId>);

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(r) => write!(f, "{r}"),
            None => f.write_str("%none"),
        }
    }
}

impl fmt::Display for Disasm<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inst = self.0;
        let (ra, rb, imm) = (Reg(inst.ra), Reg(inst.rb), inst.imm);
        let op = inst.opcode;
        match op {
            Opcode::Halt | Opcode::Nop | Opcode::Ret => write!(f, "{op}"),
            Opcode::Cmov(_) | Opcode::Alu(_) => write!(f, "{op} {ra}, {rb}"),
            Opcode::Irmovq => write!(f, "{op} ${imm:#x}, {rb}"),
            Opcode::Rmmovq => write!(f, "{op} {ra}, {imm:#x}({rb})"),
            Opcode::Mrmovq => write!(f, "{op} {imm:#x}({rb}), {ra}"),
            Opcode::Jump(_) | Opcode::Call => write!(f, "{op} {imm:#x}"),
            Opcode::Pushq | Opcode::Popq => write!(f, "{op} {ra}"),
        }
    }
}

/// Disassembles an instruction into an owned string.
pub fn disassemble(inst: &DecodedInstruction) -> String {
    Disasm(inst).to_string()
}
