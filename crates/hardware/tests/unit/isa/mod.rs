
/// Opcode classes, formats, functions and conditions.
pub mod opcodes;
