//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains the Y86-64 opcode classes, function codes, the per-class encoding table,
//! and a disassembler used by trace logging.
//!
//! # Encoding
//!
//! Every instruction starts with an opcode byte whose high nibble selects the class
//! and whose low nibble selects the function (ALU operation or condition). Depending
//! on the class, a register-specifier byte (`rA:rB`) and an 8-byte little-endian
//! immediate follow.

/// Instruction disassembler for debug tracing and diagnostics.
pub mod disasm;

/// Opcode classes, function codes and the encoding table.
pub mod opcodes;

pub use opcodes::{AluFn, Condition, InstrFormat, OpClass, Opcode};
