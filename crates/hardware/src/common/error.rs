//! Architectural fault definitions.
//!
//! This module defines the two fault classes the Y86 machine can raise. It provides:
//! 1. **Fault Representation:** Addressing faults and illegal instruction encodings.
//! 2. **Status Mapping:** Conversion of a fault into the terminal machine status.
//! 3. **Error Handling:** Integration with standard Rust error traits for host-side reporting.
//!
//! Faults are values, not control flow: memory primitives return them in a `Result`
//! and the execution stage that receives one records the matching [`Status`] on the CPU.

use std::fmt;

use crate::core::arch::status::Status;

/// A fault detected while executing a single instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fault {
    /// Memory or PC reference outside the image.
    ///
    /// The associated value is the first address of the offending access.
    Address(i64),

    /// Opcode byte whose class (or function) is not part of the instruction set.
    ///
    /// The associated value is the full opcode byte.
    IllegalInstruction(u8),
}

impl Fault {
    /// Returns the terminal status this fault puts the machine into.
    pub const fn status(self) -> Status {
        match self {
            Self::Address(_) => Status::AddressFault,
            Self::IllegalInstruction(_) => Status::IllegalInstruction,
        }
    }
}

impl fmt::Display for Fault {
    /// Formats the fault for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(addr) => write!(f, "AddressFault({addr:#x})"),
            Self::IllegalInstruction(byte) => write!(f, "IllegalInstruction({byte:#04x})"),
        }
    }
}

impl std::error::Error for Fault {}
