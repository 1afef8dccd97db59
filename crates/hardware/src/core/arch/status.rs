//! Machine status code.
//!
//! The status code gates execution: every value other than [`Status::Running`] is
//! terminal, and the driver stops after reporting the step that produced it.

use std::fmt;

use serde::{Serialize, Serializer};

/// Y86 machine status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Status {
    /// Normal operation (`AOK`).
    #[default]
    Running = 1,
    /// A `halt` instruction retired (`HLT`).
    Halted = 2,
    /// An instruction referenced an address outside memory (`ADR`).
    AddressFault = 3,
    /// An instruction with an invalid encoding was fetched (`INS`).
    IllegalInstruction = 4,
}

impl Status {
    /// Returns the numeric status code used in state records.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns the conventional short mnemonic (`AOK`, `HLT`, `ADR`, `INS`).
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Running => "AOK",
            Self::Halted => "HLT",
            Self::AddressFault => "ADR",
            Self::IllegalInstruction => "INS",
        }
    }

    /// Returns `true` once the machine can no longer make progress.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}
