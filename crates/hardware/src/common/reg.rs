//! Register Identifiers.
//!
//! This module provides `RegId`, the typed name of one of the fifteen Y86 general-purpose
//! registers. It provides:
//! 1. **Decoding:** Conversion from a register-specifier nibble, where `0xF` decodes to `None`.
//! 2. **Naming:** Canonical textual names (`rax` … `r14`) and parsing of those names.
//! 3. **Enumeration:** The full register list in encoding order.
//!
//! The "no register" encoding never becomes a `RegId`; it is represented as
//! `Option::<RegId>::None` so that slot 15 can never be read as real data.

use std::fmt;
use std::str::FromStr;

use super::constants::{NIBBLE_MASK, NUM_REGS, REG_NONE};

/// A Y86 general-purpose register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum RegId {
    /// `%rax` (0).
    Rax = 0x0,
    /// `%rcx` (1).
    Rcx = 0x1,
    /// `%rdx` (2).
    Rdx = 0x2,
    /// `%rbx` (3).
    Rbx = 0x3,
    /// `%rsp` (4), the implicit stack pointer.
    Rsp = 0x4,
    /// `%rbp` (5).
    Rbp = 0x5,
    /// `%rsi` (6).
    Rsi = 0x6,
    /// `%rdi` (7).
    Rdi = 0x7,
    /// `%r8` (8).
    R8 = 0x8,
    /// `%r9` (9).
    R9 = 0x9,
    /// `%r10` (10).
    R10 = 0xA,
    /// `%r11` (11).
    R11 = 0xB,
    /// `%r12` (12).
    R12 = 0xC,
    /// `%r13` (13).
    R13 = 0xD,
    /// `%r14` (14).
    R14 = 0xE,
}

/// Canonical register names, indexed by encoding.
const NAMES: [&str; NUM_REGS] = [
    "rax", "rcx", "rdx", "rbx", "rsp", "rbp", "rsi", "rdi", "r8", "r9", "r10", "r11", "r12",
    "r13", "r14",
];

impl RegId {
    /// All registers in encoding order.
    pub const ALL: [Self; NUM_REGS] = [
        Self::Rax,
        Self::Rcx,
        Self::Rdx,
        Self::Rbx,
        Self::Rsp,
        Self::Rbp,
        Self::Rsi,
        Self::Rdi,
        Self::R8,
        Self::R9,
        Self::R10,
        Self::R11,
        Self::R12,
        Self::R13,
        Self::R14,
    ];

    /// Decodes a register-specifier nibble.
    ///
    /// Only the low four bits of `nibble` are considered.
    ///
    /// # Returns
    ///
    /// `Some(reg)` for encodings `0x0..=0xE`, `None` for the `0xF` "no register" encoding.
    pub const fn from_nibble(nibble: u8) -> Option<Self> {
        let n = nibble & NIBBLE_MASK;
        if n == REG_NONE {
            None
        } else {
            Some(Self::ALL[n as usize])
        }
    }

    /// Returns the register's index into the register file (its encoding).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the canonical name without the `%` sigil.
    pub const fn name(self) -> &'static str {
        NAMES[self as usize]
    }

    /// Looks up a register by name.
    ///
    /// Accepts the name with or without a leading `%`, in any letter case.
    pub fn from_name(name: &str) -> Option<Self> {
        let bare = name.trim().trim_start_matches('%');
        Self::ALL
            .into_iter()
            .find(|reg| reg.name().eq_ignore_ascii_case(bare))
    }
}

impl fmt::Display for RegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.name())
    }
}

/// Error returned when a string does not name a register.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown register name '{0}'")]
pub struct UnknownRegister(pub String);

impl FromStr for RegId {
    type Err = UnknownRegister;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownRegister(s.to_string()))
    }
}
