//! Y86 General-Purpose Register File.
//!
//! This module implements the General-Purpose Register (GPR) file. It performs the following:
//! 1. **Storage:** Maintains 15 signed 64-bit registers (`%rax`-`%r14`).
//! 2. **Typed Access:** Reads and writes are keyed by [`RegId`], so the "no register"
//!    encoding cannot address storage.
//! 3. **Reporting:** Serializes as a name-keyed map in encoding order.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::common::{NUM_REGS, RegId};

/// General-Purpose Register file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Gpr {
    regs: [i64; NUM_REGS],
}

impl Gpr {
    /// Creates a new register file with all registers initialized to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a general-purpose register value.
    #[inline]
    pub const fn read(&self, reg: RegId) -> i64 {
        self.regs[reg.index()]
    }

    /// Reads an optional operand; the absent operand reads as zero.
    #[inline]
    pub fn read_opt(&self, reg: Option<RegId>) -> i64 {
        reg.map_or(0, |r| self.read(r))
    }

    /// Writes a value to a general-purpose register.
    #[inline]
    pub const fn write(&mut self, reg: RegId, val: i64) {
        self.regs[reg.index()] = val;
    }

    /// Writes to an optional destination; writes to an absent register are dropped.
    #[inline]
    pub const fn write_opt(&mut self, reg: Option<RegId>, val: i64) {
        if let Some(r) = reg {
            self.write(r, val);
        }
    }

    /// Returns all register values in encoding order.
    pub const fn values(&self) -> &[i64; NUM_REGS] {
        &self.regs
    }

    /// Iterates over `(register, value)` pairs in encoding order.
    pub fn iter(&self) -> impl Iterator<Item = (RegId, i64)> + '_ {
        RegId::ALL.into_iter().map(|r| (r, self.read(r)))
    }
}

impl Serialize for Gpr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(NUM_REGS))?;
        for (reg, val) in self.iter() {
            map.serialize_entry(reg.name(), &val)?;
        }
        map.end()
    }
}
