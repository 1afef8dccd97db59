//! Condition code register.
//!
//! This module holds the three Y86 condition flags and the logic that consumes them. It performs:
//! 1. **Storage:** Zero, sign and overflow flags, reset to `ZF=1 SF=0 OF=0`.
//! 2. **Evaluation:** Resolution of a branch/move condition against the current flags.
//! 3. **Reporting:** Serialization as `{"ZF":0|1,"SF":0|1,"OF":0|1}`.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::isa::opcodes::Condition;

/// Zero, sign and overflow flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConditionCodes {
    /// Last ALU result was zero.
    pub zf: bool,
    /// Last ALU result was negative.
    pub sf: bool,
    /// Last ALU operation overflowed in two's complement.
    pub of: bool,
}

impl Default for ConditionCodes {
    /// Returns the reset value: `ZF=1 SF=0 OF=0`.
    fn default() -> Self {
        Self {
            zf: true,
            sf: false,
            of: false,
        }
    }
}

impl ConditionCodes {
    /// Creates a flag set from explicit values.
    pub const fn new(zf: bool, sf: bool, of: bool) -> Self {
        Self { zf, sf, of }
    }

    /// Evaluates a condition against these flags.
    ///
    /// # Arguments
    ///
    /// * `cond` - The condition decoded from an instruction's function field.
    ///
    /// # Returns
    ///
    /// Whether the condition holds. Unrecognized condition codes never hold.
    pub const fn satisfies(self, cond: Condition) -> bool {
        let less = self.sf != self.of;
        match cond {
            Condition::Always => true,
            Condition::Le => less || self.zf,
            Condition::L => less,
            Condition::E => self.zf,
            Condition::Ne => !self.zf,
            Condition::Ge => !less,
            Condition::G => !less && !self.zf,
            Condition::Unrecognized(_) => false,
        }
    }
}

impl Serialize for ConditionCodes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut cc = serializer.serialize_struct("CC", 3)?;
        cc.serialize_field("ZF", &u8::from(self.zf))?;
        cc.serialize_field("SF", &u8::from(self.sf))?;
        cc.serialize_field("OF", &u8::from(self.of))?;
        cc.end()
    }
}
