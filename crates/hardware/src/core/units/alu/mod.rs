//! Arithmetic Logic Unit (ALU).
//!
//! This module implements the integer ALU used by the execute stage for `OPq`.
//! Every operation computes `valB op valA` and derives a fresh set of condition
//! codes from the result.
//!
//! Operations are organized into submodules by category:
//! - [`arithmetic`]: Add, Sub (with signed-overflow detection)
//! - [`logic`]:      And, Xor (overflow always clear)

/// Integer arithmetic operations (add, subtract).
pub mod arithmetic;

/// Bitwise logical operations (and, xor).
pub mod logic;

use crate::core::arch::flags::ConditionCodes;
use crate::isa::opcodes::AluFn;

/// Arithmetic Logic Unit for the four Y86 integer operations.
#[derive(Debug)]
pub struct Alu;

impl Alu {
    /// Executes an integer ALU operation.
    ///
    /// # Arguments
    ///
    /// * `op` - The ALU function decoded from the instruction.
    /// * `a`  - Value of `rA` (`valA`).
    /// * `b`  - Value of `rB` (`valB`), the left-hand operand.
    ///
    /// # Returns
    ///
    /// The result `b op a` and the condition codes it produces.
    ///
    /// # Examples
    ///
    /// ```
    /// use y86sim_core::core::units::alu::Alu;
    /// use y86sim_core::isa::AluFn;
    ///
    /// let (result, cc) = Alu::execute(AluFn::Sub, 3, 3);
    /// assert_eq!(result, 0);
    /// assert!(cc.zf);
    ///
    /// let (result, cc) = Alu::execute(AluFn::Add, 1, i64::MAX);
    /// assert_eq!(result, i64::MIN);
    /// assert!(cc.of && cc.sf);
    /// ```
    pub const fn execute(op: AluFn, a: i64, b: i64) -> (i64, ConditionCodes) {
        let (result, overflow) = match op {
            AluFn::Add | AluFn::Sub => arithmetic::execute(op, a, b),
            AluFn::And | AluFn::Xor => (logic::execute(op, a, b), false),
        };
        (result, ConditionCodes::new(result == 0, result < 0, overflow))
    }
}
