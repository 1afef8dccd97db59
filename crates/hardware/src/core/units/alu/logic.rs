//! ALU bitwise operations.

use crate::isa::opcodes::AluFn;

/// Executes a bitwise operation; returns `0` for arithmetic functions.
pub const fn execute(op: AluFn, a: i64, b: i64) -> i64 {
    match op {
        AluFn::And => b & a,
        AluFn::Xor => b ^ a,
        AluFn::Add | AluFn::Sub => 0,
    }
}
