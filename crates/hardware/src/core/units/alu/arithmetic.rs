//! ALU arithmetic operations.
//!
//! Results wrap modulo 2^64. Overflow is the exact two's-complement overflow
//! of the signed operation, as reported by `overflowing_add`/`overflowing_sub`.

use crate::isa::opcodes::AluFn;

/// Executes an arithmetic operation.
///
/// # Arguments
///
/// * `op` - `Add` or `Sub`.
/// * `a`  - Right-hand operand (`valA`).
/// * `b`  - Left-hand operand (`valB`).
///
/// # Returns
///
/// The wrapped result and whether signed overflow occurred. Non-arithmetic
/// functions yield `(0, false)`.
pub const fn execute(op: AluFn, a: i64, b: i64) -> (i64, bool) {
    match op {
        AluFn::Add => b.overflowing_add(a),
        AluFn::Sub => b.overflowing_sub(a),
        AluFn::And | AluFn::Xor => (0, false),
    }
}
