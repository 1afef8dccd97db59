//! Global System Constants.
//!
//! This module defines the architectural constants shared across the simulator. It includes:
//! 1. **Memory Constants:** Default image size and machine word width.
//! 2. **Instruction Constants:** Nibble masks and encoded field widths.
//! 3. **Register Constants:** Register-file size and the "no register" encoding.

/// Default size of the flat memory image in bytes (64 KiB).
pub const MEM_SIZE: usize = 0x1_0000;

/// Smallest memory image accepted by the configuration layer.
///
/// Large enough to hold the longest instruction encoding plus one word.
pub const MIN_MEM_SIZE: usize = 16;

/// Width of a machine word (and of every data memory access) in bytes.
pub const WORD_SIZE: usize = 8;

/// Amount the stack pointer moves on push/pop/call/ret.
pub const STACK_STEP: i64 = WORD_SIZE as i64;

/// Mask selecting the low nibble of an encoded byte.
pub const NIBBLE_MASK: u8 = 0x0F;

/// Shift that brings the high nibble of an encoded byte down to bit 0.
pub const NIBBLE_SHIFT: u8 = 4;

/// Length of the opcode byte.
pub const OPCODE_BYTES: i64 = 1;

/// Length of the register-specifier byte.
pub const REGISTER_BYTES: i64 = 1;

/// Length of an immediate / displacement / destination field.
pub const IMMEDIATE_BYTES: i64 = WORD_SIZE as i64;

/// Number of architectural general-purpose registers.
pub const NUM_REGS: usize = 15;

/// Register-specifier nibble meaning "no register".
pub const REG_NONE: u8 = 0xF;

/// Default cache block size exponent (8-byte blocks).
pub const CACHE_BLOCK_BITS: u32 = 3;

/// Default cache set-count exponent (16 sets).
pub const CACHE_SET_BITS: u32 = 4;

/// Largest accepted block or set exponent.
pub const CACHE_MAX_BITS: u32 = 12;
