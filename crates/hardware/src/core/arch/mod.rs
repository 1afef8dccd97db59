//! Y86 architectural state components.
//!
//! This module contains the programmer-visible machine state apart from the program
//! counter and memory. It includes the following modules:
//! 1. **Flags:** The zero/sign/overflow condition codes.
//! 2. **GPRs:** The fifteen-entry general-purpose register file.
//! 3. **Status:** The machine status code and its terminal states.

/// Condition code register.
pub mod flags;

/// General-Purpose Register file implementation.
pub mod gpr;

/// Machine status code.
pub mod status;
