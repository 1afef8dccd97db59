//! Common utilities and types used throughout the Y86 simulator.
//!
//! This module provides fundamental building blocks that are shared across all components
//! of the simulator. It includes:
//! 1. **Constants:** Memory size, word width, encoding field widths, cache defaults.
//! 2. **Error Handling:** Architectural fault representation.
//! 3. **Register Identifiers:** Typed register names with an explicit "no register" case.

/// Common constants used throughout the simulator.
pub mod constants;

/// Architectural fault definitions.
pub mod error;

/// Register identifiers and name lookup.
pub mod reg;

pub use constants::{MEM_SIZE, NUM_REGS, WORD_SIZE};
pub use error::Fault;
pub use reg::RegId;
