//! Stage implementations.
//!
//! This module contains the individual implementations of the six SEQ stages. It includes:
//! 1. **Fetch:** Reads and splits the instruction at the PC.
//! 2. **Decode:** Selects and reads the source registers.
//! 3. **Execute:** Runs the ALU, computes effective addresses and evaluates conditions.
//! 4. **Memory:** Performs the single data read or write through the cache model.
//! 5. **Writeback:** Commits `valE` and `valM` to the register file.
//! 6. **PC update:** Selects the next program counter.

/// Instruction decode stage implementation.
pub mod decode;

/// Instruction execute stage implementation.
pub mod execute;

/// Instruction fetch stage implementation.
pub mod fetch;

/// Memory access stage implementation.
pub mod memory;

/// Program counter update stage implementation.
pub mod pc_update;

/// Writeback stage implementation.
pub mod writeback;

/// Decode stage entry point.
pub use decode::decode_stage;
/// Execute stage entry point.
pub use execute::execute_stage;
/// Fetch stage entry point.
pub use fetch::fetch_stage;
/// Memory stage entry point.
pub use memory::mem_stage;
/// PC update stage entry point.
pub use pc_update::pc_update_stage;
/// Writeback stage entry point.
pub use writeback::wb_stage;
