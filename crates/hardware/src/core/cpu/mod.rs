//! CPU Core Definition and Initialization.
//!
//! This module defines the central `Cpu` structure, which serves as the container for the
//! entire architectural state. It coordinates the following:
//! 1. **State Management:** Registers, program counter, condition codes and status.
//! 2. **Memory Hierarchy:** The flat memory image and the optional data cache model.
//! 3. **Observability:** Run statistics and per-instruction tracing.

/// Instruction execution orchestration across the six stages.
pub mod execution;

/// Data memory access through the cache model.
pub mod memory;

use crate::common::RegId;
use crate::config::Config;
use crate::core::arch::flags::ConditionCodes;
use crate::core::arch::gpr::Gpr;
use crate::core::arch::status::Status;
use crate::core::units::cache::CacheSim;
use crate::memory::MemoryImage;
use crate::stats::SimStats;

/// Main CPU structure containing all architectural state.
///
/// A `Cpu` exclusively owns its memory image and cache; independent simulations
/// each construct their own.
#[derive(Clone, Debug)]
pub struct Cpu {
    /// General purpose registers.
    pub regs: Gpr,
    /// Program counter.
    pub pc: i64,
    /// Condition codes.
    pub cc: ConditionCodes,
    /// Machine status; anything other than `Running` is terminal.
    pub status: Status,
    /// Flat byte-addressed memory.
    pub memory: MemoryImage,
    /// Direct-mapped data cache, present when the cache model is enabled.
    pub cache: Option<CacheSim>,
    /// Emit a trace event per retired instruction.
    pub trace: bool,
    /// Run statistics.
    pub stats: SimStats,
}

impl Cpu {
    /// Creates a CPU in its reset state.
    ///
    /// # Arguments
    ///
    /// * `config` - The simulator configuration parameters.
    ///
    /// # Returns
    ///
    /// A CPU with a zeroed image of `config.memory.size` bytes, status `AOK`,
    /// flags `ZF=1 SF=0 OF=0`, PC at `config.general.start_pc`, and `%rsp` seeded
    /// from `config.general.initial_sp` when given.
    pub fn new(config: &Config) -> Self {
        let mut regs = Gpr::new();
        if let Some(sp) = config.general.initial_sp {
            regs.write(RegId::Rsp, sp);
        }
        Self {
            regs,
            pc: config.general.start_pc,
            cc: ConditionCodes::default(),
            status: Status::Running,
            memory: MemoryImage::new(config.memory.size),
            cache: config.cache.enabled.then(|| CacheSim::new(&config.cache)),
            trace: config.general.trace_instructions,
            stats: SimStats::default(),
        }
    }

    /// Returns `true` while the status is `AOK` and the PC lies inside the image.
    pub fn can_step(&self) -> bool {
        !self.status.is_terminal() && self.memory.contains(self.pc)
    }
}
