//! Simulation statistics collection and reporting.
//!
//! This module tracks run metrics for the Y86 simulator. It provides:
//! 1. **Throughput:** Steps executed, instructions retired, and host-side speed.
//! 2. **Instruction mix:** Counts by category (move, ALU, load, store, control, other).
//! 3. **Data cache:** Hit/miss counts and hit rate when the cache model is enabled.

use std::io::{self, Write};
use std::time::Instant;

use crate::core::units::cache::CacheStats;
use crate::isa::opcodes::OpClass;

/// Simulation statistics structure tracking all run metrics.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Steps attempted, including the one that faulted or halted.
    pub steps: u64,
    /// Instructions that completed every stage (faulting instructions are not retired).
    pub instructions_retired: u64,

    /// Register and immediate moves (`rrmovq`, `cmovXX`, `irmovq`).
    pub inst_move: u64,
    /// `OPq` instructions.
    pub inst_alu: u64,
    /// Memory reads (`mrmovq`, `popq`).
    pub inst_load: u64,
    /// Memory writes (`rmmovq`, `pushq`).
    pub inst_store: u64,
    /// Control transfers (`jXX`, `call`, `ret`).
    pub inst_control: u64,
    /// Everything else (`halt`, `nop`).
    pub inst_other: u64,

    /// Data cache counters; `None` when the cache model is disabled.
    pub cache: Option<CacheStats>,
}

impl Default for SimStats {
    /// Returns zeroed counters with the host clock started now.
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            steps: 0,
            instructions_retired: 0,
            inst_move: 0,
            inst_alu: 0,
            inst_load: 0,
            inst_store: 0,
            inst_control: 0,
            inst_other: 0,
            cache: None,
        }
    }
}

/// Section names for selective stats output.
///
/// Pass an empty slice to [`SimStats::write_sections`] to print all of them.
pub const STATS_SECTIONS: &[&str] = &["summary", "instruction_mix", "cache"];

impl SimStats {
    /// Counts one retired instruction of the given class.
    pub const fn record_retired(&mut self, class: OpClass) {
        self.instructions_retired += 1;
        match class {
            OpClass::Rrmovq | OpClass::Irmovq => self.inst_move += 1,
            OpClass::Opq => self.inst_alu += 1,
            OpClass::Mrmovq | OpClass::Popq => self.inst_load += 1,
            OpClass::Rmmovq | OpClass::Pushq => self.inst_store += 1,
            OpClass::Jxx | OpClass::Call | OpClass::Ret => self.inst_control += 1,
            OpClass::Halt | OpClass::Nop => self.inst_other += 1,
        }
    }

    /// Writes the requested statistics sections to `out`.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Unknown names
    /// are ignored. The `cache` section is skipped when the cache model was disabled.
    ///
    /// # Arguments
    ///
    /// * `out`      - Destination, typically stderr.
    /// * `sections` - Section names to print, or empty for all.
    ///
    /// # Errors
    ///
    /// Propagates any I/O error from `out`.
    pub fn write_sections(&self, out: &mut dyn Write, sections: &[String]) -> io::Result<()> {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();
        let instr = self.instructions_retired.max(1) as f64;

        writeln!(out, "\n==========================================================")?;
        writeln!(out, "Y86-64 SIMULATION STATISTICS")?;
        writeln!(out, "==========================================================")?;
        if want("summary") {
            let mips = if seconds > 0.0 {
                self.instructions_retired as f64 / seconds / 1_000_000.0
            } else {
                0.0
            };
            writeln!(out, "host_seconds             {seconds:.4} s")?;
            writeln!(out, "sim_steps                {}", self.steps)?;
            writeln!(out, "sim_insts                {}", self.instructions_retired)?;
            writeln!(out, "sim_mips                 {mips:.2}")?;
            writeln!(out, "----------------------------------------------------------")?;
        }
        if want("instruction_mix") {
            writeln!(out, "INSTRUCTION MIX")?;
            for (name, count) in [
                ("op.move", self.inst_move),
                ("op.alu", self.inst_alu),
                ("op.load", self.inst_load),
                ("op.store", self.inst_store),
                ("op.control", self.inst_control),
                ("op.other", self.inst_other),
            ] {
                writeln!(
                    out,
                    "  {name:<22} {count} ({:.2}%)",
                    count as f64 / instr * 100.0
                )?;
            }
            writeln!(out, "----------------------------------------------------------")?;
        }
        if let (true, Some(cache)) = (want("cache"), self.cache) {
            writeln!(out, "DATA CACHE")?;
            writeln!(out, "  cache.accesses         {}", cache.total())?;
            writeln!(out, "  cache.hits             {}", cache.hits)?;
            writeln!(out, "  cache.misses           {}", cache.misses)?;
            writeln!(out, "  cache.hit_rate         {:.2}%", cache.hit_rate())?;
            writeln!(out, "----------------------------------------------------------")?;
        }
        writeln!(out, "==========================================================")
    }
}
