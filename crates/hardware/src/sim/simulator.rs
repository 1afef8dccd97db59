//! Simulator: owns the CPU and drives it to completion.
//!
//! This module is the top-level entry point of the core crate. It performs:
//! 1. **Setup:** Builds a CPU from a [`Config`] and loads object text or assembly source
//!    into its memory.
//! 2. **Stepping:** Executes one instruction and captures a [`StepSnapshot`].
//! 3. **Run loop:** Steps until the status leaves `AOK`, the PC leaves the image, or the
//!    optional step limit is reached, handing every snapshot to a [`StateSink`].

use std::io::BufRead;
use std::path::Path;

use crate::common::RegId;
use crate::config::Config;
use crate::core::Cpu;
use crate::core::arch::status::Status;
use crate::sim::assembler::{self, AsmError, Assembly};
use crate::sim::loader::{self, LoadError, LoadSummary};
use crate::sim::snapshot::{SinkError, StateSink, StepSnapshot};
use crate::stats::SimStats;

/// Why a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The status left `AOK` (halt or fault).
    Status(Status),
    /// The PC after a step lies outside the memory image.
    PcOutOfRange(i64),
    /// The configured step limit was reached.
    StepLimit(u64),
}

/// Outcome of [`Simulator::run`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Steps executed during this run.
    pub steps: u64,
    /// Final status.
    pub status: Status,
    /// Why the loop stopped.
    pub reason: StopReason,
}

/// Top-level simulator.
#[derive(Clone, Debug)]
pub struct Simulator {
    /// CPU architectural state (registers, memory, cache, stats).
    pub cpu: Cpu,
    max_steps: Option<u64>,
}

impl Simulator {
    /// Creates a simulator in its reset state.
    pub fn new(config: &Config) -> Self {
        Self {
            cpu: Cpu::new(config),
            max_steps: config.general.max_steps,
        }
    }

    /// Loads object text from `reader` into memory.
    pub fn load_object<R: BufRead>(&mut self, reader: R) -> Result<LoadSummary, LoadError> {
        loader::load_object(reader, &mut self.cpu.memory)
    }

    /// Loads an object file from disk into memory.
    pub fn load_object_file(&mut self, path: impl AsRef<Path>) -> Result<LoadSummary, LoadError> {
        loader::load_object_file(path, &mut self.cpu.memory)
    }

    /// Assembles `source`, places the image at address 0 and seeds `%rsp`.
    ///
    /// # Arguments
    ///
    /// * `source` - `.ys` assembly text.
    /// * `stack`  - Initial `%rsp`; `None` points it at the end of memory.
    ///
    /// # Returns
    ///
    /// The assembled image and symbol table. Bytes past the end of memory are
    /// dropped with a warning.
    ///
    /// # Errors
    ///
    /// Any [`AsmError`]; memory and registers are untouched in that case.
    pub fn load_assembly(&mut self, source: &str, stack: Option<i64>) -> Result<Assembly, AsmError> {
        let asm = assembler::assemble(source)?;
        self.place_assembly(&asm, stack);
        Ok(asm)
    }

    /// Reads a `.ys` file and loads it as [`Simulator::load_assembly`] does.
    pub fn load_assembly_file(
        &mut self,
        path: impl AsRef<Path>,
        stack: Option<i64>,
    ) -> Result<Assembly, AsmError> {
        let asm = assembler::assemble_file(path)?;
        self.place_assembly(&asm, stack);
        Ok(asm)
    }

    fn place_assembly(&mut self, asm: &Assembly, stack: Option<i64>) {
        let memory = &mut self.cpu.memory;
        let written = memory.load(0, &asm.bytes);
        if written < asm.bytes.len() {
            tracing::warn!(
                dropped = asm.bytes.len() - written,
                size = memory.len(),
                "assembled image larger than memory"
            );
        }
        let sp = stack.unwrap_or(memory.len() as i64);
        self.cpu.regs.write(RegId::Rsp, sp);
    }

    /// Captures the current state without executing anything.
    pub fn snapshot(&self) -> StepSnapshot {
        StepSnapshot::capture(&self.cpu)
    }

    /// Executes one instruction and returns the resulting state.
    pub fn step(&mut self) -> StepSnapshot {
        let _ = self.cpu.step();
        self.snapshot()
    }

    /// Runs until a stop condition, recording one snapshot per step.
    ///
    /// The faulting or halting step is still recorded. `sink.finish()` is called once
    /// the loop ends, even if no step ran.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by `sink`; the machine state at that point
    /// reflects the step whose record failed.
    pub fn run(&mut self, sink: &mut dyn StateSink) -> Result<RunSummary, SinkError> {
        let start = self.cpu.stats.steps;
        let reason = loop {
            if self.cpu.status.is_terminal() {
                break StopReason::Status(self.cpu.status);
            }
            if let Some(limit) = self.max_steps {
                if self.cpu.stats.steps - start >= limit {
                    tracing::warn!(
                        limit,
                        pc = format_args!("{:#x}", self.cpu.pc),
                        "step limit reached"
                    );
                    break StopReason::StepLimit(limit);
                }
            }

            let snapshot = self.step();
            sink.record(&snapshot)?;

            if !self.cpu.can_step() && !self.cpu.status.is_terminal() {
                break StopReason::PcOutOfRange(self.cpu.pc);
            }
        };
        sink.finish()?;

        let summary = RunSummary {
            steps: self.cpu.stats.steps - start,
            status: self.cpu.status,
            reason,
        };
        tracing::info!(
            steps = summary.steps,
            status = %summary.status,
            reason = ?summary.reason,
            "run finished"
        );
        Ok(summary)
    }

    /// Returns run statistics, including cache counters when the cache model is enabled.
    pub fn stats(&self) -> SimStats {
        let mut stats = self.cpu.stats.clone();
        stats.cache = self.cpu.cache.as_ref().map(|cache| cache.stats());
        stats
    }
}
