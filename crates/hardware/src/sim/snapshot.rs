//! Per-step state records and their consumers.
//!
//! This module defines what the simulator reports after every step. It provides:
//! 1. **Snapshot:** [`StepSnapshot`], the architecturally visible state after a step.
//! 2. **Sink trait:** [`StateSink`], the seam between the engine and whatever consumes records.
//! 3. **JSON output:** [`JsonSink`], which streams records as a JSON array, one per line.
//!
//! A record serializes as
//! `{"PC":..,"STAT":..,"CC":{"ZF":..,"SF":..,"OF":..},"REG":{"rax":..,..},"MEM":{"<addr>":..},"CACHE":{..}}`,
//! where `MEM` is omitted when every word is zero and `CACHE` only appears with the cache model.

use std::collections::BTreeMap;
use std::io::{self, Write};

use serde::Serialize;

use crate::core::Cpu;
use crate::core::arch::flags::ConditionCodes;
use crate::core::arch::gpr::Gpr;
use crate::core::arch::status::Status;
use crate::core::units::cache::CacheStats;

/// Architectural state captured after one step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StepSnapshot {
    /// Program counter.
    #[serde(rename = "PC")]
    pub pc: i64,
    /// Status code (1..=4).
    #[serde(rename = "STAT")]
    pub status: Status,
    /// Condition codes as 0/1.
    #[serde(rename = "CC")]
    pub cc: ConditionCodes,
    /// All fifteen registers by name.
    #[serde(rename = "REG")]
    pub regs: Gpr,
    /// Non-zero 8-byte-aligned words, keyed by address.
    #[serde(rename = "MEM", skip_serializing_if = "BTreeMap::is_empty")]
    pub mem: BTreeMap<u64, i64>,
    /// Cumulative cache counters, when the cache model is enabled.
    #[serde(rename = "CACHE", skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheStats>,
}

impl StepSnapshot {
    /// Captures the current state of `cpu`.
    pub fn capture(cpu: &Cpu) -> Self {
        Self {
            pc: cpu.pc,
            status: cpu.status,
            cc: cpu.cc,
            regs: cpu.regs.clone(),
            mem: cpu.memory.nonzero_words().collect(),
            cache: cpu.cache.as_ref().map(|cache| cache.stats()),
        }
    }
}

/// Errors raised while emitting records.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The destination could not be written.
    #[error("failed to write state record: {0}")]
    Io(#[from] io::Error),

    /// A record could not be serialized.
    #[error("failed to serialize state record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Consumer of per-step snapshots, in execution order.
pub trait StateSink {
    /// Receives the snapshot of one completed (or faulting) step.
    fn record(&mut self, snapshot: &StepSnapshot) -> Result<(), SinkError>;

    /// Called once after the last record.
    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Collects snapshots in memory.
impl StateSink for Vec<StepSnapshot> {
    fn record(&mut self, snapshot: &StepSnapshot) -> Result<(), SinkError> {
        self.push(snapshot.clone());
        Ok(())
    }
}

/// Streams snapshots as a JSON array with one record per line.
///
/// ```text
/// [
/// {"PC":10,...}
/// ,{"PC":20,...}
/// ]
/// ```
#[derive(Debug)]
pub struct JsonSink<W: Write> {
    out: W,
    opened: bool,
    records: usize,
}

impl<W: Write> JsonSink<W> {
    /// Wraps a writer. Nothing is written until the first record or `finish`.
    pub const fn new(out: W) -> Self {
        Self {
            out,
            opened: false,
            records: 0,
        }
    }

    /// Number of records written so far.
    pub const fn records(&self) -> usize {
        self.records
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn open(&mut self) -> io::Result<()> {
        if !self.opened {
            writeln!(self.out, "[")?;
            self.opened = true;
        }
        Ok(())
    }
}

impl<W: Write> StateSink for JsonSink<W> {
    fn record(&mut self, snapshot: &StepSnapshot) -> Result<(), SinkError> {
        self.open()?;
        if self.records > 0 {
            write!(self.out, ",")?;
        }
        serde_json::to_writer(&mut self.out, snapshot)?;
        writeln!(self.out)?;
        self.records += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.open()?;
        writeln!(self.out, "]")?;
        self.out.flush()?;
        Ok(())
    }
}
