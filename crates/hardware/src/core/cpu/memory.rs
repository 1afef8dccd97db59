//! Data Memory Access Helpers.
//!
//! This module provides the interface between the memory stage and the memory subsystem.
//! It performs the following:
//! 1. **Bounds Checking:** Validates the whole access once, before any byte moves.
//! 2. **Cache Simulation:** Routes each byte through the data cache when it is enabled.
//! 3. **Write-Through:** Applies every store to the memory image before the cache sees it.

use super::Cpu;
use crate::common::Fault;
use crate::common::constants::WORD_SIZE;

impl Cpu {
    /// Reads one data byte.
    ///
    /// # Arguments
    ///
    /// * `addr` - Byte address.
    ///
    /// # Returns
    ///
    /// The byte, or `Fault::Address` if `addr` is outside the image.
    pub fn read_byte(&mut self, addr: i64) -> Result<u8, Fault> {
        let idx = self.memory.check_range(addr, 1)?;
        Ok(match self.cache.as_mut() {
            Some(cache) => cache.read_byte(&self.memory, idx as u64),
            None => self.memory.as_bytes()[idx],
        })
    }

    /// Writes one data byte to memory, then reports it to the cache.
    pub fn write_byte(&mut self, addr: i64, val: u8) -> Result<(), Fault> {
        let idx = self.memory.check_range(addr, 1)?;
        self.memory.write_byte(addr, val)?;
        if let Some(cache) = self.cache.as_mut() {
            cache.write_byte(&self.memory, idx as u64, val);
        }
        Ok(())
    }

    /// Reads a little-endian 64-bit word as eight byte accesses.
    ///
    /// The range `[addr, addr + 8)` is checked once up front; a straddling access
    /// faults without touching the cache.
    pub fn read_long(&mut self, addr: i64) -> Result<i64, Fault> {
        let _ = self.memory.check_range(addr, WORD_SIZE)?;
        let mut word = [0u8; WORD_SIZE];
        for (i, byte) in (0i64..).zip(word.iter_mut()) {
            *byte = self.read_byte(addr + i)?;
        }
        Ok(i64::from_le_bytes(word))
    }

    /// Writes a little-endian 64-bit word as eight byte accesses.
    ///
    /// Either all eight bytes are written or, on fault, none are.
    pub fn write_long(&mut self, addr: i64, val: i64) -> Result<(), Fault> {
        let _ = self.memory.check_range(addr, WORD_SIZE)?;
        for (i, byte) in (0i64..).zip(val.to_le_bytes()) {
            self.write_byte(addr + i, byte)?;
        }
        Ok(())
    }
}
