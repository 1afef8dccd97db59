//! Physical System Memory.
//!
//! This module implements the flat, fixed-size memory image the simulator executes from.
//! It provides:
//! 1. **Checked Access:** Byte and 64-bit little-endian word primitives that reject any
//!    reference outside `[0, size)` with [`Fault::Address`].
//! 2. **Atomic Word Access:** Word accesses are range-checked once, up front, so a word
//!    straddling the end of memory faults without touching any byte.
//! 3. **Loading and Inspection:** Bulk loading for the object loader, lenient peeks for
//!    cache refills, a sparse scan of non-zero words for state reporting, and a hex dump.

use std::io::{self, Write};

use crate::common::constants::{MEM_SIZE, WORD_SIZE};
use crate::common::Fault;

/// Flat byte-addressable memory image.
///
/// The image is created once with a fixed size and never resized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryImage {
    bytes: Vec<u8>,
}

impl Default for MemoryImage {
    /// Returns a zeroed 64 KiB image.
    fn default() -> Self {
        Self::new(MEM_SIZE)
    }
}

impl MemoryImage {
    /// Creates a zero-filled memory image.
    ///
    /// # Arguments
    ///
    /// * `size` - Size of the image in bytes.
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0; size],
        }
    }

    /// Creates an image of `size` bytes whose prefix is `data`.
    ///
    /// Bytes of `data` beyond `size` are dropped.
    pub fn from_bytes(size: usize, data: &[u8]) -> Self {
        let mut image = Self::new(size);
        let _ = image.load(0, data);
        image
    }

    /// Returns the size of the image in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` for a zero-sized image.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the raw contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Validates an access of `width` bytes starting at `addr`.
    ///
    /// # Returns
    ///
    /// The starting index into the image, or `Fault::Address(addr)` if
    /// `addr < 0` or `addr + width > size`.
    pub fn check_range(&self, addr: i64, width: usize) -> Result<usize, Fault> {
        usize::try_from(addr)
            .ok()
            .filter(|start| {
                start
                    .checked_add(width)
                    .is_some_and(|end| end <= self.bytes.len())
            })
            .ok_or(Fault::Address(addr))
    }

    /// Returns `true` if a single byte at `addr` is addressable.
    pub fn contains(&self, addr: i64) -> bool {
        self.check_range(addr, 1).is_ok()
    }

    /// Reads one byte.
    pub fn read_byte(&self, addr: i64) -> Result<u8, Fault> {
        let idx = self.check_range(addr, 1)?;
        Ok(self.bytes[idx])
    }

    /// Writes one byte.
    pub fn write_byte(&mut self, addr: i64, val: u8) -> Result<(), Fault> {
        let idx = self.check_range(addr, 1)?;
        self.bytes[idx] = val;
        Ok(())
    }

    /// Reads a 64-bit little-endian word.
    ///
    /// Byte `i` of the result comes from `addr + i`.
    pub fn read_long(&self, addr: i64) -> Result<i64, Fault> {
        let start = self.check_range(addr, WORD_SIZE)?;
        let mut word = [0u8; WORD_SIZE];
        word.copy_from_slice(&self.bytes[start..start + WORD_SIZE]);
        Ok(i64::from_le_bytes(word))
    }

    /// Writes a 64-bit little-endian word.
    ///
    /// Either all eight bytes are written or, on fault, none are.
    pub fn write_long(&mut self, addr: i64, val: i64) -> Result<(), Fault> {
        let start = self.check_range(addr, WORD_SIZE)?;
        self.bytes[start..start + WORD_SIZE].copy_from_slice(&val.to_le_bytes());
        Ok(())
    }

    /// Reads a byte without faulting; addresses outside the image read as zero.
    ///
    /// Used for cache block refills, which are not architecturally visible.
    pub fn peek(&self, addr: u64) -> u8 {
        usize::try_from(addr)
            .ok()
            .and_then(|idx| self.bytes.get(idx).copied())
            .unwrap_or(0)
    }

    /// Copies `data` into the image starting at `addr`.
    ///
    /// # Returns
    ///
    /// The number of bytes written. Bytes that would land at or beyond the end of
    /// the image are dropped.
    pub fn load(&mut self, addr: u64, data: &[u8]) -> usize {
        let Ok(start) = usize::try_from(addr) else {
            return 0;
        };
        if start >= self.bytes.len() {
            return 0;
        }
        let count = data.len().min(self.bytes.len() - start);
        self.bytes[start..start + count].copy_from_slice(&data[..count]);
        count
    }

    /// Iterates over every non-zero, 8-byte-aligned word as `(address, value)`.
    ///
    /// A trailing partial word (when the size is not a multiple of eight) is skipped.
    pub fn nonzero_words(&self) -> impl Iterator<Item = (u64, i64)> + '_ {
        self.bytes
            .chunks_exact(WORD_SIZE)
            .enumerate()
            .filter_map(|(i, chunk)| {
                let mut word = [0u8; WORD_SIZE];
                word.copy_from_slice(chunk);
                let val = i64::from_le_bytes(word);
                (val != 0).then_some(((i * WORD_SIZE) as u64, val))
            })
    }

    /// Writes `len` bytes starting at `start` as a hex dump, 16 bytes per line.
    ///
    /// Lines look like `0x0010: 30 f0 ...`. The range is clipped to the image.
    pub fn write_hexdump(&self, out: &mut dyn Write, start: usize, len: usize) -> io::Result<()> {
        let end = start.saturating_add(len).min(self.bytes.len());
        let Some(window) = self.bytes.get(start..end) else {
            return Ok(());
        };
        for (i, row) in window.chunks(16).enumerate() {
            let hex: Vec<String> = row.iter().map(|b| format!("{b:02x}")).collect();
            writeln!(out, "0x{:04x}: {}", start + i * 16, hex.join(" "))?;
        }
        Ok(())
    }
}
