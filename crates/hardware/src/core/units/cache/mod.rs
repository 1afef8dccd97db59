//! Direct-Mapped Data Cache Simulator.
//!
//! This module implements the data cache sitting between the memory stage and the
//! flat memory image. It provides:
//! 1. **Lookup:** Address decomposition into tag, set and offset for a direct-mapped layout.
//! 2. **Refill:** Whole-block fills from the memory image on every miss.
//! 3. **Accounting:** Per-byte hit and miss counters exposed as [`CacheStats`].
//!
//! The cache is write-through with write-allocate: the caller updates the memory
//! image first and then reports the store here, so memory is always authoritative.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::config::CacheConfig;
use crate::memory::MemoryImage;

/// One cache line: a valid bit, a tag and a copy of the block contents.
#[derive(Clone, Debug)]
struct CacheLine {
    valid: bool,
    tag: u64,
    block: Vec<u8>,
}

impl CacheLine {
    fn empty(block_size: usize) -> Self {
        Self {
            valid: false,
            tag: 0,
            block: vec![0; block_size],
        }
    }
}

/// Hit and miss counters for the data cache.
///
/// Every byte touched by the memory stage counts once, so an 8-byte access
/// contributes eight lookups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Byte accesses that found their block resident.
    pub hits: u64,
    /// Byte accesses that had to refill their block.
    pub misses: u64,
}

impl CacheStats {
    /// Total number of byte accesses.
    pub const fn total(&self) -> u64 {
        self.hits + self.misses
    }

    /// Percentage of accesses that hit (`0.0..=100.0`); `0.0` before any access.
    pub fn hit_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64 * 100.0
        }
    }
}

impl Serialize for CacheStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut stats = serializer.serialize_struct("CACHE", 4)?;
        stats.serialize_field("hits", &self.hits)?;
        stats.serialize_field("misses", &self.misses)?;
        stats.serialize_field("total", &self.total())?;
        stats.serialize_field("rate", &self.hit_rate())?;
        stats.end()
    }
}

/// Direct-mapped cache with `2^set_bits` lines of `2^block_bits` bytes each.
#[derive(Clone, Debug)]
pub struct CacheSim {
    lines: Vec<CacheLine>,
    block_bits: u32,
    set_bits: u32,
    stats: CacheStats,
}

impl CacheSim {
    /// Creates an empty (all-invalid) cache with the configured geometry.
    ///
    /// # Arguments
    ///
    /// * `config` - Cache configuration; only the geometry fields are used.
    ///
    /// # Returns
    ///
    /// A cache whose lines are all invalid and whose counters are zero.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            lines: vec![CacheLine::empty(config.block_size()); config.num_sets()],
            block_bits: config.block_bits,
            set_bits: config.set_bits,
            stats: CacheStats::default(),
        }
    }

    /// Block size in bytes.
    pub const fn block_size(&self) -> usize {
        1 << self.block_bits
    }

    /// Number of sets.
    pub fn num_sets(&self) -> usize {
        self.lines.len()
    }

    /// Splits an address into `(set, tag, offset)`.
    ///
    /// # Arguments
    ///
    /// * `addr` - Byte address.
    ///
    /// # Returns
    ///
    /// The set index (always `< num_sets()`), the tag and the offset within the block.
    pub const fn locate(&self, addr: u64) -> (usize, u64, usize) {
        let offset = (addr & ((1 << self.block_bits) - 1)) as usize;
        let set = ((addr >> self.block_bits) & ((1 << self.set_bits) - 1)) as usize;
        let tag = addr >> (self.block_bits + self.set_bits);
        (set, tag, offset)
    }

    /// Checks whether the block holding `addr` is resident, without touching counters.
    pub fn contains(&self, addr: u64) -> bool {
        let (set, tag, _) = self.locate(addr);
        let line = &self.lines[set];
        line.valid && line.tag == tag
    }

    /// Reads one byte through the cache.
    ///
    /// On a miss the whole block is refilled from `memory` before the byte is
    /// returned. Counts one hit or one miss.
    ///
    /// # Arguments
    ///
    /// * `memory` - Backing image used for refills.
    /// * `addr`   - Byte address; the caller has already bounds-checked it.
    pub fn read_byte(&mut self, memory: &MemoryImage, addr: u64) -> u8 {
        let (set, tag, offset) = self.locate(addr);
        if self.lines[set].valid && self.lines[set].tag == tag {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
            self.refill(memory, addr);
        }
        self.lines[set].block[offset]
    }

    /// Records a one-byte store that has already been applied to `memory`.
    ///
    /// A hit patches the resident block in place. A miss refills the block
    /// from `memory`, which already contains the new byte. Counts one hit or one miss.
    pub fn write_byte(&mut self, memory: &MemoryImage, addr: u64, val: u8) {
        let (set, tag, offset) = self.locate(addr);
        if self.lines[set].valid && self.lines[set].tag == tag {
            self.stats.hits += 1;
            self.lines[set].block[offset] = val;
        } else {
            self.stats.misses += 1;
            self.refill(memory, addr);
        }
    }

    /// Loads the block containing `addr` into its set, evicting the previous occupant.
    ///
    /// Bytes of the block that fall outside the memory image read as zero.
    fn refill(&mut self, memory: &MemoryImage, addr: u64) {
        let (set, tag, _) = self.locate(addr);
        let base = addr & !((1u64 << self.block_bits) - 1);
        let line = &mut self.lines[set];
        if line.valid {
            tracing::debug!(set, old_tag = line.tag, new_tag = tag, "cache eviction");
        }
        for (i, byte) in line.block.iter_mut().enumerate() {
            *byte = memory.peek(base + i as u64);
        }
        line.tag = tag;
        line.valid = true;
    }

    /// Returns a copy of the hit and miss counters.
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }
}
