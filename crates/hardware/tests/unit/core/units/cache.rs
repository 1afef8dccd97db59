//! Data Cache (CacheSim) Unit Tests.
//!
//! Verifies the direct-mapped cache: address decomposition, cold misses, block refill,
//! conflict eviction, write-through updates and per-byte accounting.
//!
//! The CacheSim is constructed directly from CacheConfig, no CPU needed.
//!
//! With the default geometry (8-byte blocks, 16 sets):
//!   offset = addr & 7
//!   set    = (addr >> 3) & 15
//!   tag    = addr >> 7

use proptest::prelude::*;
use y86sim_core::config::CacheConfig;
use y86sim_core::core::units::cache::{CacheSim, CacheStats};
use y86sim_core::memory::MemoryImage;

// ──────────────────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────────────────

fn test_config() -> CacheConfig {
    CacheConfig {
        enabled: true,
        ..CacheConfig::default()
    }
}

/// 256-byte image where every byte holds its own address.
fn counting_memory() -> MemoryImage {
    let bytes: Vec<u8> = (0..=255).collect();
    MemoryImage::from_bytes(256, &bytes)
}

// ══════════════════════════════════════════════════════════
// 1. Geometry
// ══════════════════════════════════════════════════════════

#[test]
fn locate_splits_set_tag_offset() {
    let cache = CacheSim::new(&test_config());
    assert_eq!(cache.block_size(), 8);
    assert_eq!(cache.num_sets(), 16);
    assert_eq!(cache.locate(0x0), (0, 0, 0));
    assert_eq!(cache.locate(0x0F), (1, 0, 7));
    assert_eq!(cache.locate(0x7F), (15, 0, 7));
    assert_eq!(cache.locate(0x80), (0, 1, 0));
    assert_eq!(cache.locate(0x1234), (6, 0x24, 4));
}

#[test]
fn custom_geometry() {
    let cache = CacheSim::new(&CacheConfig {
        enabled: true,
        block_bits: 2,
        set_bits: 1,
    });
    assert_eq!(cache.locate(0b1_0_11), (0, 1, 3));
    assert_eq!(cache.locate(0b1_1_01), (1, 1, 1));
}

// ══════════════════════════════════════════════════════════
// 2. Hits and misses
// ══════════════════════════════════════════════════════════

#[test]
fn cold_miss_then_hits_within_block() {
    let mem = counting_memory();
    let mut cache = CacheSim::new(&test_config());

    assert_eq!(cache.read_byte(&mem, 0x10), 0x10);
    assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 1 });

    for addr in 0x11..0x18 {
        assert_eq!(cache.read_byte(&mem, addr), addr as u8);
    }
    assert_eq!(cache.stats(), CacheStats { hits: 7, misses: 1 });
    assert!(cache.contains(0x17));
    assert!(!cache.contains(0x18));
}

#[test]
fn conflicting_tags_evict_each_other() {
    let mem = counting_memory();
    let mut cache = CacheSim::new(&test_config());

    let _ = cache.read_byte(&mem, 0x00);
    let _ = cache.read_byte(&mem, 0x80);
    assert!(!cache.contains(0x00));
    assert!(cache.contains(0x80));

    assert_eq!(cache.read_byte(&mem, 0x01), 0x01);
    assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 3 });
}

#[test]
fn refill_beyond_the_image_reads_zero() {
    let mem = MemoryImage::from_bytes(12, &[0xEE; 12]);
    let mut cache = CacheSim::new(&test_config());
    assert_eq!(cache.read_byte(&mem, 8), 0xEE);
    // Bytes 12..16 of the block lie outside the 12-byte image.
    assert_eq!(cache.read_byte(&mem, 11), 0xEE);
    assert_eq!(cache.read_byte(&mem, 12), 0x00);
    assert_eq!(cache.stats(), CacheStats { hits: 2, misses: 1 });
}

// ══════════════════════════════════════════════════════════
// 3. Writes
// ══════════════════════════════════════════════════════════

#[test]
fn write_hit_updates_resident_block() {
    let mut mem = counting_memory();
    let mut cache = CacheSim::new(&test_config());
    let _ = cache.read_byte(&mem, 0x20);

    mem.write_byte(0x21, 0xAB).unwrap();
    cache.write_byte(&mem, 0x21, 0xAB);
    assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    assert_eq!(cache.read_byte(&mem, 0x21), 0xAB);
}

#[test]
fn write_miss_allocates_from_updated_memory() {
    let mut mem = counting_memory();
    let mut cache = CacheSim::new(&test_config());

    mem.write_byte(0x42, 0x99).unwrap();
    cache.write_byte(&mem, 0x42, 0x99);
    assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 1 });
    assert!(cache.contains(0x40));
    assert_eq!(cache.read_byte(&mem, 0x42), 0x99);
    assert_eq!(cache.read_byte(&mem, 0x47), 0x47);
}

// ══════════════════════════════════════════════════════════
// 4. Statistics
// ══════════════════════════════════════════════════════════

#[test]
fn hit_rate_is_a_percentage() {
    assert_eq!(CacheStats::default().hit_rate(), 0.0);
    let stats = CacheStats { hits: 3, misses: 1 };
    assert_eq!(stats.total(), 4);
    assert!((stats.hit_rate() - 75.0).abs() < f64::EPSILON);
}

#[test]
fn stats_serialize_with_total_and_rate() {
    let json = serde_json::to_value(CacheStats { hits: 1, misses: 1 }).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "hits": 1, "misses": 1, "total": 2, "rate": 50.0 })
    );
}

proptest! {
    #[test]
    fn every_access_is_counted_once(addrs in proptest::collection::vec(0u64..256, 1..200)) {
        let mem = counting_memory();
        let mut cache = CacheSim::new(&test_config());
        for &addr in &addrs {
            prop_assert_eq!(cache.read_byte(&mem, addr), addr as u8);
        }
        prop_assert_eq!(cache.stats().total(), addrs.len() as u64);
    }

    #[test]
    fn repeated_access_always_hits(addr in 0u64..256) {
        let mem = counting_memory();
        let mut cache = CacheSim::new(&test_config());
        let _ = cache.read_byte(&mem, addr);
        let _ = cache.read_byte(&mem, addr);
        prop_assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }
}
