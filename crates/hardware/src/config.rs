//! Configuration system for the Y86 simulator.
//!
//! This module defines all configuration structures used to parameterize
//! the simulator. It provides:
//! 1. **Defaults:** Baseline machine constants (memory size, cache geometry, entry point).
//! 2. **Structures:** Hierarchical config for general, memory and cache settings.
//! 3. **Loading:** JSON parsing and validation with typed errors.
//!
//! Configuration is supplied as JSON (`--config` on the CLI) or built with `Config::default()`.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::constants::{CACHE_BLOCK_BITS, CACHE_MAX_BITS, CACHE_SET_BITS, MIN_MEM_SIZE};

/// Default configuration constants for the simulator.
///
/// These values define the baseline machine when not explicitly overridden
/// in a JSON configuration file.
mod defaults {
    /// Address of the first instruction executed.
    pub const START_PC: i64 = 0;

    /// Size of the flat memory image (64 KiB).
    pub const MEM_SIZE: usize = crate::common::constants::MEM_SIZE;

    /// Cache block size exponent (8-byte blocks).
    pub const BLOCK_BITS: u32 = super::CACHE_BLOCK_BITS;

    /// Cache set-count exponent (16 sets).
    pub const SET_BITS: u32 = super::CACHE_SET_BITS;
}

/// Errors raised while loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Io {
        /// Path that failed to load.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration text is not valid JSON for [`Config`].
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The memory image would be too small to execute anything.
    #[error("memory size {size} is below the minimum of {min} bytes")]
    MemoryTooSmall {
        /// Requested size.
        size: usize,
        /// Minimum accepted size.
        min: usize,
    },

    /// A cache geometry exponent is out of range.
    #[error("cache {field} = {value} exceeds the maximum of {max}")]
    CacheGeometry {
        /// Offending field name.
        field: &'static str,
        /// Requested exponent.
        value: u32,
        /// Largest accepted exponent.
        max: u32,
    },
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// ```
/// use y86sim_core::config::Config;
///
/// let json = r#"{ "cache": { "enabled": true } }"#;
/// let config = Config::from_json_str(json)?;
/// assert!(config.cache.enabled);
/// assert_eq!(config.memory.size, 0x10000);
/// # Ok::<(), y86sim_core::config::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// General simulation settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Memory image settings.
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Data cache model settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    /// Parses and validates a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Checks cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.memory.size < MIN_MEM_SIZE {
            return Err(ConfigError::MemoryTooSmall {
                size: self.memory.size,
                min: MIN_MEM_SIZE,
            });
        }
        for (field, value) in [
            ("block_bits", self.cache.block_bits),
            ("set_bits", self.cache.set_bits),
        ] {
            if value > CACHE_MAX_BITS {
                return Err(ConfigError::CacheGeometry {
                    field,
                    value,
                    max: CACHE_MAX_BITS,
                });
            }
        }
        Ok(())
    }
}

/// General simulation configuration.
///
/// Contains run-control settings such as tracing, the entry point, and limits.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Emit a `trace`-level event for every retired instruction.
    #[serde(default)]
    pub trace_instructions: bool,
    /// Initial program counter.
    #[serde(default = "GeneralConfig::default_start_pc")]
    pub start_pc: i64,
    /// Initial `%rsp`; `None` leaves the register file zeroed.
    #[serde(default)]
    pub initial_sp: Option<i64>,
    /// Upper bound on executed steps; `None` runs until a terminal status.
    #[serde(default)]
    pub max_steps: Option<u64>,
}

impl GeneralConfig {
    /// Default initial program counter.
    const fn default_start_pc() -> i64 {
        defaults::START_PC
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace_instructions: false,
            start_pc: defaults::START_PC,
            initial_sp: None,
            max_steps: None,
        }
    }
}

/// Memory image configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Image size in bytes.
    #[serde(default = "MemoryConfig::default_size")]
    pub size: usize,
}

impl MemoryConfig {
    /// Default image size.
    const fn default_size() -> usize {
        defaults::MEM_SIZE
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            size: defaults::MEM_SIZE,
        }
    }
}

/// Direct-mapped data cache configuration.
///
/// An address decomposes as
/// `offset = addr & (2^block_bits - 1)`,
/// `set = (addr >> block_bits) & (2^set_bits - 1)`,
/// `tag = addr >> (block_bits + set_bits)`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Route data accesses through the cache model and report its statistics.
    #[serde(default)]
    pub enabled: bool,
    /// Block size exponent.
    #[serde(default = "CacheConfig::default_block_bits")]
    pub block_bits: u32,
    /// Set count exponent.
    #[serde(default = "CacheConfig::default_set_bits")]
    pub set_bits: u32,
}

impl CacheConfig {
    /// Default block size exponent.
    const fn default_block_bits() -> u32 {
        defaults::BLOCK_BITS
    }

    /// Default set count exponent.
    const fn default_set_bits() -> u32 {
        defaults::SET_BITS
    }

    /// Block size in bytes.
    pub const fn block_size(&self) -> usize {
        1 << self.block_bits
    }

    /// Number of sets (and, being direct-mapped, of lines).
    pub const fn num_sets(&self) -> usize {
        1 << self.set_bits
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            block_bits: defaults::BLOCK_BITS,
            set_bits: defaults::SET_BITS,
        }
    }
}
