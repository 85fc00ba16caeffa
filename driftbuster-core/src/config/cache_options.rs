//! Diff Cache configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CACHE_BYTE_BUDGET, DEFAULT_CACHE_TTL_SECS};

/// Configuration for a `DiffCache` instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheOptions {
    /// Total on-disk byte budget before LRU eviction kicks in.
    pub byte_budget: u64,
    /// Optional time-based eviction horizon, in seconds.
    pub ttl_secs: Option<u64>,
    /// In-memory front cache entry capacity.
    pub memory_capacity: u64,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            byte_budget: DEFAULT_CACHE_BYTE_BUDGET,
            ttl_secs: Some(DEFAULT_CACHE_TTL_SECS),
            memory_capacity: 10_000,
        }
    }
}
