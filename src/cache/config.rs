//! Cache configuration.

use std::time::Duration;

/// Configuration for a cache instance.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache.
    pub max_capacity: u64,

    /// Time-to-live for cache entries.
    pub ttl: Option<Duration>,

    /// Time-to-idle for cache entries.
    /// Entries are evicted if not accessed within this duration.
    pub tti: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            ttl: Some(Duration::from_secs(300)), // 5 minutes
            tti: None,
        }
    }
}

impl CacheConfig {
    /// Per-user preferences read on every interaction.
    pub fn user_prefs() -> Self {
        Self {
            max_capacity: 10_000,
            ttl: Some(Duration::from_secs(3600)), // 1 hour
            tti: None,
        }
    }

    /// Interactive sessions driven by a human (listing pages).
    /// Few entries, dropped after a period of inactivity.
    pub fn session_data() -> Self {
        Self {
            max_capacity: 256,
            ttl: Some(Duration::from_secs(6 * 3600)), // 6 hours max
            tti: Some(Duration::from_secs(1800)),     // 30 minutes idle
        }
    }
}
