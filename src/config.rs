//! Configuration Module
//!
//! Construction parameters for a cache instance.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Default maximum number of live entries.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Default period between expiration sweeps.
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(1);

/// Longest sweep period the timer can schedule (365 days).
pub const MAX_CLEANUP_INTERVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Cache configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries before LRU eviction kicks in
    pub capacity: usize,
    /// Period between automatic expiration sweeps
    pub cleanup_interval: Duration,
}

impl CacheConfig {
    /// Creates a config from explicit values. Nothing is validated until
    /// [`CacheConfig::validate`] runs (the cache constructor calls it).
    pub fn new(capacity: usize, cleanup_interval: Duration) -> Self {
        Self {
            capacity,
            cleanup_interval,
        }
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// Only the demo binary uses this; the library itself never reads the
    /// environment.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_CLEANUP_INTERVAL_MS` - Sweep period in milliseconds (default: 1000)
    pub fn from_env() -> Self {
        Self {
            capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CAPACITY),
            cleanup_interval: env::var("CACHE_CLEANUP_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_CLEANUP_INTERVAL),
        }
    }

    /// Checks that the parameters describe a usable cache.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "capacity must be at least 1".to_string(),
            ));
        }

        if self.cleanup_interval.is_zero() {
            return Err(CacheError::InvalidConfig(
                "cleanup interval must be greater than zero".to_string(),
            ));
        }

        if self.cleanup_interval > MAX_CLEANUP_INTERVAL {
            return Err(CacheError::InvalidConfig(format!(
                "cleanup interval must not exceed {:?}",
                MAX_CLEANUP_INTERVAL
            )));
        }

        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
        }
    }
}
