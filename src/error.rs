//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// Only construction and shutdown can fail. Lookups, inserts and deletes
/// are total and report absent keys through `Option`/`bool` instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Rejected configuration (zero capacity, zero or oversized cleanup interval)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No async runtime available to host the background sweeper
    #[error("Runtime unavailable: {0}")]
    Runtime(String),

    /// The background sweeper task ended abnormally
    #[error("Sweeper failed: {0}")]
    Sweeper(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
