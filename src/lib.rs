//! LRU TTL Cache - A bounded in-memory key-value cache
//!
//! Provides least-recently-used eviction, per-entry TTL expiration and a
//! background sweeper, safe to share between threads.
//!
//! ```no_run
//! use std::time::Duration;
//! use lru_ttl_cache::Cache;
//!
//! # #[tokio::main]
//! # async fn main() -> lru_ttl_cache::error::Result<()> {
//! let cache = Cache::new(2, Duration::from_secs(1))?;
//! cache.set("a", "apple", Some(Duration::from_secs(3)));
//! assert_eq!(cache.get("a"), Some("apple"));
//! cache.stop();
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheStats, CacheStore};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use tasks::spawn_cleanup_task;
