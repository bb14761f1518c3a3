//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod entry;
mod handle;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use handle::Cache;
pub use lru::{Iter, LruList, Node, NodeId};
pub use stats::CacheStats;
pub use store::CacheStore;
