//! Cache Handle Module
//!
//! Thread-safe front end over [`CacheStore`] that also owns the background
//! expiration sweeper.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::cache::{CacheStats, CacheStore};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::spawn_cleanup_task;

// == Cache ==
/// Concurrent LRU cache with per-entry TTL.
///
/// Every operation, `get` included, takes one exclusive lock over the whole
/// store, so calls from different threads are applied in some total order.
/// Values are handed out as clones.
///
/// The sweeper is started by the constructor and runs until [`Cache::stop`]
/// is called or the cache is dropped.
pub struct Cache<K, V> {
    /// Thread-safe cache store
    store: Arc<Mutex<CacheStore<K, V>>>,
    /// Cancels the sweeper
    shutdown: CancellationToken,
    /// Sweeper task, taken by `shutdown`
    sweeper: Mutex<Option<JoinHandle<()>>>,
    /// Maximum number of entries, fixed at construction
    capacity: usize,
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    // == Constructor ==
    /// Creates a cache and starts its sweeper on the current tokio runtime.
    ///
    /// # Errors
    /// - `CacheError::InvalidConfig` if `capacity` or `cleanup_interval` is
    ///   zero, or the interval exceeds [`crate::config::MAX_CLEANUP_INTERVAL`]
    /// - `CacheError::Runtime` if called outside a tokio runtime
    pub fn new(capacity: usize, cleanup_interval: Duration) -> Result<Self> {
        Self::from_config(&CacheConfig::new(capacity, cleanup_interval))
    }

    /// Creates a cache from a [`CacheConfig`].
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;

        let runtime = Handle::try_current().map_err(|e| CacheError::Runtime(e.to_string()))?;
        let store = Arc::new(Mutex::new(CacheStore::new(config.capacity)?));
        let shutdown = CancellationToken::new();

        let sweeper = spawn_cleanup_task(
            store.clone(),
            config.cleanup_interval,
            shutdown.clone(),
            &runtime,
        );

        Ok(Self {
            store,
            shutdown,
            sweeper: Mutex::new(Some(sweeper)),
            capacity: config.capacity,
        })
    }

    // == Set ==
    /// Inserts or replaces `key`, evicting the least recently used entry if
    /// the cache grows past capacity.
    ///
    /// `ttl` of None or zero means the entry never expires.
    pub fn set(&self, key: K, value: V, ttl: Option<Duration>) {
        self.store.lock().set(key, value, ttl);
    }

    // == Get ==
    /// Returns a copy of the live value for `key` and marks it most recently
    /// used. Expired entries are removed and reported as absent.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lock().get(key)
    }

    /// Like [`Cache::get`] but leaves recency untouched.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lock().peek(key)
    }

    /// Returns true if `key` holds a live value. Does not promote.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lock().contains_key(key)
    }

    // == Delete ==
    /// Removes `key` if present. Returns whether anything was removed.
    pub fn delete<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lock().delete(key)
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.store.lock().clear();
    }

    /// Runs one expiration sweep now and returns how many entries it removed.
    pub fn cleanup_expired(&self) -> usize {
        self.store.lock().cleanup_expired()
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> Vec<K> {
        self.store.lock().keys()
    }

    /// Snapshot of hit, miss, eviction and expiration counters.
    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }

    /// Number of stored entries, counting expired ones not yet removed.
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    /// Returns true if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }
}

impl<K, V> Cache<K, V> {
    // == Stop ==
    /// Stops the background sweeper. Calling it again is a no-op.
    ///
    /// A sweep already running finishes first. Lookups still drop expired
    /// entries after the sweeper is gone.
    pub fn stop(&self) {
        if !self.shutdown.is_cancelled() {
            self.shutdown.cancel();
            info!("Cache sweeper stop requested");
        }
    }

    /// Maximum number of entries before LRU eviction.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns true once [`Cache::stop`] has been called.
    pub fn is_stopped(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Stops the sweeper and waits for its task to exit.
    ///
    /// # Errors
    /// Returns `CacheError::Sweeper` if the task panicked or was aborted.
    /// Later calls find no task left and return `Ok`.
    pub async fn shutdown(&self) -> Result<()> {
        self.stop();

        let sweeper = self.sweeper.lock().take();
        if let Some(handle) = sweeper {
            if let Err(e) = handle.await {
                error!("Cache sweeper ended abnormally: {}", e);
                return Err(CacheError::Sweeper(e.to_string()));
            }
        }
        Ok(())
    }
}

impl<K, V> Drop for Cache<K, V> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
