//! Cache Store Module
//!
//! Main cache engine combining a HashMap index with the LRU ordering and TTL
//! expiration. The store itself is not synchronized; [`crate::cache::Cache`]
//! puts it behind a single lock.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::cache::lru::{LruList, NodeId};
use crate::cache::{CacheEntry, CacheStats};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Bounded key-value storage with LRU eviction and TTL support.
///
/// The index maps each key to its node in the recency list, so both
/// structures always hold the same set of keys.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key to node handle
    index: HashMap<K, NodeId>,
    /// Recency ordering, front = most recently used
    order: LruList<K, V>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl<K, V> CacheStore<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore holding at most `capacity` entries.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidConfig` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "capacity must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            index: HashMap::with_capacity(capacity),
            order: LruList::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
        })
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL.
    ///
    /// If the key already exists, the value and expiration are replaced and
    /// the entry becomes most recently used. If the insert pushes the store
    /// over capacity, the least recently used entry is evicted.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL; None or zero means the entry never expires
    ///
    /// # Returns
    /// The key of the evicted entry, if an eviction happened.
    pub fn set(&mut self, key: K, value: V, ttl: Option<Duration>) -> Option<K> {
        let entry = CacheEntry::new(value, ttl);

        if let Some(&id) = self.index.get(&key) {
            // Overwrite in place so the key keeps a single node
            if let Some(node) = self.order.get_mut(id) {
                node.entry = entry;
            }
            self.order.move_to_front(id);
            return None;
        }

        let id = self.order.push_front(key.clone(), entry);
        self.index.insert(key, id);

        let evicted = if self.index.len() > self.capacity {
            self.evict_oldest()
        } else {
            None
        };

        self.stats.set_total_entries(self.index.len());
        evicted
    }

    // == Get ==
    /// Retrieves a copy of the value stored under `key`.
    ///
    /// A hit promotes the entry to most recently used. An expired entry is
    /// removed and reported as a miss.
    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let Some(&id) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        let expired = self
            .order
            .get(id)
            .map_or(true, |node| node.entry.is_expired());

        if expired {
            self.index.remove(key);
            self.order.remove(id);
            self.stats.record_miss();
            self.stats.record_expirations(1);
            self.stats.set_total_entries(self.index.len());
            return None;
        }

        self.order.move_to_front(id);
        self.stats.record_hit();
        self.order.get(id).map(|node| node.entry.value.clone())
    }

    // == Peek ==
    /// Returns a copy of a live value without touching recency or stats.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let id = self.index.get(key)?;
        self.order
            .get(*id)
            .filter(|node| !node.entry.is_expired())
            .map(|node| node.entry.value.clone())
    }

    /// Returns true if `key` is stored and not yet expired. Does not promote.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index
            .get(key)
            .and_then(|id| self.order.get(*id))
            .is_some_and(|node| !node.entry.is_expired())
    }

    // == Delete ==
    /// Removes an entry by key.
    ///
    /// Returns true if an entry was removed; deleting an absent key is a
    /// no-op.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.index.remove(key) {
            Some(id) => {
                self.order.remove(id);
                self.stats.set_total_entries(self.index.len());
                true
            }
            None => false,
        }
    }

    // == Evict Oldest ==
    /// Drops the least recently used entry and returns its key.
    fn evict_oldest(&mut self) -> Option<K> {
        let (key, _) = self.order.pop_back()?;
        self.index.remove(&key);
        self.stats.record_eviction();
        debug!("LRU eviction: capacity {} exceeded", self.capacity);
        Some(key)
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Every entry is judged against the same instant, taken once at the
    /// start of the pass. Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.index.len();
        let order = &mut self.order;

        self.index.retain(|_, id| {
            let expired = order
                .get(*id)
                .map_or(true, |node| node.entry.is_expired_at(now));
            if expired {
                order.remove(*id);
            }
            !expired
        });

        let removed = before - self.index.len();
        self.stats.record_expirations(removed);
        self.stats.set_total_entries(self.index.len());
        removed
    }

    // == Clear ==
    /// Removes every entry. Statistics counters are kept.
    pub fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
        self.stats.set_total_entries(0);
    }

    // == Keys ==
    /// Returns the stored keys from most to least recently used.
    pub fn keys(&self) -> Vec<K> {
        self.order.iter().map(|(key, _)| key.clone()).collect()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.index.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries, including expired ones not
    /// yet swept.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Checks that the index and the recency list describe the same entries.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        self.index.len() == self.order.len()
            && self.index.iter().all(|(key, id)| {
                self.order.get(*id).is_some_and(|node| node.key == *key)
            })
            && self.order.iter().count() == self.order.len()
    }
}
