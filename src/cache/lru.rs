//! LRU Ordering Module
//!
//! Recency ordering for cache eviction, stored as a doubly-linked list whose
//! nodes live in a slot arena and link to each other by index.

use crate::cache::CacheEntry;

// == Node Handle ==
/// Stable handle to a node in an [`LruList`].
///
/// A handle stays valid until its node is removed; the slot may then be
/// reused by a later insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

// == Node ==
/// A key and its entry, linked to its neighbours in recency order.
#[derive(Debug)]
pub struct Node<K, V> {
    pub key: K,
    pub entry: CacheEntry<V>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

// == LRU List ==
/// Tracks access order for LRU eviction.
///
/// - Front = Most recently used
/// - Back = Least recently used
///
/// Every operation is O(1): links are slot indices, and removed slots go on
/// a free list for reuse.
#[derive(Debug)]
pub struct LruList<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
}

impl<K, V> Default for LruList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> LruList<K, V> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts a new node at the front (most recent) and returns its handle.
    pub fn push_front(&mut self, key: K, entry: CacheEntry<V>) -> NodeId {
        let node = Node {
            key,
            entry,
            prev: None,
            next: None,
        };

        let id = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                NodeId(slot)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        };

        self.link_front(id);
        self.len += 1;
        id
    }

    // == Move To Front ==
    /// Marks a node as most recently used.
    pub fn move_to_front(&mut self, id: NodeId) {
        if self.head == Some(id) || self.node(id).is_none() {
            return;
        }
        self.unlink(id);
        self.link_front(id);
    }

    // == Remove ==
    /// Unlinks a node from anywhere in the list and hands back its contents.
    ///
    /// Returns None if the handle does not refer to a live node.
    pub fn remove(&mut self, id: NodeId) -> Option<(K, CacheEntry<V>)> {
        self.node(id)?;
        self.unlink(id);

        let node = self.slots[id.0].take()?;
        self.free.push(id.0);
        self.len -= 1;
        Some((node.key, node.entry))
    }

    // == Pop Back ==
    /// Removes and returns the least recently used node.
    ///
    /// Returns None if the list is empty.
    pub fn pop_back(&mut self) -> Option<(K, CacheEntry<V>)> {
        let tail = self.tail?;
        self.remove(tail)
    }

    // == Peek Back ==
    /// Returns the least recently used key without removing it.
    pub fn peek_back(&self) -> Option<&K> {
        self.tail.and_then(|id| self.node(id)).map(|node| &node.key)
    }

    // == Accessors ==
    pub fn get(&self, id: NodeId) -> Option<&Node<K, V>> {
        self.node(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<K, V>> {
        self.node_mut(id)
    }

    /// Returns the number of linked nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates from most to least recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    /// Drops every node and resets the arena.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Link Helpers ==
    fn node(&self, id: NodeId) -> Option<&Node<K, V>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<K, V>> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    fn link_front(&mut self, id: NodeId) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(id) {
            node.prev = None;
            node.next = old_head;
        }

        match old_head {
            Some(head) => {
                if let Some(node) = self.node_mut(head) {
                    node.prev = Some(id);
                }
            }
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    fn unlink(&mut self, id: NodeId) {
        let (prev, next) = match self.node(id) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_id) => {
                if let Some(node) = self.node_mut(prev_id) {
                    node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next_id) => {
                if let Some(node) = self.node_mut(next_id) {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.node_mut(id) {
            node.prev = None;
            node.next = None;
        }
    }
}

// == Iterator ==
/// Front-to-back iterator over `(key, entry)` pairs.
pub struct Iter<'a, K, V> {
    list: &'a LruList<K, V>,
    cursor: Option<NodeId>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a CacheEntry<V>);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.cursor?)?;
        self.cursor = node.next;
        Some((&node.key, &node.entry))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> CacheEntry<()> {
        CacheEntry::new((), None)
    }

    fn keys(list: &LruList<&'static str, ()>) -> Vec<&'static str> {
        list.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_lru_new() {
        let lru: LruList<String, ()> = LruList::new();
        assert!(lru.is_empty());
        assert_eq!(lru.len(), 0);
        assert!(lru.peek_back().is_none());
    }

    #[test]
    fn test_lru_push_front() {
        let mut lru = LruList::new();

        lru.push_front("key1", entry());
        lru.push_front("key2", entry());
        lru.push_front("key3", entry());

        assert_eq!(lru.len(), 3);
        // key1 is oldest (added first)
        assert_eq!(lru.peek_back(), Some(&"key1"));
        assert_eq!(keys(&lru), vec!["key3", "key2", "key1"]);
    }

    #[test]
    fn test_lru_move_to_front() {
        let mut lru = LruList::new();

        let a = lru.push_front("a", entry());
        lru.push_front("b", entry());
        lru.push_front("c", entry());

        // 'a' is oldest
        assert_eq!(lru.peek_back(), Some(&"a"));

        lru.move_to_front(a);

        // Now 'b' should be oldest
        assert_eq!(lru.peek_back(), Some(&"b"));
        assert_eq!(keys(&lru), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_lru_move_head_is_noop() {
        let mut lru = LruList::new();

        lru.push_front("a", entry());
        let b = lru.push_front("b", entry());
        lru.move_to_front(b);

        assert_eq!(keys(&lru), vec!["b", "a"]);
    }

    #[test]
    fn test_lru_pop_back() {
        let mut lru = LruList::new();

        lru.push_front("key1", entry());
        lru.push_front("key2", entry());
        lru.push_front("key3", entry());

        let (evicted, _) = lru.pop_back().unwrap();
        assert_eq!(evicted, "key1");
        assert_eq!(lru.len(), 2);

        let (evicted, _) = lru.pop_back().unwrap();
        assert_eq!(evicted, "key2");
        assert_eq!(lru.len(), 1);
    }

    #[test]
    fn test_lru_pop_back_empty() {
        let mut lru: LruList<&str, ()> = LruList::new();
        assert!(lru.pop_back().is_none());
    }

    #[test]
    fn test_lru_remove_interior() {
        let mut lru = LruList::new();

        lru.push_front("key1", entry());
        let key2 = lru.push_front("key2", entry());
        lru.push_front("key3", entry());

        let (removed, _) = lru.remove(key2).unwrap();

        assert_eq!(removed, "key2");
        assert_eq!(lru.len(), 2);
        assert_eq!(keys(&lru), vec!["key3", "key1"]);
    }

    #[test]
    fn test_lru_remove_head_and_tail() {
        let mut lru = LruList::new();

        let a = lru.push_front("a", entry());
        lru.push_front("b", entry());
        let c = lru.push_front("c", entry());

        lru.remove(c);
        assert_eq!(keys(&lru), vec!["b", "a"]);

        lru.remove(a);
        assert_eq!(keys(&lru), vec!["b"]);
        assert_eq!(lru.peek_back(), Some(&"b"));
    }

    #[test]
    fn test_lru_remove_twice() {
        let mut lru = LruList::new();

        let a = lru.push_front("a", entry());

        assert!(lru.remove(a).is_some());
        // Removing a stale handle should not panic or affect the list
        assert!(lru.remove(a).is_none());
        assert!(lru.is_empty());
    }

    #[test]
    fn test_lru_reuses_freed_slots() {
        let mut lru = LruList::new();

        let a = lru.push_front("a", entry());
        lru.push_front("b", entry());
        lru.remove(a);

        let c = lru.push_front("c", entry());

        assert_eq!(c, a);
        assert_eq!(lru.get(c).map(|n| n.key), Some("c"));
        assert_eq!(keys(&lru), vec!["c", "b"]);
    }

    #[test]
    fn test_lru_order_after_multiple_touches() {
        let mut lru = LruList::new();

        let a = lru.push_front("a", entry());
        let b = lru.push_front("b", entry());
        let c = lru.push_front("c", entry());

        // [c, b, a] -> [a, c, b] -> [c, a, b] -> [b, c, a]
        lru.move_to_front(a);
        lru.move_to_front(c);
        lru.move_to_front(b);

        assert_eq!(lru.pop_back().map(|(k, _)| k), Some("a"));
        assert_eq!(lru.pop_back().map(|(k, _)| k), Some("c"));
        assert_eq!(lru.pop_back().map(|(k, _)| k), Some("b"));
        assert!(lru.is_empty());
    }

    #[test]
    fn test_lru_get_mut_updates_entry() {
        let mut lru = LruList::new();

        let id = lru.push_front("a", CacheEntry::new(1, None));
        if let Some(node) = lru.get_mut(id) {
            node.entry = CacheEntry::new(2, None);
        }

        assert_eq!(lru.get(id).map(|n| n.entry.value), Some(2));
    }

    #[test]
    fn test_lru_clear() {
        let mut lru = LruList::new();

        lru.push_front("a", entry());
        lru.push_front("b", entry());
        lru.clear();

        assert!(lru.is_empty());
        assert!(lru.peek_back().is_none());
        assert_eq!(lru.iter().count(), 0);
    }
}
