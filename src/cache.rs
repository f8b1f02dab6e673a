//! Fixed-capacity FIFO cache.
//!
//! Used to memoize security lookups keyed by normalized ticker. Eviction is
//! strictly by insertion order: reads never promote an entry, which keeps the
//! policy simpler (and cheaper) than an LRU. Entries have no TTL.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// A fixed-capacity key/value cache with insertion-order eviction.
///
/// # Example
///
/// ```
/// use wstrade_rs::cache::FifoCache;
///
/// let mut cache = FifoCache::new(2);
/// cache.insert("a", 1);
/// cache.insert("b", 2);
/// cache.insert("c", 3); // evicts "a"
///
/// assert!(cache.get(&"a").is_none());
/// assert_eq!(cache.get(&"b"), Some(&2));
/// assert_eq!(cache.get(&"c"), Some(&3));
/// ```
#[derive(Debug)]
pub struct FifoCache<K, V> {
    capacity: usize,
    entries: HashMap<K, V>,
    order: VecDeque<K>,
}

impl<K, V> FifoCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "FifoCache capacity must be positive");
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    /// Insert a key/value pair, evicting the earliest-inserted entry if the
    /// cache is at capacity.
    ///
    /// Re-inserting an existing key replaces its value without changing the
    /// key's position in the eviction order.
    pub fn insert(&mut self, key: K, value: V) {
        if self.entries.contains_key(&key) {
            self.entries.insert(key, value);
            return;
        }
        if self.entries.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, value);
    }

    /// Look up a key. Does not affect eviction order.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// The maximum number of entries this cache can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
