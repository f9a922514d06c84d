//! LRU (Least Recently Used) cache implementation
//!
//! A hash index maps keys to [`Handle`]s into the [`RecencyList`], which owns
//! the entries. Both structures are updated together by every public method.

use std::collections::HashMap;
use std::hash::Hash;
use ahash::RandomState;

use crate::error::{Error, Result};
use crate::list::{Entry, Handle, RecencyList};

/// LRU cache with fixed capacity
pub struct LruCache<K, V> {
    map: HashMap<K, Handle, RandomState>,
    list: RecencyList<K, V>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new LRU cache with the given capacity
    ///
    /// # Errors
    /// * `Error::ZeroCapacity` - if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::ZeroCapacity);
        }

        Ok(Self {
            map: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            list: RecencyList::with_capacity(capacity),
            capacity,
        })
    }

    /// Check whether a key is cached without touching its recency
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Get a value from the cache, marking it most-recently-used
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let handle = *self.map.get(key)?;
        self.list.move_to_front(handle);
        self.list.get(handle).map(|entry| &entry.value)
    }

    /// Get a value without changing the recency order
    pub fn peek(&self, key: &K) -> Option<&V> {
        let handle = *self.map.get(key)?;
        self.list.get(handle).map(|entry| &entry.value)
    }

    /// Insert a key-value pair into the cache
    ///
    /// An existing key gets its value replaced and becomes most-recently-used.
    /// A new key inserted into a full cache evicts the least-recently-used
    /// entry first; that entry is returned.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&handle) = self.map.get(&key) {
            if let Some(entry) = self.list.get_mut(handle) {
                entry.value = value;
            }
            self.list.move_to_front(handle);
            return None;
        }

        let evicted = if self.map.len() >= self.capacity {
            self.evict()
        } else {
            None
        };

        let handle = self.list.push_front(key.clone(), value);
        self.map.insert(key, handle);

        evicted
    }

    /// Remove a key from the cache
    ///
    /// Removing an absent key leaves the cache untouched.
    pub fn delete(&mut self, key: &K) -> Option<V> {
        let handle = self.map.remove(key)?;
        self.list.remove(handle).map(|entry| entry.value)
    }

    /// Iterate over the cached keys in no particular order
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.map.keys()
    }

    /// Iterate entries from most- to least-recently-used
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.list.iter().map(|entry| (&entry.key, &entry.value))
    }

    /// Get the current size of the cache
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Clear the cache
    pub fn clear(&mut self) {
        self.map.clear();
        self.list.clear();
    }

    fn evict(&mut self) -> Option<(K, V)> {
        let Entry { key, value } = self.list.remove_tail()?;
        self.map.remove(&key);
        Some((key, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order<V>(cache: &LruCache<&'static str, V>) -> Vec<&'static str> {
        cache.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_lru_zero_capacity() {
        assert_eq!(
            LruCache::<u32, u32>::new(0).err(),
            Some(Error::ZeroCapacity)
        );
    }

    #[test]
    fn test_lru_basic() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");

        assert_eq!(cache.get(&1), Some(&"a"));
        assert_eq!(cache.get(&2), Some(&"b"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_lru_miss_is_none() {
        let mut cache = LruCache::new(2).unwrap();

        // Negative values are ordinary hits
        cache.put(1, -1i64);

        assert_eq!(cache.get(&1), Some(&-1));
        assert_eq!(cache.get(&2), None);
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        let evicted = cache.put(3, "c");

        assert_eq!(evicted, Some((1, "a")));
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some(&"b"));
        assert_eq!(cache.get(&3), Some(&"c"));
    }

    #[test]
    fn test_lru_get_refreshes_recency() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put("A", 1);
        cache.put("B", 2);
        cache.get(&"A");
        cache.put("C", 3);

        assert!(cache.contains(&"A"));
        assert!(!cache.contains(&"B"));
        assert!(cache.contains(&"C"));
        assert_eq!(order(&cache), vec!["C", "A"]);
    }

    #[test]
    fn test_lru_put_existing_refreshes_recency() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put("A", 1);
        cache.put("B", 2);
        assert_eq!(cache.put("A", 10), None);
        cache.put("C", 3);

        assert_eq!(cache.peek(&"A"), Some(&10));
        assert!(!cache.contains(&"B"));
    }

    #[test]
    fn test_lru_contains_and_peek_keep_order() {
        let mut cache = LruCache::new(3).unwrap();

        cache.put("A", 1);
        cache.put("B", 2);
        cache.put("C", 3);

        assert!(cache.contains(&"A"));
        assert_eq!(cache.peek(&"A"), Some(&1));
        assert_eq!(order(&cache), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_lru_delete() {
        let mut cache = LruCache::new(3).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(3, "c");

        assert_eq!(cache.delete(&2), Some("b"));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&2), None);
    }

    #[test]
    fn test_lru_delete_absent_is_noop() {
        let mut cache = LruCache::new(3).unwrap();

        cache.put("A", 1);
        cache.put("B", 2);

        assert_eq!(cache.delete(&"Z"), None);
        assert_eq!(cache.len(), 2);
        assert_eq!(order(&cache), vec!["B", "A"]);
    }

    #[test]
    fn test_lru_delete_then_refill() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        cache.delete(&1);

        // Room freed by delete, nothing evicted
        assert_eq!(cache.put(3, "c"), None);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.put(4, "d"), Some((2, "b")));
    }

    #[test]
    fn test_lru_clear() {
        let mut cache = LruCache::new(3).unwrap();

        cache.put(1, "a");
        cache.put(2, "b");
        cache.clear();

        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.keys().count(), 0);
    }

    #[test]
    fn test_lru_overwrite() {
        let mut cache = LruCache::new(2).unwrap();

        cache.put(1, "a");
        cache.put(1, "b");

        assert_eq!(cache.get(&1), Some(&"b"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_lru_capacity_one() {
        let mut cache = LruCache::new(1).unwrap();

        cache.put(1, "a");
        assert_eq!(cache.put(2, "b"), Some((1, "a")));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.get(&2), Some(&"b"));
    }
}
