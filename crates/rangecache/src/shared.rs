//! SharedRangeCache: range cache and array behind a single lock

use std::sync::Arc;
use parking_lot::Mutex;

use crate::error::Result;
use crate::range::RangeQueryCache;
use crate::stats::CacheStats;

struct Inner {
    array: Vec<i64>,
    cache: RangeQueryCache,
}

/// Cloneable handle owning an array and its range cache
///
/// The array and the cache share one mutex. An update holds it across the
/// write and the invalidation scan, so no reader can hit a sum computed
/// before the write once the write is visible.
#[derive(Clone)]
pub struct SharedRangeCache {
    inner: Arc<Mutex<Inner>>,
}

impl SharedRangeCache {
    /// Wrap `array` with a range cache of the given capacity
    ///
    /// # Errors
    /// * `Error::ZeroCapacity` - if `capacity` is 0
    pub fn new(array: Vec<i64>, capacity: usize) -> Result<Self> {
        let cache = RangeQueryCache::new(capacity)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(Inner { array, cache })),
        })
    }

    /// Sum of `[left, right]`, see [`RangeQueryCache::range_sum`]
    pub fn range_sum(&self, left: usize, right: usize) -> Result<i64> {
        let mut inner = self.inner.lock();
        let Inner { array, cache } = &mut *inner;
        cache.range_sum(array, left, right)
    }

    /// Write and invalidate, see [`RangeQueryCache::update`]
    pub fn update(&self, index: usize, value: i64) -> Result<()> {
        let mut inner = self.inner.lock();
        let Inner { array, cache } = &mut *inner;
        cache.update(array, index, value)
    }

    /// Read a single array slot
    pub fn value(&self, index: usize) -> Option<i64> {
        self.inner.lock().array.get(index).copied()
    }

    /// Length of the backing array
    pub fn len(&self) -> usize {
        self.inner.lock().array.len()
    }

    /// Check if the backing array is empty
    pub fn is_empty(&self) -> bool {
        self.inner.lock().array.is_empty()
    }

    /// Number of cached ranges
    pub fn cache_len(&self) -> usize {
        self.inner.lock().cache.len()
    }

    /// Snapshot of the cache counters
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().cache.stats()
    }

    /// Copy of the current array contents
    pub fn snapshot(&self) -> Vec<i64> {
        self.inner.lock().array.clone()
    }
}
