//! Range-sum memoization over a mutable array
//!
//! Cached sums are keyed by their inclusive `[left, right]` span. A write to
//! index `i` drops every cached span containing `i` and nothing else, so
//! unrelated hot ranges keep hitting after the write.

use std::fmt;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::lru::LruCache;
use crate::stats::CacheStats;

/// Inclusive `[left, right]` span used as the cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangeKey {
    left: usize,
    right: usize,
}

impl RangeKey {
    /// Build a key, rejecting `left > right`
    pub fn new(left: usize, right: usize) -> Result<Self> {
        if left > right {
            return Err(Error::InvalidRange { left, right });
        }
        Ok(Self { left, right })
    }

    /// Left (inclusive) bound
    pub fn left(&self) -> usize {
        self.left
    }

    /// Right (inclusive) bound
    pub fn right(&self) -> usize {
        self.right
    }

    /// Number of array slots summarized
    pub fn width(&self) -> usize {
        (self.right - self.left).saturating_add(1)
    }

    /// Whether a write to `index` affects this span
    pub fn contains(&self, index: usize) -> bool {
        self.left <= index && index <= self.right
    }
}

impl fmt::Display for RangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.left, self.right)
    }
}

/// Sum `array[left..=right]` without any caching
pub fn range_sum_uncached(array: &[i64], left: usize, right: usize) -> Result<i64> {
    let key = checked_key(array, left, right)?;
    sum_span(array, key)
}

/// Write `array[index] = value` without any caching
pub fn update_uncached(array: &mut [i64], index: usize, value: i64) -> Result<()> {
    check_index(array, index)?;
    array[index] = value;
    Ok(())
}

/// LRU-backed cache of range sums
///
/// The cache does not own the array. Every call takes the current contents,
/// and callers must route writes through [`RangeQueryCache::update`] so stale
/// sums get dropped.
pub struct RangeQueryCache {
    cache: LruCache<RangeKey, i64>,
    stats: CacheStats,
}

impl RangeQueryCache {
    /// Create a cache holding at most `capacity` range sums
    ///
    /// # Errors
    /// * `Error::ZeroCapacity` - if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self {
            cache: LruCache::new(capacity)?,
            stats: CacheStats::default(),
        })
    }

    /// Sum of `array[left..=right]`, served from cache when possible
    ///
    /// # Errors
    /// * `Error::InvalidRange` - if `left > right`
    /// * `Error::IndexOutOfBounds` - if `right` is past the end of `array`
    /// * `Error::Overflow` - if the sum does not fit into an i64
    pub fn range_sum(&mut self, array: &[i64], left: usize, right: usize) -> Result<i64> {
        let key = checked_key(array, left, right)?;

        if let Some(&sum) = self.cache.get(&key) {
            self.stats.hits += 1;
            trace!(range = %key, sum, "range cache hit");
            return Ok(sum);
        }

        self.stats.misses += 1;
        let sum = sum_span(array, key)?;
        trace!(range = %key, sum, "range cache miss");

        if let Some((evicted, _)) = self.cache.put(key, sum) {
            self.stats.evictions += 1;
            debug!(range = %evicted, "evicted least recently used range");
        }

        Ok(sum)
    }

    /// Write `array[index] = value` and drop every cached range covering `index`
    ///
    /// Scans all cached keys, so a write costs O(cached entries).
    ///
    /// # Errors
    /// * `Error::IndexOutOfBounds` - if `index` is past the end of `array`
    pub fn update(&mut self, array: &mut [i64], index: usize, value: i64) -> Result<()> {
        check_index(array, index)?;
        array[index] = value;
        self.stats.updates += 1;

        let stale: Vec<RangeKey> = self
            .cache
            .keys()
            .filter(|key| key.contains(index))
            .copied()
            .collect();

        for key in &stale {
            self.cache.delete(key);
        }

        if !stale.is_empty() {
            self.stats.invalidations += stale.len() as u64;
            debug!(index, invalidated = stale.len(), "invalidated cached ranges");
        }

        Ok(())
    }

    /// Whether `[left, right]` is currently cached; does not touch recency
    pub fn is_cached(&self, left: usize, right: usize) -> bool {
        RangeKey::new(left, right).is_ok_and(|key| self.cache.contains(&key))
    }

    /// Cached ranges and their sums, most-recently-used first
    pub fn cached_ranges(&self) -> impl Iterator<Item = (RangeKey, i64)> + '_ {
        self.cache.iter().map(|(key, sum)| (*key, *sum))
    }

    /// Activity counters since creation or the last [`clear`](Self::clear)
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Number of cached ranges
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Maximum number of cached ranges
    pub fn capacity(&self) -> usize {
        self.cache.capacity()
    }

    /// Drop all cached sums and reset the counters
    pub fn clear(&mut self) {
        self.cache.clear();
        self.stats = CacheStats::default();
    }
}

fn checked_key(array: &[i64], left: usize, right: usize) -> Result<RangeKey> {
    let key = RangeKey::new(left, right)?;
    check_index(array, right)?;
    Ok(key)
}

fn check_index(array: &[i64], index: usize) -> Result<()> {
    if index >= array.len() {
        return Err(Error::IndexOutOfBounds {
            index,
            len: array.len(),
        });
    }
    Ok(())
}

fn sum_span(array: &[i64], key: RangeKey) -> Result<i64> {
    array[key.left..=key.right]
        .iter()
        .try_fold(0i64, |acc, &value| acc.checked_add(value))
        .ok_or(Error::Overflow {
            left: key.left,
            right: key.right,
        })
}
