//! Cache statistics tracking

use std::fmt;

/// Counters for range cache activity
///
/// Plain values: the owning [`RangeQueryCache`](crate::RangeQueryCache) is
/// mutated through `&mut self`, and a copy serves as a snapshot.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Queries answered from the cache
    pub hits: u64,
    /// Queries that had to scan the array
    pub misses: u64,
    /// Entries pushed out by capacity
    pub evictions: u64,
    /// Entries dropped because a write overlapped their range
    pub invalidations: u64,
    /// Writes applied through the cache
    pub updates: u64,
}

impl CacheStats {
    /// Total range queries seen
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Calculate hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits={} misses={} hit_ratio={:.3} evictions={} invalidations={} updates={}",
            self.hits,
            self.misses,
            self.hit_ratio(),
            self.evictions,
            self.invalidations,
            self.updates
        )
    }
}
