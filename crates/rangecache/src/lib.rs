//! # rangecache
//!
//! LRU memoization layer for range-sum queries over a mutable array.
//!
//! ## Architecture
//! - **RecencyList**: arena-backed doubly-linked list, handles instead of pointers (O(1))
//! - **LruCache**: AHash index from key to list handle (O(1) get/put/delete)
//! - **RangeQueryCache**: `[left, right]` keys, sum on miss, overlap invalidation on write
//! - **SharedRangeCache**: array + cache behind one lock for multi-threaded callers
//!
//! ```
//! use rangecache::RangeQueryCache;
//!
//! let mut array = vec![3, 1, 4, 1, 5, 9, 2, 6];
//! let mut cache = RangeQueryCache::new(16).unwrap();
//!
//! assert_eq!(cache.range_sum(&array, 2, 5).unwrap(), 19);
//! assert!(cache.is_cached(2, 5));
//!
//! cache.update(&mut array, 3, 10).unwrap();
//! assert!(!cache.is_cached(2, 5));
//! assert_eq!(cache.range_sum(&array, 2, 5).unwrap(), 28);
//! ```

#![warn(missing_docs)]

mod error;
mod list;
mod lru;
mod range;
mod shared;
mod stats;

pub use error::{Error, Result};
pub use list::{Entry, Handle, Iter, RecencyList};
pub use lru::LruCache;
pub use range::{range_sum_uncached, update_uncached, RangeKey, RangeQueryCache};
pub use shared::SharedRangeCache;
pub use stats::CacheStats;
