//! Single entry point for building priority caches.
//!
//! Collects the construction-time settings (capacity and whether to reserve
//! storage up front) and produces either configuration of the cache.
//!
//! ## Example
//!
//! ```rust
//! use heapcache::builder::CacheBuilder;
//! use heapcache::traits::Descending;
//!
//! // Lowest priority evicted first.
//! let scores = CacheBuilder::new(100).build::<String, Vec<u8>, u64>();
//! scores.add("a".to_string(), vec![1], 10);
//!
//! // Highest priority evicted first.
//! let costs = CacheBuilder::new(100).build_with_order::<u32, String, u32, _>(Descending);
//! costs.add(1, "expensive".to_string(), 900);
//! assert_eq!(costs.len(), 1);
//! ```

use std::hash::Hash;

use tracing::debug;

use crate::policy::item::ItemCache;
use crate::policy::priority::{PriorityCache, PriorityCore};
use crate::traits::{Ascending, CacheItem, ItemOrder, PriorityOrder};

/// Builder for priority caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheBuilder {
    capacity: usize,
    preallocate: bool,
}

impl CacheBuilder {
    /// Create a new cache builder with the specified capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            preallocate: false,
        }
    }

    /// Create a builder from a signed capacity; negative values clamp to 0,
    /// which yields an inert cache.
    ///
    /// ```rust
    /// use heapcache::builder::CacheBuilder;
    ///
    /// let cache = CacheBuilder::with_signed_capacity(-5).build::<u8, u8, u8>();
    /// cache.add(1, 1, 1);
    /// assert_eq!(cache.capacity(), 0);
    /// assert!(cache.is_empty());
    /// ```
    pub fn with_signed_capacity(capacity: i64) -> Self {
        let clamped = usize::try_from(capacity.max(0)).unwrap_or(usize::MAX);
        if capacity < 0 {
            debug!(requested = capacity, "negative capacity clamped to zero");
        }
        Self::new(clamped)
    }

    /// Reserve map and heap storage for the full capacity at build time.
    pub fn preallocate(mut self, preallocate: bool) -> Self {
        self.preallocate = preallocate;
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Build a cache that evicts the smallest priority first.
    pub fn build<K, V, P>(self) -> PriorityCache<K, V, P>
    where
        K: Eq + Hash + Clone,
        P: Ord,
    {
        self.build_with_order(Ascending)
    }

    /// Build a cache ordered by `order`; any `Fn(&P, &P) -> bool` works.
    ///
    /// ```rust
    /// use heapcache::builder::CacheBuilder;
    /// use heapcache::traits::order_by;
    ///
    /// let cache = CacheBuilder::new(1)
    ///     .preallocate(true)
    ///     .build_with_order(order_by(|a: &(u8, u8), b: &(u8, u8)| a.1 < b.1));
    /// cache.add("x", (), (9, 1));
    /// cache.add("y", (), (0, 2));
    /// assert!(cache.contains("y"));
    /// ```
    pub fn build_with_order<K, V, P, O>(self, order: O) -> PriorityCache<K, V, P, O>
    where
        K: Eq + Hash + Clone,
        O: PriorityOrder<P>,
    {
        PriorityCache::from_core(self.core(order))
    }

    /// Build a cache of self-describing items.
    pub fn build_items<T: CacheItem>(self) -> ItemCache<T> {
        ItemCache::from_core(self.core(ItemOrder))
    }

    fn core<K, V, P, O>(self, order: O) -> PriorityCore<K, V, P, O>
    where
        K: Eq + Hash + Clone,
        O: PriorityOrder<P>,
    {
        if self.preallocate {
            PriorityCore::preallocated(self.capacity, order)
        } else {
            PriorityCore::with_order(self.capacity, order)
        }
    }
}
