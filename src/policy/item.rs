//! Priority cache for self-describing items.
//!
//! Items implementing [`CacheItem`] carry their own key and ordering, so the
//! cache needs neither a separate key argument nor a comparator. Each item
//! is stored once behind an `Arc` that serves as both value and priority.
//!
//! ## Example Usage
//!
//! ```
//! use heapcache::policy::item::ItemCache;
//! use heapcache::traits::CacheItem;
//!
//! #[derive(Debug)]
//! struct Session {
//!     id: u64,
//!     last_seen: u64,
//! }
//!
//! impl CacheItem for Session {
//!     type Key = u64;
//!
//!     fn key(&self) -> u64 {
//!         self.id
//!     }
//!
//!     fn less(&self, other: &Self) -> bool {
//!         self.last_seen < other.last_seen
//!     }
//! }
//!
//! let cache = ItemCache::new(2);
//! cache.add(Session { id: 1, last_seen: 100 });
//! cache.add(Session { id: 2, last_seen: 300 });
//! cache.add(Session { id: 3, last_seen: 200 });
//!
//! // Session 1 was seen least recently.
//! assert!(!cache.contains(&1));
//! assert_eq!(cache.get(&3).unwrap().last_seen, 200);
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

#[cfg(debug_assertions)]
use crate::error::InvariantError;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::PriorityMetricsSnapshot;
use crate::policy::priority::{PriorityCache, PriorityCore};
use crate::traits::{CacheItem, ItemOrder};

/// Thread-safe cache of [`CacheItem`]s. Clones share the same cache.
pub struct ItemCache<T: CacheItem> {
    inner: PriorityCache<T::Key, T, Arc<T>, ItemOrder>,
}

impl<T: CacheItem> Clone for ItemCache<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: CacheItem> fmt::Debug for ItemCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (len, capacity) = self.inner.with_core(|core| (core.len(), core.capacity()));
        f.debug_struct("ItemCache")
            .field("len", &len)
            .field("capacity", &capacity)
            .finish_non_exhaustive()
    }
}

impl<T: CacheItem> ItemCache<T> {
    pub fn new(capacity: usize) -> Self {
        Self::from_core(PriorityCore::with_order(capacity, ItemOrder))
    }

    pub(crate) fn from_core(core: PriorityCore<T::Key, T, Arc<T>, ItemOrder>) -> Self {
        Self {
            inner: PriorityCache::from_core(core),
        }
    }

    /// Inserts `item` under its own key, replacing any item with that key.
    pub fn add(&self, item: T) {
        self.add_arc(Arc::new(item));
    }

    pub fn add_arc(&self, item: Arc<T>) {
        self.inner.add_arc(item.key(), Arc::clone(&item), item);
    }

    /// Batched insert; returns the number of evicted items.
    pub fn add_many<I>(&self, items: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        self.inner.add_many_arc(items.into_iter().map(|item| {
            let item = Arc::new(item);
            (item.key(), Arc::clone(&item), item)
        }))
    }

    pub fn get<Q>(&self, key: &Q) -> Option<Arc<T>>
    where
        T::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.get(key)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        T::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.contains(key)
    }

    pub fn contains_all<'a, Q, I>(&self, keys: I) -> bool
    where
        I: IntoIterator<Item = &'a Q>,
        T::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'a,
    {
        self.inner.contains_all(keys)
    }

    pub fn contains_any<'a, Q, I>(&self, keys: I) -> bool
    where
        I: IntoIterator<Item = &'a Q>,
        T::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'a,
    {
        self.inner.contains_any(keys)
    }

    pub fn remove<Q>(&self, key: &Q) -> bool
    where
        T::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.remove(key)
    }

    pub fn remove_many<'a, Q, I>(&self, keys: I) -> usize
    where
        I: IntoIterator<Item = &'a Q>,
        T::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'a,
    {
        self.inner.remove_many(keys)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    pub fn purge(&self) {
        self.inner.purge();
    }

    pub fn evict(&self, count: usize) -> usize {
        self.inner.evict(count)
    }

    pub fn set_capacity(&self, capacity: usize) -> usize {
        self.inner.set_capacity(capacity)
    }

    pub fn change_capacity(&self, delta: isize) -> usize {
        self.inner.change_capacity(delta)
    }

    /// Returns the item that would be evicted next.
    pub fn peek_lowest(&self) -> Option<Arc<T>> {
        self.inner.peek_lowest().map(|(_, item, _)| item)
    }

    pub fn pop_lowest(&self) -> Option<Arc<T>> {
        self.inner.pop_lowest().map(|(_, item, _)| item)
    }

    #[cfg(debug_assertions)]
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.check_invariants()
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> PriorityMetricsSnapshot {
        self.inner.metrics_snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Job {
        name: &'static str,
        cost: u32,
    }

    impl CacheItem for Job {
        type Key = &'static str;

        fn key(&self) -> &'static str {
            self.name
        }

        fn less(&self, other: &Self) -> bool {
            self.cost < other.cost
        }
    }

    fn job(name: &'static str, cost: u32) -> Job {
        Job { name, cost }
    }

    #[test]
    fn item_cache_evicts_cheapest() {
        let cache = ItemCache::new(2);
        cache.add(job("a", 5));
        cache.add(job("b", 1));
        cache.add(job("c", 3));

        assert!(!cache.contains("b"));
        assert!(cache.contains_all(["a", "c"].iter()));
        #[cfg(debug_assertions)]
        cache.check_invariants().unwrap();
    }

    #[test]
    fn re_adding_key_replaces_item_and_rank() {
        let cache = ItemCache::new(3);
        cache.add(job("a", 1));
        cache.add(job("b", 2));
        cache.add(job("a", 10));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a").map(|j| j.cost), Some(10));
        assert_eq!(cache.peek_lowest().map(|j| j.name), Some("b"));
        #[cfg(debug_assertions)]
        cache.check_invariants().unwrap();
    }

    #[test]
    fn add_many_reports_evictions() {
        let cache = ItemCache::new(2);
        cache.add(job("a", 1));
        let evicted = cache.add_many([job("b", 2), job("c", 3)]);

        assert_eq!(evicted, 1);
        assert!(!cache.contains("a"));
        assert_eq!(cache.pop_lowest().map(|j| j.name), Some("b"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn shared_item_is_value_and_priority() {
        let cache = ItemCache::new(1);
        let item = Arc::new(job("solo", 4));
        cache.add_arc(Arc::clone(&item));

        let stored = cache.get("solo").unwrap();
        assert!(Arc::ptr_eq(&item, &stored));
    }

    #[test]
    fn debug_output_reports_len_and_capacity() {
        let cache = ItemCache::new(3);
        cache.add(job("a", 1));
        let dbg = format!("{:?}", cache);
        assert!(dbg.contains("len: 1"));
        assert!(dbg.contains("capacity: 3"));
    }

    #[test]
    fn resize_and_purge() {
        let cache = ItemCache::new(4);
        cache.add_many((1..=4).map(|i| job(["w", "x", "y", "z"][i - 1], i as u32)));
        assert_eq!(cache.set_capacity(2), 2);
        assert!(cache.contains_all(["y", "z"].iter()));
        assert_eq!(cache.change_capacity(-1), 1);
        assert!(cache.contains("z"));
        assert!(cache.remove("z"));
        assert_eq!(cache.remove_many(["z"].iter()), 0);
        assert!(!cache.contains_any(["w", "x", "y", "z"].iter()));

        cache.add(job("n", 1));
        cache.purge();
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.evict(3), 0);
    }
}
