//! # Priority-Ordered Eviction Cache
//!
//! A capacity-bounded cache whose victims are chosen by a caller-supplied
//! priority ordering instead of recency or frequency. The entry whose
//! priority sorts lowest is always the next to go.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────────┐
//!   │                     PriorityCache<K, V, P, O>                            │
//!   │                                                                          │
//!   │   ┌────────────────────────────────────────────────────────────────────┐ │
//!   │   │                Arc<RwLock<PriorityCore<K, V, P, O>>>               │ │
//!   │   └────────────────────────────────────────────────────────────────────┘ │
//!   │                                  │                                       │
//!   │                                  ▼                                       │
//!   │   ┌────────────────────────────────────────────────────────────────────┐ │
//!   │   │                     PriorityCore<K, V, P, O>                       │ │
//!   │   │                                                                    │ │
//!   │   │   ┌──────────────────────────────────────────────────────────────┐ │ │
//!   │   │   │  FxHashMap<K, SlotId>                                        │ │ │
//!   │   │   │    "a" ──────────────┐                                       │ │ │
//!   │   │   │    "b" ─────────┐    │                                       │ │ │
//!   │   │   │    "c" ────┐    │    │                                       │ │ │
//!   │   │   └────────────┼────┼────┼───────────────────────────────────────┘ │ │
//!   │   │                ▼    ▼    ▼                                         │ │
//!   │   │   ┌──────────────────────────────────────────────────────────────┐ │ │
//!   │   │   │  IndexedHeap<Entry, EntryOrder<O>>                           │ │ │
//!   │   │   │                                                              │ │ │
//!   │   │   │              [a: p=1]          ◄── next victim               │ │ │
//!   │   │   │             /        \                                       │ │ │
//!   │   │   │       [b: p=2]      [c: p=3]                                 │ │ │
//!   │   │   │                                                              │ │ │
//!   │   │   │  Entry = { key, value: Arc<V>, priority }                    │ │ │
//!   │   │   └──────────────────────────────────────────────────────────────┘ │ │
//!   │   └────────────────────────────────────────────────────────────────────┘ │
//!   └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The map and the heap refer to an entry through the same [`SlotId`], so a
//! key always resolves to the exact record sitting in the heap. All heap
//! position bookkeeping stays inside [`IndexedHeap`].
//!
//! ## Key Components
//!
//! | Component                    | Description                                   |
//! |------------------------------|-----------------------------------------------|
//! | `PriorityCore<K, V, P, O>`   | Single-threaded core: map + indexed heap      |
//! | `PriorityCache<K, V, P, O>`  | Thread-safe wrapper with `parking_lot::RwLock`|
//! | `Entry<K, V, P>`             | Heap record: key, shared value, priority      |
//! | `EntryOrder<O>`              | Lifts a `PriorityOrder<P>` onto entries       |
//!
//! ## Operations Flow
//!
//! ```text
//!   ADD new key (cache full, capacity = 3)
//!   ═══════════════════════════════════════════════════════════════════════════
//!
//!     heap: a(1) b(2) c(3)
//!
//!     add(d, 4):
//!       1. pop the minimum: a(1) leaves, its key is dropped from the map
//!       2. push d(4) and sift up
//!
//!     heap: b(2) c(3) d(4)
//!
//!   ADD existing key
//!   ═══════════════════════════════════════════════════════════════════════════
//!
//!     add(c, 1):   value and priority are overwritten in place; the heap is
//!                  fixed only if the new priority ranks differently
//!
//!     heap: c(1) b(2) d(4)
//!
//!   ADD_MANY [e(5), f(6)]
//!   ═══════════════════════════════════════════════════════════════════════════
//!
//!     1. existing keys are updated in place (none here)
//!     2. overflow = len + new - capacity = 3 + 2 - 3 = 2 → pop c(1), b(2)
//!     3. append e, f without sifting, then rebuild once in O(n)
//!
//!     heap: d(4) e(5) f(6)
//! ```
//!
//! ## Locking
//!
//! | Operation                                   | Lock      |
//! |---------------------------------------------|-----------|
//! | `get`, `contains*`, `len`, `capacity`, peek | shared    |
//! | `add*`, `remove*`, `evict`, `purge`, resize | exclusive |
//!
//! Eviction only ever runs inside an operation that already holds the
//! exclusive lock. The ordering strategy is called with that lock held: it
//! must not block and must never call back into the cache.
//!
//! ## Example Usage
//!
//! ```
//! use heapcache::policy::priority::PriorityCache;
//!
//! let cache: PriorityCache<&str, String, i64> = PriorityCache::new(2);
//! cache.add("low", "evicted first".to_string(), 1);
//! cache.add("high", "kept".to_string(), 10);
//! cache.add("mid", "kept too".to_string(), 5);
//!
//! assert!(!cache.contains("low"));
//! assert_eq!(cache.len(), 2);
//! assert_eq!(*cache.get("high").unwrap(), "kept");
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::mem;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::ds::indexed_heap::IndexedHeap;
use crate::ds::slot_arena::SlotId;
#[cfg(debug_assertions)]
use crate::error::InvariantError;
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::PriorityMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::PriorityMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CoreMetricsRecorder, MetricsSnapshotProvider, PriorityMetricsReadRecorder,
    PriorityMetricsRecorder,
};
use crate::traits::{Ascending, PriorityOrder};

/// Upper bound on slots reserved up front by [`PriorityCore::preallocated`].
const MAX_PREALLOCATE: usize = 1 << 16;

#[derive(Debug)]
struct Entry<K, V, P> {
    key: K,
    value: Arc<V>,
    priority: P,
}

/// Orders heap entries by their priority alone.
#[derive(Debug, Clone, Copy, Default)]
struct EntryOrder<O>(O);

impl<K, V, P, O> PriorityOrder<Entry<K, V, P>> for EntryOrder<O>
where
    O: PriorityOrder<P>,
{
    #[inline]
    fn less(&self, a: &Entry<K, V, P>, b: &Entry<K, V, P>) -> bool {
        self.0.less(&a.priority, &b.priority)
    }
}

/// Single-threaded priority cache.
///
/// Holds at most `capacity` entries. When a new key arrives at capacity, the
/// entry whose priority sorts lowest under `O` is evicted first. A capacity
/// of zero makes the cache inert: every add is a no-op.
///
/// Use [`PriorityCache`] for shared access across threads.
pub struct PriorityCore<K, V, P, O = Ascending> {
    map: FxHashMap<K, SlotId>,
    heap: IndexedHeap<Entry<K, V, P>, EntryOrder<O>>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: PriorityMetrics,
}

impl<K, V, P> PriorityCore<K, V, P, Ascending>
where
    K: Eq + Hash + Clone,
    P: Ord,
{
    /// Creates an empty cache that evicts the smallest priority first.
    ///
    /// # Example
    ///
    /// ```
    /// use heapcache::policy::priority::PriorityCore;
    /// use std::sync::Arc;
    ///
    /// let mut cache: PriorityCore<u32, &str, u64> = PriorityCore::new(2);
    /// cache.add(1, Arc::new("one"), 10);
    /// cache.add(2, Arc::new("two"), 20);
    /// cache.add(3, Arc::new("three"), 30);
    ///
    /// assert!(!cache.contains(&1));
    /// assert_eq!(cache.len(), 2);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self::with_order(capacity, Ascending)
    }
}

impl<K, V, P, O> PriorityCore<K, V, P, O>
where
    K: Eq + Hash + Clone,
    O: PriorityOrder<P>,
{
    /// Creates an empty cache ordered by `order`.
    ///
    /// `order` may be any [`PriorityOrder`], including a plain
    /// `Fn(&P, &P) -> bool` closure.
    pub fn with_order(capacity: usize, order: O) -> Self {
        Self {
            map: FxHashMap::default(),
            heap: IndexedHeap::new(EntryOrder(order)),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: PriorityMetrics::default(),
        }
    }

    /// Like [`with_order`](Self::with_order), but reserves room for
    /// `capacity` entries (bounded) so the first fill does not reallocate.
    pub fn preallocated(capacity: usize, order: O) -> Self {
        let reserve = capacity.min(MAX_PREALLOCATE);
        let mut map = FxHashMap::default();
        map.reserve(reserve);
        Self {
            map,
            heap: IndexedHeap::with_capacity(reserve, EntryOrder(order)),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: PriorityMetrics::default(),
        }
    }

    /// Inserts or updates `key`.
    ///
    /// An existing key gets its value and priority overwritten in place; the
    /// heap is only re-ordered when the new priority ranks differently from
    /// the old one. A new key arriving at capacity evicts exactly one
    /// lowest-priority entry first.
    pub fn add(&mut self, key: K, value: Arc<V>, priority: P) {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if self.capacity == 0 {
            return;
        }

        if let Some(&id) = self.map.get(&key) {
            self.update_entry(id, value, priority);
            return;
        }

        if self.map.len() >= self.capacity {
            self.evict_lowest(1);
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        let id = self.heap.push(Entry {
            key: key.clone(),
            value,
            priority,
        });
        self.map.insert(key, id);
    }

    /// Inserts or updates a batch of entries and returns how many entries
    /// were evicted to make room.
    ///
    /// Existing keys are updated exactly as [`add`](Self::add) does. New keys
    /// are appended without sifting and the heap is rebuilt once, so a large
    /// batch costs O(n) rather than O(k log n). If a new key appears more
    /// than once in the batch, its last occurrence wins.
    ///
    /// Room is made before inserting by evicting the lowest entries already
    /// present. If the batch alone holds more new keys than the capacity, the
    /// lowest of the new entries are evicted afterwards as well.
    ///
    /// # Example
    ///
    /// ```
    /// use heapcache::policy::priority::PriorityCore;
    /// use std::sync::Arc;
    ///
    /// let mut cache: PriorityCore<char, (), u8> = PriorityCore::new(3);
    /// cache.add('a', Arc::new(()), 1);
    /// cache.add('b', Arc::new(()), 2);
    /// cache.add('c', Arc::new(()), 3);
    ///
    /// let evicted = cache.add_many([('d', Arc::new(()), 4), ('e', Arc::new(()), 5)]);
    /// assert_eq!(evicted, 2);
    /// assert!(cache.contains_all(['c', 'd', 'e'].iter()));
    /// ```
    pub fn add_many<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = (K, Arc<V>, P)>,
    {
        #[cfg(feature = "metrics")]
        self.metrics.record_batch_call();

        if self.capacity == 0 {
            return 0;
        }

        let mut staged: Vec<(K, Arc<V>, P)> = Vec::new();
        let mut staged_index: FxHashMap<K, usize> = FxHashMap::default();
        let mut updated = 0usize;

        for (key, value, priority) in items {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_call();

            if let Some(&id) = self.map.get(&key) {
                self.update_entry(id, value, priority);
                updated += 1;
                continue;
            }
            match staged_index.get(&key) {
                Some(&slot) => staged[slot] = (key, value, priority),
                None => {
                    staged_index.insert(key.clone(), staged.len());
                    staged.push((key, value, priority));
                },
            }
        }
        drop(staged_index);

        let inserted = staged.len();
        let overflow = (self.map.len() + inserted).saturating_sub(self.capacity);
        let mut evicted = self.evict_lowest(overflow.min(self.map.len()));

        if inserted > 0 {
            self.heap.reserve(inserted);
            self.map.reserve(inserted);
            for (key, value, priority) in staged {
                #[cfg(feature = "metrics")]
                self.metrics.record_insert_new();

                let id = self.heap.push_unordered(Entry {
                    key: key.clone(),
                    value,
                    priority,
                });
                self.map.insert(key, id);
            }
            self.heap.rebuild();

            #[cfg(feature = "metrics")]
            self.metrics.record_batch_rebuild();
        }

        if self.map.len() > self.capacity {
            evicted += self.evict_lowest(self.map.len() - self.capacity);
        }

        debug!(
            inserted,
            updated,
            evicted,
            len = self.map.len(),
            capacity = self.capacity,
            "applied batch insert"
        );
        evicted
    }

    /// Returns the value stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let value = self
            .map
            .get(key)
            .and_then(|&id| self.heap.get(id))
            .map(|entry| Arc::clone(&entry.value));

        #[cfg(feature = "metrics")]
        if value.is_some() {
            self.metrics.record_get_hit();
        } else {
            self.metrics.record_get_miss();
        }

        value
    }

    /// Returns the priority currently recorded for `key`.
    pub fn priority_of<Q>(&self, key: &Q) -> Option<&P>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let &id = self.map.get(key)?;
        self.heap.get(id).map(|entry| &entry.priority)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Returns `true` if every key is present. Vacuously `true` for no keys.
    pub fn contains_all<'a, Q, I>(&self, keys: I) -> bool
    where
        I: IntoIterator<Item = &'a Q>,
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'a,
    {
        keys.into_iter().all(|key| self.map.contains_key(key))
    }

    /// Returns `true` if at least one key is present. `false` for no keys.
    pub fn contains_any<'a, Q, I>(&self, keys: I) -> bool
    where
        I: IntoIterator<Item = &'a Q>,
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'a,
    {
        keys.into_iter().any(|key| self.map.contains_key(key))
    }

    /// Removes `key`. Returns `false` if it was not present.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_call();

        let Some(id) = self.map.remove(key) else {
            return false;
        };
        self.heap.remove(id);

        #[cfg(feature = "metrics")]
        self.metrics.record_removed_entry();

        true
    }

    /// Removes every listed key that is present and returns how many were.
    pub fn remove_many<'a, Q, I>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = &'a Q>,
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'a,
    {
        keys.into_iter().filter(|key| self.remove(*key)).count()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the ordering strategy.
    pub fn ordering(&self) -> &O {
        &self.heap.ordering().0
    }

    /// Drops every entry. Capacity and ordering are kept.
    pub fn purge(&mut self) {
        let dropped = self.map.len();
        self.map.clear();
        self.heap.clear();

        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        debug!(dropped, "purged cache");
    }

    /// Evicts up to `count` lowest-priority entries and returns how many were
    /// actually removed. Stops early once the cache is empty.
    pub fn evict(&mut self, count: usize) -> usize {
        #[cfg(feature = "metrics")]
        self.metrics.record_evict_call();

        self.evict_lowest(count)
    }

    /// Sets a new capacity and returns how many entries were evicted.
    ///
    /// Shrinking below the current length evicts the excess, lowest priority
    /// first. Growing never evicts.
    pub fn set_capacity(&mut self, capacity: usize) -> usize {
        let previous = self.capacity;
        self.capacity = capacity;

        #[cfg(feature = "metrics")]
        self.metrics.record_capacity_change();

        let excess = self.map.len().saturating_sub(capacity);
        let evicted = self.evict_lowest(excess);
        debug!(previous, capacity, evicted, "changed cache capacity");
        evicted
    }

    /// Adjusts the capacity by `delta`, saturating at zero and at
    /// `usize::MAX`. Returns how many entries were evicted.
    pub fn change_capacity(&mut self, delta: isize) -> usize {
        let capacity = if delta < 0 {
            self.capacity.saturating_sub(delta.unsigned_abs())
        } else {
            self.capacity.saturating_add(delta.unsigned_abs())
        };
        self.set_capacity(capacity)
    }

    /// Returns the entry that would be evicted next.
    pub fn peek_lowest(&self) -> Option<(&K, &Arc<V>, &P)> {
        self.heap
            .peek()
            .map(|entry| (&entry.key, &entry.value, &entry.priority))
    }

    /// Removes and returns the entry that would be evicted next.
    pub fn pop_lowest(&mut self) -> Option<(K, Arc<V>, P)> {
        let entry = self.heap.pop()?;
        self.map.remove(&entry.key);

        #[cfg(feature = "metrics")]
        self.metrics.record_removed_entry();

        Some((entry.key, entry.value, entry.priority))
    }

    /// Validates map/heap agreement, the heap law and the capacity bound
    /// (debug builds only).
    #[cfg(debug_assertions)]
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.heap.check_invariants()?;
        if self.map.len() != self.heap.len() {
            return Err(InvariantError::new(format!(
                "map holds {} keys but heap holds {}",
                self.map.len(),
                self.heap.len()
            )));
        }
        if self.map.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                self.map.len(),
                self.capacity
            )));
        }
        for (key, &id) in &self.map {
            let entry = self.heap.get(id).ok_or_else(|| {
                InvariantError::new(format!("map refers to stale slot {:?}", id))
            })?;
            if entry.key != *key {
                return Err(InvariantError::new(format!(
                    "slot {:?} holds a different key than the map entry pointing at it",
                    id
                )));
            }
        }
        Ok(())
    }

    fn update_entry(&mut self, id: SlotId, value: Arc<V>, priority: P) {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_update();

        let Some(entry) = self.heap.get_mut(id) else {
            return;
        };
        entry.value = value;
        let previous = mem::replace(&mut entry.priority, priority);

        let reranked = self
            .heap
            .get(id)
            .is_some_and(|entry| !self.heap.ordering().0.equivalent(&previous, &entry.priority));
        if reranked {
            self.heap.fix(id);

            #[cfg(feature = "metrics")]
            self.metrics.record_reprioritize();
        }
    }

    // Caller holds `&mut self`, i.e. the exclusive lock in `PriorityCache`.
    fn evict_lowest(&mut self, count: usize) -> usize {
        let mut evicted = 0;
        while evicted < count {
            let Some(entry) = self.heap.pop() else {
                break;
            };
            self.map.remove(&entry.key);
            evicted += 1;

            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();

            trace!(remaining = self.heap.len(), "evicted lowest-priority entry");
        }
        evicted
    }
}

#[cfg(feature = "metrics")]
impl<K, V, P, O> PriorityCore<K, V, P, O>
where
    K: Eq + Hash + Clone,
    O: PriorityOrder<P>,
{
    pub fn metrics_snapshot(&self) -> PriorityMetricsSnapshot {
        let get_hits = self.metrics.get_hits.get();
        let get_misses = self.metrics.get_misses.get();
        PriorityMetricsSnapshot {
            get_calls: get_hits + get_misses,
            get_hits,
            get_misses,
            insert_calls: self.metrics.insert_calls,
            insert_updates: self.metrics.insert_updates,
            insert_new: self.metrics.insert_new,
            reprioritizations: self.metrics.reprioritizations,
            batch_calls: self.metrics.batch_calls,
            batch_rebuilds: self.metrics.batch_rebuilds,
            remove_calls: self.metrics.remove_calls,
            removed_entries: self.metrics.removed_entries,
            evict_calls: self.metrics.evict_calls,
            evicted_entries: self.metrics.evicted_entries,
            capacity_changes: self.metrics.capacity_changes,
            clears: self.metrics.clears,
            cache_len: self.map.len(),
            capacity: self.capacity,
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V, P, O> MetricsSnapshotProvider<PriorityMetricsSnapshot> for PriorityCore<K, V, P, O>
where
    K: Eq + Hash + Clone,
    O: PriorityOrder<P>,
{
    fn snapshot(&self) -> PriorityMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V, P, O> fmt::Debug for PriorityCore<K, V, P, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityCore")
            .field("len", &self.map.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

/// Thread-safe priority cache.
///
/// Wraps a [`PriorityCore`] in `Arc<RwLock<_>>`. Lookups share the read
/// lock; every mutation, including the evictions it triggers, runs under the
/// write lock. Cloning is cheap and yields a handle to the same cache.
pub struct PriorityCache<K, V, P, O = Ascending> {
    inner: Arc<RwLock<PriorityCore<K, V, P, O>>>,
}

impl<K, V, P, O> Clone for PriorityCache<K, V, P, O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V, P, O> fmt::Debug for PriorityCache<K, V, P, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.read();
        f.debug_struct("PriorityCache")
            .field("len", &cache.map.len())
            .field("capacity", &cache.capacity)
            .finish_non_exhaustive()
    }
}

impl<K, V, P> PriorityCache<K, V, P, Ascending>
where
    K: Eq + Hash + Clone,
    P: Ord,
{
    /// Creates an empty thread-safe cache that evicts the smallest priority
    /// first.
    ///
    /// # Example
    ///
    /// ```
    /// use heapcache::policy::priority::PriorityCache;
    ///
    /// let cache: PriorityCache<u32, String, u64> = PriorityCache::new(100);
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self::from_core(PriorityCore::new(capacity))
    }
}

impl<K, V, P, O> PriorityCache<K, V, P, O>
where
    K: Eq + Hash + Clone,
    O: PriorityOrder<P>,
{
    /// Creates an empty thread-safe cache ordered by `order`.
    ///
    /// # Example
    ///
    /// ```
    /// use heapcache::policy::priority::PriorityCache;
    /// use heapcache::traits::order_by;
    ///
    /// // Evict the most expensive entry first.
    /// let cache = PriorityCache::with_order(2, order_by(|a: &f64, b: &f64| a > b));
    /// cache.add("cheap", (), 0.5);
    /// cache.add("pricey", (), 9.0);
    /// cache.add("mid", (), 3.0);
    ///
    /// assert!(!cache.contains("pricey"));
    /// ```
    pub fn with_order(capacity: usize, order: O) -> Self {
        Self::from_core(PriorityCore::with_order(capacity, order))
    }

    /// Wraps an existing core.
    pub fn from_core(core: PriorityCore<K, V, P, O>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(core)),
        }
    }

    /// Inserts or updates `key`, wrapping `value` in an `Arc`.
    pub fn add(&self, key: K, value: V, priority: P) {
        let value = Arc::new(value);
        self.inner.write().add(key, value, priority);
    }

    /// Inserts or updates `key` with an already shared value.
    ///
    /// # Example
    ///
    /// ```
    /// use heapcache::policy::priority::PriorityCache;
    /// use std::sync::Arc;
    ///
    /// let cache: PriorityCache<u32, String, u8> = PriorityCache::new(4);
    /// let shared = Arc::new("shared".to_string());
    /// cache.add_arc(1, Arc::clone(&shared), 7);
    ///
    /// assert!(Arc::ptr_eq(&shared, &cache.get(&1).unwrap()));
    /// ```
    pub fn add_arc(&self, key: K, value: Arc<V>, priority: P) {
        self.inner.write().add(key, value, priority);
    }

    /// Batched insert; see [`PriorityCore::add_many`]. Returns the number of
    /// evicted entries.
    pub fn add_many<I>(&self, items: I) -> usize
    where
        I: IntoIterator<Item = (K, V, P)>,
    {
        let items: Vec<_> = items
            .into_iter()
            .map(|(key, value, priority)| (key, Arc::new(value), priority))
            .collect();
        self.inner.write().add_many(items)
    }

    /// Batched insert of already shared values.
    pub fn add_many_arc<I>(&self, items: I) -> usize
    where
        I: IntoIterator<Item = (K, Arc<V>, P)>,
    {
        let items: Vec<_> = items.into_iter().collect();
        self.inner.write().add_many(items)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.read().get(key)
    }

    pub fn priority_of<Q>(&self, key: &Q) -> Option<P>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        P: Clone,
    {
        self.inner.read().priority_of(key).cloned()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.read().contains(key)
    }

    /// Returns `true` if every key is present, checked under one read lock.
    pub fn contains_all<'a, Q, I>(&self, keys: I) -> bool
    where
        I: IntoIterator<Item = &'a Q>,
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'a,
    {
        self.inner.read().contains_all(keys)
    }

    /// Returns `true` if any key is present, checked under one read lock.
    pub fn contains_any<'a, Q, I>(&self, keys: I) -> bool
    where
        I: IntoIterator<Item = &'a Q>,
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'a,
    {
        self.inner.read().contains_any(keys)
    }

    pub fn remove<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.write().remove(key)
    }

    pub fn remove_many<'a, Q, I>(&self, keys: I) -> usize
    where
        I: IntoIterator<Item = &'a Q>,
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'a,
    {
        self.inner.write().remove_many(keys)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }

    pub fn purge(&self) {
        self.inner.write().purge();
    }

    pub fn evict(&self, count: usize) -> usize {
        self.inner.write().evict(count)
    }

    pub fn set_capacity(&self, capacity: usize) -> usize {
        self.inner.write().set_capacity(capacity)
    }

    pub fn change_capacity(&self, delta: isize) -> usize {
        self.inner.write().change_capacity(delta)
    }

    /// Returns a copy of the entry that would be evicted next.
    pub fn peek_lowest(&self) -> Option<(K, Arc<V>, P)>
    where
        P: Clone,
    {
        self.inner
            .read()
            .peek_lowest()
            .map(|(key, value, priority)| (key.clone(), Arc::clone(value), priority.clone()))
    }

    pub fn pop_lowest(&self) -> Option<(K, Arc<V>, P)> {
        self.inner.write().pop_lowest()
    }

    /// Runs `f` with shared access to the core, holding the read lock.
    pub fn with_core<R>(&self, f: impl FnOnce(&PriorityCore<K, V, P, O>) -> R) -> R {
        f(&self.inner.read())
    }

    #[cfg(debug_assertions)]
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.read().check_invariants()
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> PriorityMetricsSnapshot {
        self.inner.read().metrics_snapshot()
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Operation {
        Add(u8, u16),
        AddMany(Vec<(u8, u16)>),
        Remove(u8),
        Evict(usize),
        SetCapacity(usize),
        ChangeCapacity(isize),
        Purge,
    }

    fn operation_strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            6 => (0u8..40, 0u16..100).prop_map(|(k, p)| Operation::Add(k, p)),
            2 => prop::collection::vec((0u8..40, 0u16..100), 0..12).prop_map(Operation::AddMany),
            2 => (0u8..40).prop_map(Operation::Remove),
            1 => (0usize..5).prop_map(Operation::Evict),
            1 => (0usize..20).prop_map(Operation::SetCapacity),
            1 => (-5isize..5).prop_map(Operation::ChangeCapacity),
            1 => Just(Operation::Purge),
        ]
    }

    proptest! {
        /// len() never exceeds capacity.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_len_within_capacity(
            capacity in 0usize..20,
            ops in prop::collection::vec((0u32..100, 0u32..100), 0..200)
        ) {
            let mut cache: PriorityCore<u32, u32, u32> = PriorityCore::new(capacity);
            for (key, priority) in ops {
                cache.add(key, Arc::new(priority), priority);
                prop_assert!(cache.len() <= cache.capacity());
            }
        }

        /// Each eviction takes the lowest entry present at that moment; a
        /// sorted-set model replaying the same adds ends with the same keys.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_add_evicts_current_minimum(
            capacity in 1usize..20,
            priorities in prop::collection::hash_set(0u32..1000, 0..60)
        ) {
            let mut cache: PriorityCore<u32, (), u32> = PriorityCore::new(capacity);
            let mut model = std::collections::BTreeSet::new();
            for priority in priorities {
                if model.len() >= capacity {
                    model.pop_first();
                }
                model.insert(priority);
                cache.add(priority, Arc::new(()), priority);
            }

            prop_assert_eq!(cache.len(), model.len());
            for key in model {
                prop_assert!(cache.contains(&key));
            }
        }

        /// A batch of distinct priorities loaded into an empty cache keeps
        /// exactly the highest `capacity` of them.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_batch_keeps_highest_priorities(
            capacity in 1usize..16,
            priorities in prop::collection::hash_set(0u32..500, 0..40)
        ) {
            let priorities: Vec<u32> = priorities.into_iter().collect();
            let mut cache: PriorityCore<u32, (), u32> = PriorityCore::new(capacity);
            let evicted = cache.add_many(priorities.iter().map(|&p| (p, Arc::new(()), p)));

            let mut expected = priorities.clone();
            expected.sort_unstable_by(|a, b| b.cmp(a));
            expected.truncate(capacity);

            prop_assert_eq!(evicted, priorities.len().saturating_sub(capacity));
            #[cfg(debug_assertions)]
            if let Err(err) = cache.check_invariants() {
                return Err(TestCaseError::fail(err.to_string()));
            }
            prop_assert_eq!(cache.len(), expected.len());
            for key in expected {
                prop_assert!(cache.contains(&key));
            }
        }

        /// Arbitrary operation sequences keep map and heap in agreement.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_arbitrary_ops_maintain_invariants(
            capacity in 0usize..16,
            ops in prop::collection::vec(operation_strategy(), 0..150)
        ) {
            let mut cache: PriorityCore<u8, u16, u16> = PriorityCore::new(capacity);

            for op in ops {
                match op {
                    Operation::Add(k, p) => cache.add(k, Arc::new(p), p),
                    Operation::AddMany(items) => {
                        let before = cache.len();
                        let fresh: std::collections::HashSet<u8> = items
                            .iter()
                            .map(|&(k, _)| k)
                            .filter(|k| !cache.contains(k))
                            .collect();
                        let evicted = cache.add_many(items.into_iter().map(|(k, p)| (k, Arc::new(p), p)));
                        if cache.capacity() > 0 {
                            prop_assert_eq!(cache.len(), before + fresh.len() - evicted);
                        }
                    },
                    Operation::Remove(k) => {
                        let present = cache.contains(&k);
                        prop_assert_eq!(cache.remove(&k), present);
                        prop_assert!(!cache.contains(&k));
                    },
                    Operation::Evict(n) => {
                        let before = cache.len();
                        let evicted = cache.evict(n);
                        prop_assert_eq!(evicted, n.min(before));
                    },
                    Operation::SetCapacity(c) => {
                        let before = cache.len();
                        let evicted = cache.set_capacity(c);
                        prop_assert_eq!(evicted, before.saturating_sub(c));
                    },
                    Operation::ChangeCapacity(d) => {
                        cache.change_capacity(d);
                    },
                    Operation::Purge => cache.purge(),
                }
                #[cfg(debug_assertions)]
                if let Err(err) = cache.check_invariants() {
                    return Err(TestCaseError::fail(err.to_string()));
                }
                prop_assert!(cache.len() <= cache.capacity());
            }
        }

        /// The next victim never outranks any other live entry.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_lowest_is_minimum(
            ops in prop::collection::vec((0u8..50, 0u16..1000), 1..100)
        ) {
            let mut cache: PriorityCore<u8, (), u16> = PriorityCore::new(32);
            for (key, priority) in ops {
                cache.add(key, Arc::new(()), priority);
            }
            while let Some((key, _, priority)) = cache.pop_lowest() {
                prop_assert!(!cache.contains(&key));
                if let Some((_, _, next)) = cache.peek_lowest() {
                    prop_assert!(priority <= *next);
                }
            }
        }
    }
}
