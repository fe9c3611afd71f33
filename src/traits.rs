//! # Ordering Strategies
//!
//! The cache never decides what "important" means. It holds an ordering
//! strategy and asks it, for two priorities, whether the first must be evicted
//! before the second. Entries that sort lowest are evicted first.
//!
//! ## Architecture
//!
//! ```text
//!                     ┌─────────────────────────────────────┐
//!                     │          PriorityOrder<P>           │
//!                     │                                     │
//!                     │  less(&self, &P, &P) → bool         │
//!                     │  equivalent(&self, &P, &P) → bool   │
//!                     └──────────────────┬──────────────────┘
//!                                        │
//!        ┌───────────────────┬───────────┴───────┬─────────────────────────┐
//!        │                   │                   │                         │
//!        ▼                   ▼                   ▼                         ▼
//!  ┌───────────┐      ┌────────────┐     ┌──────────────────┐    ┌──────────────────┐
//!  │ Ascending │      │ Descending │     │ Fn(&P, &P)→bool  │    │    ItemOrder     │
//!  │  (P: Ord) │      │  (P: Ord)  │     │ (function style) │    │ (T: CacheItem)   │
//!  └───────────┘      └────────────┘     └──────────────────┘    └──────────────────┘
//! ```
//!
//! ## Two Configuration Styles
//!
//! | Style              | Ordering lives in        | Cache type                 |
//! |--------------------|--------------------------|----------------------------|
//! | Function-supplied  | closure / strategy value | `PriorityCache<K, V, P, O>`|
//! | Self-describing    | the item type itself     | `ItemCache<T>`             |
//!
//! ## Contract
//!
//! `less` must be a strict weak ordering. It must not block and must never
//! call back into the cache that holds it: it runs while the cache's
//! exclusive lock is held.
//!
//! ## Example Usage
//!
//! ```
//! use heapcache::traits::{order_by, Ascending, Descending, PriorityOrder};
//!
//! assert!(Ascending.less(&1, &2));
//! assert!(Descending.less(&2, &1));
//!
//! // Evict the longest string first.
//! let longest_first = order_by(|a: &String, b: &String| a.len() > b.len());
//! assert!(longest_first.less(&"long".to_string(), &"s".to_string()));
//! assert!(longest_first.equivalent(&"ab".to_string(), &"cd".to_string()));
//! ```

use std::hash::Hash;
use std::sync::Arc;

/// Strict-less ordering over priorities.
///
/// `less(a, b)` returns `true` when `a` must be evicted before `b`.
pub trait PriorityOrder<P: ?Sized> {
    /// Returns `true` if `a` sorts strictly before `b`.
    fn less(&self, a: &P, b: &P) -> bool;

    /// Returns `true` if neither priority sorts before the other.
    #[inline]
    fn equivalent(&self, a: &P, b: &P) -> bool {
        !self.less(a, b) && !self.less(b, a)
    }
}

impl<P, F> PriorityOrder<P> for F
where
    P: ?Sized,
    F: Fn(&P, &P) -> bool,
{
    #[inline]
    fn less(&self, a: &P, b: &P) -> bool {
        self(a, b)
    }
}

/// Pins a closure to the `Fn(&P, &P) -> bool` shape so its parameter types
/// and lifetimes are inferred correctly when used as a [`PriorityOrder`].
#[inline]
pub fn order_by<P: ?Sized, F>(f: F) -> F
where
    F: Fn(&P, &P) -> bool,
{
    f
}

/// Natural order: the smallest priority is evicted first.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Ascending;

impl<P: Ord + ?Sized> PriorityOrder<P> for Ascending {
    #[inline]
    fn less(&self, a: &P, b: &P) -> bool {
        a < b
    }
}

/// Reverse natural order: the largest priority is evicted first.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Descending;

impl<P: Ord + ?Sized> PriorityOrder<P> for Descending {
    #[inline]
    fn less(&self, a: &P, b: &P) -> bool {
        a > b
    }
}

/// A value that knows its own cache key and how it ranks against its peers.
///
/// # Example
///
/// ```
/// use heapcache::traits::CacheItem;
///
/// struct Quote {
///     symbol: String,
///     timestamp: u64,
/// }
///
/// impl CacheItem for Quote {
///     type Key = String;
///
///     fn key(&self) -> String {
///         self.symbol.clone()
///     }
///
///     // Oldest quotes are evicted first.
///     fn less(&self, other: &Self) -> bool {
///         self.timestamp < other.timestamp
///     }
/// }
/// ```
pub trait CacheItem {
    /// Stable identity of the item.
    type Key: Eq + Hash + Clone;

    /// Returns the key this item is stored under.
    fn key(&self) -> Self::Key;

    /// Returns `true` if `self` must be evicted before `other`.
    fn less(&self, other: &Self) -> bool;
}

/// Ordering strategy that defers to [`CacheItem::less`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ItemOrder;

impl<T: CacheItem> PriorityOrder<T> for ItemOrder {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        CacheItem::less(a, b)
    }
}

impl<T: CacheItem> PriorityOrder<Arc<T>> for ItemOrder {
    #[inline]
    fn less(&self, a: &Arc<T>, b: &Arc<T>) -> bool {
        CacheItem::less(a.as_ref(), b.as_ref())
    }
}
