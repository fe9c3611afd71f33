//! heapcache: a capacity-bounded, thread-safe cache that evicts by
//! caller-defined priority.
//!
//! The engine pairs an indexed binary heap ([`ds::IndexedHeap`]) with a
//! key map, so the entry that sorts lowest is always the next victim and any
//! entry can be re-prioritized or removed in O(log n).
//!
//! - [`policy::priority::PriorityCache`]: priorities supplied per entry,
//!   ordered by a [`traits::PriorityOrder`] strategy or closure.
//! - [`policy::item::ItemCache`]: items that carry their own key and
//!   ordering via [`traits::CacheItem`].
//! - [`builder::CacheBuilder`]: one entry point for both.
//!
//! See `DESIGN.md` for internal architecture and invariants.

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;
pub mod traits;

#[cfg(feature = "metrics")]
pub mod metrics;

pub use crate::ds::{IndexedHeap, SlotArena, SlotId};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::PriorityMetricsSnapshot;
pub use crate::policy::item::ItemCache;
pub use crate::policy::priority::{PriorityCache, PriorityCore};
