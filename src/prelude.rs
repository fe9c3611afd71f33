pub use crate::builder::CacheBuilder;
pub use crate::ds::IndexedHeap;
pub use crate::error::InvariantError;
pub use crate::policy::item::ItemCache;
pub use crate::policy::priority::{PriorityCache, PriorityCore};
pub use crate::traits::{Ascending, CacheItem, Descending, ItemOrder, PriorityOrder, order_by};
