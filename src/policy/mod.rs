//! Priority-ordered cache implementations.
//!
//! | Module       | Ordering source                     | Cache type                  |
//! |--------------|-------------------------------------|-----------------------------|
//! | [`priority`] | `PriorityOrder<P>` strategy/closure | `PriorityCore`, `PriorityCache` |
//! | [`item`]     | the item itself (`CacheItem`)       | `ItemCache<T>`              |

pub mod item;
pub mod priority;
