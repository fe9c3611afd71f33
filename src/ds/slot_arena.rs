//! Slot arena with stable handles.
//!
//! Entries are stored once, in a `Vec<Option<T>>`, and addressed by a
//! [`SlotId`] that stays valid until the entry is removed. Freed slots are
//! recycled through a free list, so handles are cheap and allocation-free in
//! steady state.
//!
//! [`IndexedHeap`](crate::ds::IndexedHeap) keeps its entries here: the heap
//! sequence and the cache's key map both hold `SlotId`s, so they always refer
//! to the same record.
//!
//! ```text
//!   slots:      [ Some(a) | None | Some(c) | Some(d) ]
//!   free_list:  [ 1 ]
//!   len:        3
//! ```

use std::ops::{Index, IndexMut};

/// Stable handle to an occupied slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    /// Raw slot index. Only meaningful for the arena that issued it.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Vector-backed arena with slot reuse.
#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Option<T>>,
    free_list: Vec<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Stores `value` and returns its handle, reusing a freed slot if any.
    pub fn insert(&mut self, value: T) -> SlotId {
        let idx = match self.free_list.pop() {
            Some(idx) => {
                self.slots[idx] = Some(value);
                idx
            },
            None => {
                self.slots.push(Some(value));
                self.slots.len() - 1
            },
        };
        self.len += 1;
        SlotId(idx)
    }

    /// Takes the value out of `id`'s slot. The handle is stale afterwards.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let value = self.slots.get_mut(id.0)?.take()?;
        self.free_list.push(id.0);
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn reserve(&mut self, additional: usize) {
        let reusable = self.free_list.len();
        self.slots.reserve(additional.saturating_sub(reusable));
    }

    /// Drops every value. All outstanding handles become stale.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.len = 0;
    }
}

impl<T> Index<SlotId> for SlotArena<T> {
    type Output = T;

    /// Panics if `id` is stale, like out-of-bounds `Vec` indexing.
    fn index(&self, id: SlotId) -> &T {
        match self.get(id) {
            Some(value) => value,
            None => panic!("stale SlotId {}", id.0),
        }
    }
}

impl<T> IndexMut<SlotId> for SlotArena<T> {
    fn index_mut(&mut self, id: SlotId) -> &mut T {
        match self.get_mut(id) {
            Some(value) => value,
            None => panic!("stale SlotId {}", id.0),
        }
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
