//! Indexed binary min-heap with in-place priority updates.
//!
//! Unlike `std::collections::BinaryHeap`, every entry knows where it sits in
//! the heap. That makes it possible to re-order an entry after its priority
//! changed ([`fix`](IndexedHeap::fix)) and to remove an arbitrary entry
//! ([`remove`](IndexedHeap::remove)) in O(log n), without the stale-entry
//! bookkeeping a lazy heap needs.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         IndexedHeap<T, O>                               │
//! │                                                                         │
//! │   tree: Vec<SlotId>      (heap order, tree[0] is the minimum)           │
//! │                                                                         │
//! │      pos:   0        1        2        3        4                       │
//! │          ┌──────┬────────┬────────┬────────┬────────┐                   │
//! │          │ id 3 │  id 0  │  id 4  │  id 1  │  id 2  │                   │
//! │          └──┬───┴───┬────┴───┬────┴───┬────┴───┬────┘                   │
//! │             │       │        │        │        │                        │
//! │   nodes: SlotArena<HeapNode<T>>                                         │
//! │          ┌──────────────────┬──────────────────┬──────────────────┐     │
//! │          │ id 0: item, pos 1│ id 1: item, pos 3│ id 2: item, pos 4│ ... │
//! │          └──────────────────┴──────────────────┴──────────────────┘     │
//! │                                                                         │
//! │   Invariant: nodes[tree[p]].position == p for every p                   │
//! │   Heap law:  !less(tree[p], tree[parent(p)]) for every p > 0            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Positions are written in exactly two places: when an entry is appended,
//! and in `swap`. Every other operation is expressed through those two, so
//! the `tree` and the stored positions cannot drift apart.
//!
//! ## Operations
//!
//! | Operation        | Description                                  | Complexity |
//! |------------------|----------------------------------------------|------------|
//! | `push`           | Append and sift up                           | O(log n)   |
//! | `pop`            | Remove the minimum                           | O(log n)   |
//! | `fix` / `fix_at` | Restore order after an in-place change       | O(log n)   |
//! | `remove`         | Remove an arbitrary entry                    | O(log n)   |
//! | `push_unordered` | Append without sifting (bulk load)           | O(1)       |
//! | `rebuild`        | Heapify the whole sequence (Floyd)           | O(n)       |
//! | `peek`           | Borrow the minimum                           | O(1)       |
//!
//! ## Example Usage
//!
//! ```
//! use heapcache::ds::IndexedHeap;
//! use heapcache::traits::Ascending;
//!
//! let mut heap = IndexedHeap::new(Ascending);
//! let a = heap.push(5);
//! heap.push(3);
//! heap.push(8);
//!
//! // Lower the priority of `a` in place, then restore heap order.
//! if let Some(value) = heap.get_mut(a) {
//!     *value = 1;
//! }
//! heap.fix(a);
//!
//! assert_eq!(heap.pop(), Some(1));
//! assert_eq!(heap.pop(), Some(3));
//! assert_eq!(heap.pop(), Some(8));
//! assert_eq!(heap.pop(), None);
//! ```
//!
//! ## Thread Safety
//!
//! `IndexedHeap` is not synchronized. The caches in [`crate::policy`] guard it
//! together with their key map behind a single lock.

use crate::ds::slot_arena::{SlotArena, SlotId};
#[cfg(debug_assertions)]
use crate::error::InvariantError;
use crate::traits::PriorityOrder;

#[derive(Debug)]
struct HeapNode<T> {
    item: T,
    position: usize,
}

/// Binary min-heap whose entries are addressable by [`SlotId`].
///
/// Ordering is delegated to a [`PriorityOrder`] strategy; the entry that
/// sorts lowest is at the root. Ties are resolved purely by the sequence of
/// operations applied, so the same inputs always produce the same pop order.
#[derive(Debug)]
pub struct IndexedHeap<T, O> {
    nodes: SlotArena<HeapNode<T>>,
    tree: Vec<SlotId>,
    order: O,
}

impl<T, O> IndexedHeap<T, O> {
    /// Creates an empty heap ordered by `order`.
    pub fn new(order: O) -> Self {
        Self {
            nodes: SlotArena::new(),
            tree: Vec::new(),
            order,
        }
    }

    /// Creates an empty heap with room for `capacity` entries.
    pub fn with_capacity(capacity: usize, order: O) -> Self {
        Self {
            nodes: SlotArena::with_capacity(capacity),
            tree: Vec::with_capacity(capacity),
            order,
        }
    }

    /// Number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// The ordering strategy this heap was built with.
    #[inline]
    pub fn ordering(&self) -> &O {
        &self.order
    }

    /// Borrows the entry behind `id`, if it is still in the heap.
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.nodes.get(id).map(|node| &node.item)
    }

    /// Mutably borrows the entry behind `id`.
    ///
    /// If the change affects ordering, call [`fix`](Self::fix) afterwards.
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.nodes.get_mut(id).map(|node| &mut node.item)
    }

    /// Current heap position of `id`.
    pub fn position(&self, id: SlotId) -> Option<usize> {
        self.nodes.get(id).map(|node| node.position)
    }

    /// Borrows the minimum entry.
    pub fn peek(&self) -> Option<&T> {
        self.tree.first().map(|&id| &self.nodes[id].item)
    }

    /// Handle of the minimum entry.
    pub fn peek_id(&self) -> Option<SlotId> {
        self.tree.first().copied()
    }

    /// Iterates entries in heap-sequence order (not sorted order).
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.tree.iter().map(|&id| &self.nodes[id].item)
    }

    pub fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
        self.tree.reserve(additional);
    }

    /// Drops every entry. Outstanding handles become stale.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.tree.clear();
    }

    /// Appends an entry at the end of the sequence without restoring order.
    ///
    /// Used for bulk loads; call [`rebuild`](Self::rebuild) before any other
    /// ordered operation.
    pub fn push_unordered(&mut self, item: T) -> SlotId {
        let position = self.tree.len();
        let id = self.nodes.insert(HeapNode { item, position });
        self.tree.push(id);
        id
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.tree.swap(i, j);
        let (a, b) = (self.tree[i], self.tree[j]);
        self.nodes[a].position = i;
        self.nodes[b].position = j;
    }

    /// Detaches the last entry of the sequence.
    fn take_last(&mut self) -> Option<T> {
        let id = self.tree.pop()?;
        self.nodes.remove(id).map(|node| node.item)
    }
}

impl<T, O> IndexedHeap<T, O>
where
    O: PriorityOrder<T>,
{
    /// Inserts an entry and returns its handle.
    pub fn push(&mut self, item: T) -> SlotId {
        let id = self.push_unordered(item);
        self.sift_up(self.tree.len() - 1);
        id
    }

    /// Removes and returns the minimum entry.
    pub fn pop(&mut self) -> Option<T> {
        let last = self.tree.len().checked_sub(1)?;
        self.swap(0, last);
        let item = self.take_last();
        self.sift_down(0);
        item
    }

    /// Restores heap order around `id` after its entry changed in place.
    ///
    /// Returns `false` if `id` is stale.
    pub fn fix(&mut self, id: SlotId) -> bool {
        match self.position(id) {
            Some(position) => {
                self.fix_at(position);
                true
            },
            None => false,
        }
    }

    /// Restores heap order around `position`; out-of-range positions are ignored.
    pub fn fix_at(&mut self, position: usize) {
        if position >= self.tree.len() {
            return;
        }
        if !self.sift_down(position) {
            self.sift_up(position);
        }
    }

    /// Removes the entry behind `id`.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let position = self.position(id)?;
        self.remove_at(position)
    }

    /// Removes the entry at `position`.
    ///
    /// The last entry is moved into the hole, which may need to travel either
    /// up or down.
    pub fn remove_at(&mut self, position: usize) -> Option<T> {
        let last = self.tree.len().checked_sub(1)?;
        if position > last {
            return None;
        }
        if position != last {
            self.swap(position, last);
        }
        let item = self.take_last();
        self.fix_at(position);
        item
    }

    /// Establishes heap order over the whole sequence in linear time.
    pub fn rebuild(&mut self) {
        let len = self.tree.len();
        for position in (0..len / 2).rev() {
            self.sift_down(position);
        }
    }

    #[inline]
    fn less(&self, i: usize, j: usize) -> bool {
        self.order.less(
            &self.nodes[self.tree[i]].item,
            &self.nodes[self.tree[j]].item,
        )
    }

    fn sift_up(&mut self, mut position: usize) {
        while position > 0 {
            let parent = (position - 1) / 2;
            if !self.less(position, parent) {
                break;
            }
            self.swap(position, parent);
            position = parent;
        }
    }

    /// Returns `true` if the entry moved.
    fn sift_down(&mut self, start: usize) -> bool {
        let len = self.tree.len();
        let mut position = start;
        loop {
            let left = 2 * position + 1;
            if left >= len {
                break;
            }
            let mut child = left;
            let right = left + 1;
            if right < len && self.less(right, left) {
                child = right;
            }
            if !self.less(child, position) {
                break;
            }
            self.swap(position, child);
            position = child;
        }
        position > start
    }

    /// Validates position bookkeeping and the heap law (debug builds only).
    #[cfg(debug_assertions)]
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.nodes.len() != self.tree.len() {
            return Err(InvariantError::new(format!(
                "arena holds {} nodes but heap sequence holds {}",
                self.nodes.len(),
                self.tree.len()
            )));
        }
        for (position, &id) in self.tree.iter().enumerate() {
            let node = self.nodes.get(id).ok_or_else(|| {
                InvariantError::new(format!("position {} refers to stale slot {:?}", position, id))
            })?;
            if node.position != position {
                return Err(InvariantError::new(format!(
                    "slot {:?} records position {} but sits at {}",
                    id, node.position, position
                )));
            }
            if position > 0 && self.less(position, (position - 1) / 2) {
                return Err(InvariantError::new(format!(
                    "entry at position {} sorts before its parent",
                    position
                )));
            }
        }
        Ok(())
    }
}

impl<T, O: Default> Default for IndexedHeap<T, O> {
    fn default() -> Self {
        Self::new(O::default())
    }
}
