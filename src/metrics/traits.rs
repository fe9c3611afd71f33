//! # Metrics Trait Hierarchy
//!
//! Recording, snapshotting and export are separate responsibilities, each a
//! small trait, so the cache logic only ever writes counters.
//!
//! ```text
//!   ┌─────────────────────────────┐      ┌─────────────────────────────┐
//!   │     CoreMetricsRecorder     │      │ PriorityMetricsReadRecorder │
//!   │  insert / evict / clear     │      │  get hit / miss  (&self)    │
//!   └──────────────┬──────────────┘      └─────────────────────────────┘
//!                  │
//!                  ▼
//!   ┌─────────────────────────────┐
//!   │   PriorityMetricsRecorder   │
//!   │  reprioritize / batch /     │
//!   │  remove / resize            │
//!   └─────────────────────────────┘
//!
//!   Consumption (decoupled from recording):
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsExporter<S>           │
//!   │ (bench/test)                 │    │ (production monitoring)      │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```
//!
//! Mutating recorders take `&mut self`: they are only called while the
//! cache's exclusive lock is held. Read recorders take `&self` and must be
//! safe under concurrent readers.

/// Counters shared by every cache operation that mutates state.
pub trait CoreMetricsRecorder {
    fn record_insert_call(&mut self);
    fn record_insert_new(&mut self);
    fn record_insert_update(&mut self);
    fn record_evict_call(&mut self);
    fn record_evicted_entry(&mut self);
    fn record_clear(&mut self);
}

/// Priority-specific counters.
pub trait PriorityMetricsRecorder: CoreMetricsRecorder {
    /// An update changed an entry's rank and the heap was fixed.
    fn record_reprioritize(&mut self);
    fn record_batch_call(&mut self);
    fn record_batch_rebuild(&mut self);
    fn record_remove_call(&mut self);
    fn record_removed_entry(&mut self);
    fn record_capacity_change(&mut self);
}

/// Counters recorded under the shared read lock.
pub trait PriorityMetricsReadRecorder {
    fn record_get_hit(&self);
    fn record_get_miss(&self);
}

/// Snapshot provider for bench/testing.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Export/publish metrics to production monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
