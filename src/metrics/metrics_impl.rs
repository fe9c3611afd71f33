use crate::metrics::cell::MetricsCell;
use crate::metrics::traits::{
    CoreMetricsRecorder, PriorityMetricsReadRecorder, PriorityMetricsRecorder,
};

/// Counters kept by [`PriorityCore`](crate::policy::priority::PriorityCore).
///
/// Plain fields are only written under the exclusive lock; the `get_*`
/// counters are [`MetricsCell`]s because lookups run under the shared lock.
#[derive(Debug, Default)]
pub struct PriorityMetrics {
    pub get_hits: MetricsCell,
    pub get_misses: MetricsCell,
    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,
    pub reprioritizations: u64,
    pub batch_calls: u64,
    pub batch_rebuilds: u64,
    pub remove_calls: u64,
    pub removed_entries: u64,
    pub evict_calls: u64,
    pub evicted_entries: u64,
    pub capacity_changes: u64,
    pub clears: u64,
}

impl PriorityMetrics {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CoreMetricsRecorder for PriorityMetrics {
    #[inline]
    fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }

    #[inline]
    fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }

    #[inline]
    fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }

    #[inline]
    fn record_evict_call(&mut self) {
        self.evict_calls += 1;
    }

    #[inline]
    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    #[inline]
    fn record_clear(&mut self) {
        self.clears += 1;
    }
}

impl PriorityMetricsRecorder for PriorityMetrics {
    #[inline]
    fn record_reprioritize(&mut self) {
        self.reprioritizations += 1;
    }

    #[inline]
    fn record_batch_call(&mut self) {
        self.batch_calls += 1;
    }

    #[inline]
    fn record_batch_rebuild(&mut self) {
        self.batch_rebuilds += 1;
    }

    #[inline]
    fn record_remove_call(&mut self) {
        self.remove_calls += 1;
    }

    #[inline]
    fn record_removed_entry(&mut self) {
        self.removed_entries += 1;
    }

    #[inline]
    fn record_capacity_change(&mut self) {
        self.capacity_changes += 1;
    }
}

impl PriorityMetricsReadRecorder for PriorityMetrics {
    #[inline]
    fn record_get_hit(&self) {
        self.get_hits.incr();
    }

    #[inline]
    fn record_get_miss(&self) {
        self.get_misses.incr();
    }
}
