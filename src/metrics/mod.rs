//! Operation counters for priority caches (feature `metrics`).

pub mod cell;
pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use exporter::PrometheusTextExporter;
pub use metrics_impl::PriorityMetrics;
pub use snapshot::PriorityMetricsSnapshot;
pub use traits::{MetricsExporter, MetricsSnapshotProvider};
