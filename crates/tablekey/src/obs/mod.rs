//! Observability: codec telemetry counters and sink abstractions.
//!
//! Codec logic never touches counter state directly; it emits
//! [`MetricsEvent`]s through [`sink::record`].

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventReport, EventState, IndexCounters, IndexSummary};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink};
