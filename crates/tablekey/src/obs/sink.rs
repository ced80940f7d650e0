//! Metrics sink boundary.
//!
//! Codec modules MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
use crate::{error::ErrorClass, obs::metrics};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = const { RefCell::new(None) };
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent<'a> {
    RowExtracted { index: &'a str, keys: u64 },
    RowRejected { index: &'a str, class: ErrorClass },
    KeyDecoded { index: &'a str },
    KeyDecodeRejected { index: &'a str },
    SuccessorComputed { index: &'a str, exhausted: bool },
    RangeBuilt { index: &'a str },
    RangeRejected { index: &'a str },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent<'_>);
}

/// GlobalMetricsSink
/// Default thread-local sink that writes into global metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent<'_>) {
        match event {
            MetricsEvent::RowExtracted { index, keys } => {
                metrics::with_state_mut(|m| {
                    m.ops.rows_extracted = m.ops.rows_extracted.saturating_add(1);
                    m.ops.keys_emitted = m.ops.keys_emitted.saturating_add(keys);

                    let entry = metrics::index_entry(m, index);
                    entry.rows_extracted = entry.rows_extracted.saturating_add(1);
                    entry.keys_emitted = entry.keys_emitted.saturating_add(keys);
                });
            }

            MetricsEvent::RowRejected { index, class } => {
                metrics::with_state_mut(|m| {
                    m.ops.rows_rejected = m.ops.rows_rejected.saturating_add(1);
                    match class {
                        ErrorClass::TypeMismatch => {
                            m.ops.type_mismatches = m.ops.type_mismatches.saturating_add(1);
                        }
                        ErrorClass::ResourceLimit => {
                            m.ops.limit_rejections = m.ops.limit_rejections.saturating_add(1);
                        }
                        _ => {}
                    }

                    let entry = metrics::index_entry(m, index);
                    entry.rows_rejected = entry.rows_rejected.saturating_add(1);
                });
            }

            MetricsEvent::KeyDecoded { index } => {
                metrics::with_state_mut(|m| {
                    m.ops.keys_decoded = m.ops.keys_decoded.saturating_add(1);
                    let entry = metrics::index_entry(m, index);
                    entry.keys_decoded = entry.keys_decoded.saturating_add(1);
                });
            }

            MetricsEvent::KeyDecodeRejected { index } => {
                metrics::with_state_mut(|m| {
                    m.ops.keys_rejected = m.ops.keys_rejected.saturating_add(1);
                    let entry = metrics::index_entry(m, index);
                    entry.keys_rejected = entry.keys_rejected.saturating_add(1);
                });
            }

            MetricsEvent::SuccessorComputed { exhausted, .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.successors = m.ops.successors.saturating_add(1);
                    if exhausted {
                        m.ops.successors_exhausted = m.ops.successors_exhausted.saturating_add(1);
                    }
                });
            }

            MetricsEvent::RangeBuilt { index } => {
                metrics::with_state_mut(|m| {
                    m.ops.ranges_built = m.ops.ranges_built.saturating_add(1);
                    let entry = metrics::index_entry(m, index);
                    entry.ranges_built = entry.ranges_built.saturating_add(1);
                });
            }

            MetricsEvent::RangeRejected { .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.ranges_rejected = m.ops.ranges_rejected.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent<'_>) {
    let override_sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match override_sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current thread's metrics state.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state on the current thread.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override on the current thread.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///
