use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for codec operations.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub indexes: BTreeMap<String, IndexCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    // Extraction
    pub rows_extracted: u64,
    pub rows_rejected: u64,
    pub keys_emitted: u64,
    pub type_mismatches: u64,
    pub limit_rejections: u64,

    // Decode
    pub keys_decoded: u64,
    pub keys_rejected: u64,

    // Successor / range
    pub successors: u64,
    pub successors_exhausted: u64,
    pub ranges_built: u64,
    pub ranges_rejected: u64,
}

///
/// IndexCounters
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct IndexCounters {
    pub rows_extracted: u64,
    pub rows_rejected: u64,
    pub keys_emitted: u64,
    pub keys_decoded: u64,
    pub keys_rejected: u64,
    pub ranges_built: u64,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters (useful in tests).
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

/// Borrow (or create) the per-index counter entry.
pub(crate) fn index_entry<'a>(m: &'a mut EventState, index: &str) -> &'a mut IndexCounters {
    m.indexes.entry(index.to_string()).or_default()
}

///
/// EventReport
/// Counter report for endpoint/test plumbing.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    pub counters: Option<EventState>,
    pub index_counters: Vec<IndexSummary>,
}

///
/// IndexSummary
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct IndexSummary {
    pub index: String,
    pub rows_extracted: u64,
    pub rows_rejected: u64,
    pub keys_emitted: u64,
    pub avg_keys_per_row: f64,
    pub keys_decoded: u64,
    pub keys_rejected: u64,
    pub ranges_built: u64,
}

/// Build a metrics report from in-memory counters.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub(crate) fn report() -> EventReport {
    let snap = with_state(Clone::clone);

    let mut index_counters: Vec<IndexSummary> = snap
        .indexes
        .iter()
        .map(|(index, c)| {
            let avg_keys = if c.rows_extracted > 0 {
                c.keys_emitted as f64 / c.rows_extracted as f64
            } else {
                0.0
            };

            IndexSummary {
                index: index.clone(),
                rows_extracted: c.rows_extracted,
                rows_rejected: c.rows_rejected,
                keys_emitted: c.keys_emitted,
                avg_keys_per_row: avg_keys,
                keys_decoded: c.keys_decoded,
                keys_rejected: c.keys_rejected,
                ranges_built: c.ranges_built,
            }
        })
        .collect();

    // Heaviest fan-out first, then name.
    index_counters.sort_by(|a, b| {
        b.keys_emitted
            .cmp(&a.keys_emitted)
            .then_with(|| a.index.cmp(&b.index))
    });

    EventReport {
        counters: Some(snap),
        index_counters,
    }
}

///
/// TESTS
///

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn reset_all_clears_state() {
        with_state_mut(|m| {
            m.ops.rows_extracted = 3;
            m.ops.keys_emitted = 7;
            index_entry(m, "alpha").rows_extracted = 1;
        });

        reset_all();

        with_state(|m| {
            assert_eq!(m.ops.rows_extracted, 0);
            assert_eq!(m.ops.keys_emitted, 0);
            assert!(m.indexes.is_empty());
        });
    }

    #[test]
    fn report_orders_indexes_by_keys_emitted() {
        reset_all();
        with_state_mut(|m| {
            let alpha = index_entry(m, "alpha");
            alpha.rows_extracted = 2;
            alpha.keys_emitted = 6;

            let beta = index_entry(m, "beta");
            beta.rows_extracted = 1;
            beta.keys_emitted = 9;

            let gamma = index_entry(m, "gamma");
            gamma.rows_extracted = 3;
            gamma.keys_emitted = 6;
        });

        let report = report();
        let names: Vec<_> = report
            .index_counters
            .iter()
            .map(|s| s.index.as_str())
            .collect();

        assert_eq!(names, ["beta", "alpha", "gamma"]);
        assert_eq!(report.index_counters[0].avg_keys_per_row, 9.0);
        assert_eq!(report.index_counters[1].avg_keys_per_row, 3.0);
        assert_eq!(report.index_counters[2].avg_keys_per_row, 2.0);
    }
}
