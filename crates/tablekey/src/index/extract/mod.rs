//! Module: index::extract
//! Responsibility: expand one row into the deduplicated set of serialized
//! keys an index stores for it.
//! Does not own: slot encoding (see `key::ordered`).

mod plan;


use crate::{
    error::CodecError,
    index::{IndexEntry, IndexKey, ResolvedIndex},
    model::Row,
    obs::sink::{self, MetricsEvent},
};
use std::collections::{BTreeMap, BTreeSet};

pub(crate) use plan::PlanNode;
use plan::Walk;

impl ResolvedIndex {
    /// Serialized keys for `row`, deduplicated and in byte order.
    ///
    /// Tuples holding a null-like state the index cannot encode are left
    /// out. Fails with a resource-limit error, producing nothing, when the
    /// row fans out into more than `max_keys` tuples.
    pub fn extract(&self, row: &Row) -> Result<BTreeSet<Vec<u8>>, CodecError> {
        Ok(self.extract_keyed(row)?.into_keys().collect())
    }

    /// Structured keys for `row`, in the same order as their bytes.
    pub fn extract_keys(&self, row: &Row) -> Result<Vec<IndexKey>, CodecError> {
        Ok(self.extract_keyed(row)?.into_values().collect())
    }

    /// Stored entries for `row`, each pointing at `primary_key`.
    pub fn extract_entries(
        &self,
        row: &Row,
        primary_key: &[u8],
    ) -> Result<Vec<IndexEntry>, CodecError> {
        self.extract(row)?
            .iter()
            .map(|key| IndexEntry::new(key, primary_key))
            .collect()
    }

    /// Extract every row independently; one failing row does not affect
    /// the others.
    pub fn extract_batch<'r>(
        &self,
        rows: impl IntoIterator<Item = &'r Row>,
    ) -> Vec<Result<BTreeSet<Vec<u8>>, CodecError>> {
        rows.into_iter().map(|row| self.extract(row)).collect()
    }

    fn extract_keyed(&self, row: &Row) -> Result<BTreeMap<Vec<u8>, IndexKey>, CodecError> {
        let result = self.expand(row);

        let event = match &result {
            Ok(keys) => MetricsEvent::RowExtracted {
                index: self.name(),
                keys: u64::try_from(keys.len()).unwrap_or(u64::MAX),
            },
            Err(err) => MetricsEvent::RowRejected {
                index: self.name(),
                class: err.class,
            },
        };
        sink::record(event);

        result
    }

    fn expand(&self, row: &Row) -> Result<BTreeMap<Vec<u8>, IndexKey>, CodecError> {
        let tuples = Walk::new(self).run(&self.plan, row.fields())?;

        let mut keys = BTreeMap::new();
        for mut tuple in tuples {
            tuple.sort_by_key(|(position, _)| *position);
            let slots: Vec<_> = tuple.into_iter().map(|(_, value)| value).collect();

            if !slots.iter().all(|value| self.config().encodes(value)) {
                continue;
            }

            let mut bytes = Vec::new();
            self.serialize_into(&mut bytes, &slots)?;
            keys.entry(bytes)
                .or_insert_with(|| IndexKey::from_conformed(slots));
        }

        Ok(keys)
    }
}
