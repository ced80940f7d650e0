//! Module: index::range
//! Responsibility: prefix-equality plus one bounded slot, both as a key
//! predicate and as a byte interval for the storage scan.
//! Boundary: bounds are validated once at construction.

use crate::{
    error::{CodecError, ErrorDetail},
    index::{
        IndexKey, ResolvedIndex,
        key::{conform, ordered::EMPTY_MARKER},
        successor::next_slot_value,
    },
    model::ScalarType,
    obs::sink::{self, MetricsEvent},
    value::Value,
};
use std::{cmp::Ordering, ops::Bound};

///
/// IndexRange
///
/// Keys whose leading slots equal `prefix` and whose next slot lies between
/// `start` and `end`. With both bounds unbounded the range is a pure prefix
/// match. A concrete start with an unbounded end stops before the null-like
/// states.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexRange {
    prefix: Vec<Value>,
    start: Bound<Value>,
    end: Bound<Value>,
}

impl IndexRange {
    pub fn new(
        index: &ResolvedIndex,
        prefix: Vec<Value>,
        start: Bound<Value>,
        end: Bound<Value>,
    ) -> Result<Self, CodecError> {
        let result = Self::validate(index, prefix, start, end);

        let event = match &result {
            Ok(_) => MetricsEvent::RangeBuilt {
                index: index.name(),
            },
            Err(_) => MetricsEvent::RangeRejected {
                index: index.name(),
            },
        };
        sink::record(event);

        result
    }

    /// Pure prefix match.
    pub fn prefix_only(index: &ResolvedIndex, prefix: Vec<Value>) -> Result<Self, CodecError> {
        Self::new(index, prefix, Bound::Unbounded, Bound::Unbounded)
    }

    fn validate(
        index: &ResolvedIndex,
        prefix: Vec<Value>,
        start: Bound<Value>,
        end: Bound<Value>,
    ) -> Result<Self, CodecError> {
        let bounded = !matches!((&start, &end), (Bound::Unbounded, Bound::Unbounded));
        let available = index.field_count();

        if prefix.len() > available || (bounded && prefix.len() == available) {
            return Err(CodecError::invalid_range(format!(
                "range over index '{}' fixes {} slots but the index has {available} fields",
                index.name(),
                prefix.len(),
            )));
        }

        let prefix = prefix
            .into_iter()
            .enumerate()
            .map(|(position, value)| conform_bound(index, position, value))
            .collect::<Result<Vec<_>, _>>()?;

        let ranged = prefix.len();
        let start = map_bound(start, |value| conform_bound(index, ranged, value))?;
        let end = map_bound(end, |value| conform_bound(index, ranged, value))?;

        if let (
            Bound::Included(low) | Bound::Excluded(low),
            Bound::Included(high) | Bound::Excluded(high),
        ) = (&start, &end)
        {
            let inverted = match low.cmp(high) {
                Ordering::Greater => true,
                Ordering::Equal => {
                    matches!(start, Bound::Excluded(_)) || matches!(end, Bound::Excluded(_))
                }
                Ordering::Less => false,
            };

            if inverted {
                return Err(range_error(
                    index,
                    ranged,
                    format!("range start {low} lies above end {high}"),
                ));
            }
        }

        Ok(Self { prefix, start, end })
    }

    #[must_use]
    pub fn prefix(&self) -> &[Value] {
        &self.prefix
    }

    #[must_use]
    pub const fn start(&self) -> &Bound<Value> {
        &self.start
    }

    #[must_use]
    pub const fn end(&self) -> &Bound<Value> {
        &self.end
    }

    const fn is_bounded(&self) -> bool {
        !matches!(
            (&self.start, &self.end),
            (Bound::Unbounded, Bound::Unbounded)
        )
    }

    /// Whether `key` falls inside this range.
    #[must_use]
    pub fn in_range(&self, key: &IndexKey) -> bool {
        let slots = key.slots();
        if slots.len() < self.prefix.len() || slots[..self.prefix.len()] != self.prefix[..] {
            return false;
        }
        if !self.is_bounded() {
            return true;
        }

        let Some(value) = slots.get(self.prefix.len()) else {
            return false;
        };

        let above_start = match &self.start {
            Bound::Included(low) => value >= low,
            Bound::Excluded(low) => value > low,
            Bound::Unbounded => true,
        };
        let below_end = match &self.end {
            Bound::Included(high) => value <= high,
            Bound::Excluded(high) => value < high,
            Bound::Unbounded => !(self.has_concrete_start() && value.is_null_like()),
        };

        above_start && below_end
    }

    fn has_concrete_start(&self) -> bool {
        matches!(&self.start, Bound::Included(v) | Bound::Excluded(v) if !v.is_null_like())
    }

    /// Lower the range to a byte interval over serialized keys of `index`.
    ///
    /// Exclusive starts and inclusive ends step to the successor slot value;
    /// where none exists the byte prefix-successor of the bound is used.
    pub fn scan_bounds(&self, index: &ResolvedIndex) -> Result<ScanBounds, CodecError> {
        let mut prefix = Vec::new();
        index.serialize_into(&mut prefix, &self.prefix)?;

        let start = match &self.start {
            Bound::Included(low) => self.bytes_with(index, low)?,
            Bound::Excluded(low) => match self.bytes_after(index, low)? {
                Some(start) => start,
                None => {
                    // nothing sorts above the bound
                    let start = self.bytes_with(index, low)?;
                    return Ok(ScanBounds {
                        end: Some(start.clone()),
                        start,
                    });
                }
            },
            Bound::Unbounded => prefix.clone(),
        };

        let end = match &self.end {
            Bound::Excluded(high) => Some(self.bytes_with(index, high)?),
            Bound::Included(high) => self.bytes_after(index, high)?,
            Bound::Unbounded if self.has_concrete_start() && index.config().has_slot_header() => {
                let mut end = prefix;
                end.push(EMPTY_MARKER);
                Some(end)
            }
            Bound::Unbounded => prefix_successor(&prefix),
        };

        Ok(ScanBounds { start, end })
    }

    fn bytes_with(&self, index: &ResolvedIndex, value: &Value) -> Result<Vec<u8>, CodecError> {
        let mut slots = self.prefix.clone();
        slots.push(value.clone());

        let mut out = Vec::new();
        index.serialize_into(&mut out, &slots)?;

        Ok(out)
    }

    // Smallest byte string above every key whose ranged slot equals `value`.
    fn bytes_after(
        &self,
        index: &ResolvedIndex,
        value: &Value,
    ) -> Result<Option<Vec<u8>>, CodecError> {
        let position = self.prefix.len();
        let field = index.field(position).ok_or_else(|| {
            CodecError::invalid_range(format!("index '{}' has no slot {position}", index.name()))
        })?;

        let next = if field.slot_type() == ScalarType::Number && !value.is_null_like() {
            None
        } else {
            next_slot_value(value, field, index.config())?
        };

        match next {
            Some(next) => self.bytes_with(index, &next).map(Some),
            None => Ok(prefix_successor(&self.bytes_with(index, value)?)),
        }
    }
}

///
/// ScanBounds
///
/// Byte interval `[start, end)` over serialized keys; `end: None` scans to
/// the end of the index.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScanBounds {
    pub start: Vec<u8>,
    pub end: Option<Vec<u8>>,
}

impl ScanBounds {
    #[must_use]
    pub fn contains(&self, bytes: &[u8]) -> bool {
        bytes >= self.start.as_slice() && self.end.as_deref().is_none_or(|end| bytes < end)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end.as_deref().is_some_and(|end| end <= self.start.as_slice())
    }
}

/// Smallest byte string greater than every string starting with `bytes`,
/// or `None` when no such string exists.
#[must_use]
pub fn prefix_successor(bytes: &[u8]) -> Option<Vec<u8>> {
    let keep = bytes.iter().rposition(|byte| *byte != u8::MAX)?;
    let mut next = bytes[..=keep].to_vec();
    next[keep] += 1;

    Some(next)
}

fn conform_bound(index: &ResolvedIndex, position: usize, value: Value) -> Result<Value, CodecError> {
    let field = index.field(position).ok_or_else(|| {
        CodecError::invalid_range(format!("index '{}' has no slot {position}", index.name()))
    })?;

    conform(value, field, index.config()).map_err(|err| range_error(index, position, err))
}

fn range_error(index: &ResolvedIndex, position: usize, message: impl std::fmt::Display) -> CodecError {
    let path = index
        .field(position)
        .map(|field| field.path().to_string())
        .unwrap_or_default();

    CodecError::invalid_range(format!("invalid range bound for '{path}': {message}"))
        .with_detail(ErrorDetail::Field { path })
}

fn map_bound(
    bound: Bound<Value>,
    f: impl Fn(Value) -> Result<Value, CodecError>,
) -> Result<Bound<Value>, CodecError> {
    Ok(match bound {
        Bound::Included(value) => Bound::Included(f(value)?),
        Bound::Excluded(value) => Bound::Excluded(f(value)?),
        Bound::Unbounded => Bound::Unbounded,
    })
}

///
/// TESTS
///
