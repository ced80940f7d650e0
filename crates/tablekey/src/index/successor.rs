//! Module: index::successor
//! Responsibility: the next representable key after a given key.
//! Boundary: used to turn exclusive bounds into inclusive ones.

use crate::{
    error::{CodecError, ErrorOrigin},
    index::{
        IndexKey, ResolvedField, ResolvedIndex,
        key::ordered::{f32_from_ordered_bits, f64_from_ordered_bits, ordered_f32_bits, ordered_f64_bits},
    },
    model::{IndexConfig, ScalarType},
    obs::sink::{self, MetricsEvent},
    types::Timestamp,
    value::Value,
};

// Null-like states in ascending order.
const NULL_STATES: [Value; 3] = [Value::Empty, Value::JsonNull, Value::Null];

impl ResolvedIndex {
    /// Lexicographically next key with the same number of slots as `key`.
    ///
    /// The last slot advances to its next concrete value, then through the
    /// null-like states the index can encode; on exhaustion the preceding
    /// slot advances and every following slot resets to its minimum.
    /// Returns `None` once every slot sits at its maximal state.
    ///
    /// Number slots have no discrete successor, so advancing one fails with
    /// an unsupported error. A following number slot cannot be reset either;
    /// the result is then the prefix key ending at the advanced slot, which
    /// sorts before every key extending it.
    pub fn increment(&self, key: &IndexKey) -> Result<Option<IndexKey>, CodecError> {
        let result = self.next_key(key);

        if let Ok(next) = &result {
            sink::record(MetricsEvent::SuccessorComputed {
                index: self.name(),
                exhausted: next.is_none(),
            });
        }

        result
    }

    fn next_key(&self, key: &IndexKey) -> Result<Option<IndexKey>, CodecError> {
        let mut slots = key.slots().to_vec();
        let config = self.config();

        for position in (0..slots.len()).rev() {
            let field = self.field(position).ok_or_else(|| {
                CodecError::unsupported(
                    ErrorOrigin::Successor,
                    format!("key is wider than index '{}'", self.name()),
                )
            })?;

            let Some(next) = next_slot_value(&slots[position], field, config)? else {
                continue;
            };
            slots[position] = next;

            for reset in position + 1..slots.len() {
                match self.field(reset).and_then(|f| min_slot_value(f, config)) {
                    Some(min) => slots[reset] = min,
                    None => {
                        slots.truncate(reset);
                        break;
                    }
                }
            }

            return Ok(Some(IndexKey::from_conformed(slots)));
        }

        Ok(None)
    }
}

/// Next value of one slot in its total order, or `None` at SQL-NULL (or the
/// last state the configuration can encode).
pub(crate) fn next_slot_value(
    value: &Value,
    field: &ResolvedField,
    config: &IndexConfig,
) -> Result<Option<Value>, CodecError> {
    if let Some(at) = NULL_STATES.iter().position(|state| state == value) {
        return Ok(first_state_from(at + 1, config));
    }

    match next_concrete(value, field.slot_type())? {
        Some(next) => Ok(Some(next)),
        None => Ok(first_state_from(0, config)),
    }
}

/// Smallest value a slot can hold under `config`.
pub(crate) fn min_slot_value(field: &ResolvedField, config: &IndexConfig) -> Option<Value> {
    let concrete = match field.slot_type() {
        ScalarType::Int => Some(Value::Int(i32::MIN)),
        ScalarType::Long => Some(Value::Long(i64::MIN)),
        ScalarType::Float32 => Some(Value::Float32(f32_from_ordered_bits(0))),
        ScalarType::Float64 => Some(Value::Float64(f64_from_ordered_bits(0))),
        ScalarType::Number => None,
        ScalarType::Text => Some(Value::Text(String::new())),
        ScalarType::Bool => Some(Value::Bool(false)),
        ScalarType::Enum { symbols } => (symbols > 0).then_some(Value::Enum(0)),
        ScalarType::Timestamp { .. } => Some(Value::Timestamp(Timestamp::MIN)),
        ScalarType::Binary => Some(Value::Blob(Vec::new())),
        ScalarType::FixedBinary { size } => Some(Value::Blob(vec![0; size])),
    };

    match (field.slot_type(), concrete) {
        (_, Some(value)) => Some(value),
        // no concrete values at all: the first null-like state is the minimum
        (ScalarType::Enum { .. }, None) => first_state_from(0, config),
        (_, None) => None,
    }
}

fn first_state_from(start: usize, config: &IndexConfig) -> Option<Value> {
    NULL_STATES
        .iter()
        .skip(start)
        .find(|state| config.encodes(state))
        .cloned()
}

fn next_concrete(value: &Value, slot: ScalarType) -> Result<Option<Value>, CodecError> {
    let next = match (slot, value) {
        (ScalarType::Int, Value::Int(v)) => v.checked_add(1).map(Value::Int),
        (ScalarType::Long, Value::Long(v)) => v.checked_add(1).map(Value::Long),
        (ScalarType::Float32, Value::Float32(v)) => ordered_f32_bits(*v)
            .checked_add(1)
            .map(|bits| Value::Float32(f32_from_ordered_bits(bits))),
        (ScalarType::Float64, Value::Float64(v)) => ordered_f64_bits(*v)
            .checked_add(1)
            .map(|bits| Value::Float64(f64_from_ordered_bits(bits))),
        (ScalarType::Number, Value::Number(_)) => {
            return Err(CodecError::unsupported(
                ErrorOrigin::Successor,
                "number values have no discrete successor",
            ));
        }
        // appending the smallest character gives the immediate successor
        (ScalarType::Text, Value::Text(v)) => Some(Value::Text(format!("{v}\0"))),
        (ScalarType::Binary, Value::Blob(v)) => {
            let mut next = v.clone();
            next.push(0);
            Some(Value::Blob(next))
        }
        (ScalarType::FixedBinary { .. }, Value::Blob(v)) => increment_fixed(v).map(Value::Blob),
        (ScalarType::Bool, Value::Bool(false)) => Some(Value::Bool(true)),
        (ScalarType::Bool, Value::Bool(true)) => None,
        (ScalarType::Enum { symbols }, Value::Enum(ordinal)) => ordinal
            .checked_add(1)
            .filter(|next| *next < symbols)
            .map(Value::Enum),
        (ScalarType::Timestamp { precision }, Value::Timestamp(ts)) => ts
            .next_at(precision)
            .map_err(|err| CodecError::unsupported(ErrorOrigin::Successor, err.to_string()))?
            .map(Value::Timestamp),
        (slot, value) => {
            return Err(CodecError::unsupported(
                ErrorOrigin::Successor,
                format!("{} value cannot occupy a {slot} slot", value.kind_label()),
            ));
        }
    };

    Ok(next)
}

// Big-endian increment; `None` when every byte is 0xFF.
fn increment_fixed(bytes: &[u8]) -> Option<Vec<u8>> {
    let mut next = bytes.to_vec();
    for byte in next.iter_mut().rev() {
        if *byte == u8::MAX {
            *byte = 0;
        } else {
            *byte += 1;
            return Some(next);
        }
    }

    None
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorClass,
        model::FieldType,
        test_fixtures::typed_index,
    };
    use proptest::prelude::*;

    fn two_ints(config: IndexConfig) -> ResolvedIndex {
        typed_index(&[FieldType::Int, FieldType::Int], config)
    }

    #[test]
    fn int_max_pair_has_no_successor_without_null_states() {
        let index = two_ints(IndexConfig::legacy());

        let max = index.key([i32::MAX, i32::MAX]).expect("key");
        assert_eq!(index.increment(&max).expect("increment"), None);

        let below = index.key([i32::MAX - 1, i32::MAX]).expect("key");
        let next = index.increment(&below).expect("increment").expect("successor");
        assert_eq!(next.slots(), &[Value::Int(i32::MAX), Value::Int(i32::MIN)]);
        assert!(next > below);
        assert!(
            index.serialize(&next).expect("next bytes") > index.serialize(&below).expect("bytes")
        );
    }

    #[test]
    fn exhausted_slot_walks_through_null_states() {
        let index = two_ints(IndexConfig::new());
        let mut key = index.key([i32::MAX, i32::MAX]).expect("key");

        let mut seen = Vec::new();
        for _ in 0..3 {
            key = index.increment(&key).expect("increment").expect("successor");
            seen.push(key.slots()[1].clone());
        }
        assert_eq!(seen, vec![Value::Empty, Value::JsonNull, Value::Null]);

        let carried = index.increment(&key).expect("increment").expect("carry");
        assert_eq!(carried.slots(), &[Value::Empty, Value::Int(i32::MIN)]);

        let last = index.key(vec![Value::Null, Value::Null]).expect("key");
        assert_eq!(index.increment(&last).expect("increment"), None);
    }

    #[test]
    fn strict_null_config_skips_absent_states() {
        let index = two_ints(IndexConfig::new().with_null_support(false));
        let key = index.key([1, i32::MAX]).expect("key");

        let next = index.increment(&key).expect("increment").expect("successor");
        assert_eq!(next.slots(), &[Value::Int(1), Value::Null]);
    }

    #[test]
    fn text_successor_is_immediate() {
        let index = typed_index(&[FieldType::Text], IndexConfig::new());
        let key = index.key(["abc"]).expect("key");
        let next = index.increment(&key).expect("increment").expect("successor");

        assert_eq!(next.slots(), &[Value::from("abc\0")]);
        let (a, b) = (
            index.serialize(&key).expect("a"),
            index.serialize(&next).expect("b"),
        );
        assert!(a < b);
        // no text lies between "abc" and "abc\0"
        let between = index.serialize(&index.key(["abc "]).expect("key")).expect("c");
        assert!(between > b);
    }

    #[test]
    fn fixed_binary_carries_within_the_value() {
        let index = typed_index(&[FieldType::FixedBinary { size: 2 }], IndexConfig::legacy());

        let key = index.key([vec![0x01u8, 0xFF]]).expect("key");
        let next = index.increment(&key).expect("increment").expect("successor");
        assert_eq!(next.slots(), &[Value::Blob(vec![0x02, 0x00])]);

        let max = index.key([vec![0xFFu8, 0xFF]]).expect("key");
        assert_eq!(index.increment(&max).expect("increment"), None);
    }

    #[test]
    fn float_successor_moves_one_ulp() {
        let index = typed_index(&[FieldType::Float64], IndexConfig::legacy());

        let key = index.key([1.0_f64]).expect("key");
        let next = index.increment(&key).expect("increment").expect("successor");
        assert_eq!(next.slots(), &[Value::Float64(f64::from_bits(1.0_f64.to_bits() + 1))]);

        let neg_zero = index.key([-0.0_f64]).expect("key");
        let next = index.increment(&neg_zero).expect("increment").expect("successor");
        assert_eq!(next.slots(), &[Value::Float64(0.0)]);
    }

    #[test]
    fn timestamp_successor_respects_precision() {
        let index = typed_index(&[FieldType::Timestamp { precision: 3 }], IndexConfig::legacy());
        let key = index
            .key([Timestamp::new(10, 999_000_000).expect("ts")])
            .expect("key");

        let next = index.increment(&key).expect("increment").expect("successor");
        assert_eq!(next.slots(), &[Value::Timestamp(Timestamp::new(11, 0).expect("ts"))]);

        let max = index.key([Timestamp::MAX]).expect("key");
        assert_eq!(index.increment(&max).expect("increment"), None);
    }

    #[test]
    fn number_slots_have_no_discrete_successor() {
        let index = typed_index(&[FieldType::Int, FieldType::Number], IndexConfig::new());

        let key = index
            .key(vec![Value::Int(1), Value::Number(crate::types::Number::from(5))])
            .expect("key");
        let err = index.increment(&key).expect_err("number successor");
        assert_eq!(err.class, ErrorClass::Unsupported);

        // advancing the int slot cannot reset the number slot: prefix key
        let key = index.key(vec![Value::Int(1), Value::Null]).expect("key");
        let next = index.increment(&key).expect("increment").expect("successor");
        assert_eq!(next.slots(), &[Value::Int(2)]);
    }

    fn walk_all(index: &ResolvedIndex, start: IndexKey) -> Vec<Vec<u8>> {
        let mut out = vec![index.serialize(&start).expect("start bytes")];
        let mut key = start;
        while let Some(next) = index.increment(&key).expect("increment") {
            out.push(index.serialize(&next).expect("bytes"));
            key = next;
        }
        out
    }

    #[test]
    fn repeated_increment_enumerates_every_key_once() {
        let types = [FieldType::Bool, FieldType::enumeration(["a", "b", "c"])];

        for (config, states) in [
            (IndexConfig::legacy(), 0),
            (IndexConfig::new().with_null_support(false), 1),
            (IndexConfig::new(), 3),
        ] {
            let index = typed_index(&types, config);
            let min = index.key(vec![Value::Bool(false), Value::Enum(0)]).expect("min");

            let all = walk_all(&index, min);
            assert_eq!(all.len(), (2 + states) * (3 + states));
            assert!(all.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }

    proptest! {
        #[test]
        fn successor_is_strictly_greater(a in any::<i32>(), b in any::<i32>()) {
            let index = two_ints(IndexConfig::new());
            let key = index.key([a, b]).expect("key");
            let next = index.increment(&key).expect("increment").expect("successor");

            prop_assert!(next > key);
            prop_assert!(
                index.serialize(&next).expect("next") > index.serialize(&key).expect("key")
            );
            if b < i32::MAX {
                prop_assert_eq!(next.slots(), &[Value::Int(a), Value::Int(b + 1)][..]);
            }
        }
    }
}
