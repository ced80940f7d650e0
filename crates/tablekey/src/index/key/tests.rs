use super::*;
use crate::{
    model::FieldType,
    test_fixtures::{people_index, typed_index},
    types::{Number, Timestamp},
};
use proptest::prelude::*;

fn int_text_index() -> ResolvedIndex {
    typed_index(&[FieldType::Int, FieldType::Text], IndexConfig::default())
}

fn bytes(index: &ResolvedIndex, values: Vec<Value>) -> Vec<u8> {
    let key = index.key(values).expect("key should build");
    index.serialize(&key).expect("key should serialize")
}

#[test]
fn composite_keys_order_by_leading_slot_first() {
    let index = int_text_index();

    let row1 = bytes(&index, vec![Value::Int(1), Value::from("row1")]);
    let row2 = bytes(&index, vec![Value::Int(1), Value::from("row2")]);
    let zz = bytes(&index, vec![Value::Int(0), Value::from("zz")]);
    let aa = bytes(&index, vec![Value::Int(1), Value::from("aa")]);

    assert!(row1 < row2);
    assert!(zz < aa);
}

#[test]
fn prefix_keys_sort_before_their_extensions() {
    let index = int_text_index();
    let prefix = bytes(&index, vec![Value::Int(1)]);
    let full = bytes(&index, vec![Value::Int(1), Value::from("")]);

    assert!(full.starts_with(&prefix));
    assert!(prefix < full);
}

#[test]
fn partial_decode_requires_opt_in() {
    let index = int_text_index();
    let prefix = bytes(&index, vec![Value::Int(7)]);

    let err = index.deserialize(&prefix, false).expect_err("partial without opt-in");
    assert!(err.is_malformed());

    let key = index.deserialize(&prefix, true).expect("partial key");
    assert_eq!(key.slots(), &[Value::Int(7)]);
    assert!(!key.is_complete(&index));
    assert!(index.deserialize(&[], true).expect("empty prefix").is_empty());
}

#[test]
fn misaligned_and_trailing_bytes_are_malformed() {
    let index = int_text_index();
    let full = bytes(&index, vec![Value::Int(7), Value::from("x")]);

    // cut inside the int payload
    assert!(index.deserialize(&full[..3], true).expect_err("misaligned").is_malformed());

    let mut trailing = full.clone();
    trailing.push(0);
    assert!(index.deserialize(&trailing, false).expect_err("trailing").is_malformed());
}

#[test]
fn builder_validates_and_normalizes_slots() {
    let index = people_index(&["kind", "created", "hash"]);
    let ts = Timestamp::new(100, 123_456_789).expect("ts");

    let key = index
        .key_builder()
        .push("archived")
        .push(ts)
        .push(vec![1u8, 2, 3, 4])
        .build()
        .expect("valid key");
    assert_eq!(key.get(0), Some(&Value::Enum(2)));
    assert_eq!(
        key.get(1),
        Some(&Value::Timestamp(Timestamp::new(100, 123_000_000).expect("ts")))
    );

    let err = index.key(["nope"]).expect_err("unknown symbol");
    assert!(err.is_type_mismatch());

    let err = index
        .key(vec![Value::Enum(0), Value::Int(1)])
        .expect_err("int into timestamp");
    assert!(err.is_type_mismatch());
    assert!(err.message.contains("created"));

    let err = index
        .key(vec![Value::Enum(0), Value::Timestamp(ts), Value::Blob(vec![1])])
        .expect_err("short fixed binary");
    assert!(err.is_type_mismatch());
}

#[test]
fn builder_rejects_too_many_slots() {
    let index = int_text_index();
    let err = index
        .key(vec![Value::Int(1), Value::from("a"), Value::from("b")])
        .expect_err("three slots");

    assert!(err.is_type_mismatch());
}

#[test]
fn null_states_round_trip_and_display() {
    let index = int_text_index();

    for state in [Value::Empty, Value::JsonNull, Value::Null] {
        let key = index.key(vec![Value::Int(1), state]).expect("state key");
        let decoded = index
            .deserialize(&index.serialize(&key).expect("serialize"), false)
            .expect("decode");
        assert_eq!(decoded, key);
    }

    let key = index.key(vec![Value::Int(1), Value::Empty]).expect("key");
    assert_eq!(key.to_string(), "(1, EMPTY)");
}

#[test]
fn legacy_index_rejects_null_state_keys() {
    let index = typed_index(&[FieldType::Int], IndexConfig::legacy());
    let err = index.key(vec![Value::Null]).expect_err("legacy null");

    assert_eq!(err.class, crate::error::ErrorClass::Unsupported);
}

#[test]
fn every_scalar_type_round_trips() {
    let index = people_index(&[
        "id", "name", "ratio", "amount", "flag", "kind", "created", "hash", "blob",
    ]);
    let key = index
        .key(vec![
            Value::Long(-5),
            Value::from("a\0b"),
            Value::Float64(-0.0),
            Value::Number("-12.5e-3".parse::<Number>().expect("number")),
            Value::Bool(true),
            Value::Enum(1),
            Value::Timestamp(Timestamp::MIN),
            Value::Blob(vec![0, 0xFF, 0, 1]),
            Value::Blob(vec![0, 0, 0xFF]),
        ])
        .expect("key");

    let encoded = index.serialize(&key).expect("serialize");
    assert_eq!(index.deserialize(&encoded, false).expect("decode"), key);
}

#[test]
#[expect(clippy::cast_possible_truncation)]
fn random_key_bytes_never_panic_and_decoded_keys_are_canonical() {
    const RUNS: u64 = 5_000;
    const MAX_LEN: u64 = 48;

    let index = people_index(&["age", "name", "amount", "created"]);

    let mut seed = 0xBADC_0FFE_u64;
    for _ in 0..RUNS {
        seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        let len = ((seed >> 33) % MAX_LEN) as usize;

        let mut raw = vec![0u8; len];
        for byte in &mut raw {
            seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            *byte = (seed >> 24) as u8;
        }

        for allow_partial in [false, true] {
            if let Ok(decoded) = index.deserialize(&raw, allow_partial) {
                let reencoded = index.serialize(&decoded).expect("decoded key re-encodes");
                assert_eq!(reencoded, raw);
            }
        }
    }
}

#[test]
#[expect(clippy::cast_possible_truncation)]
fn mutated_valid_keys_fail_cleanly_or_stay_canonical() {
    const RUNS: u64 = 2_000;

    let index = people_index(&["age", "name", "amount", "created"]);
    let valid = bytes(
        &index,
        vec![
            Value::Int(-42),
            Value::from("hello\0world"),
            Value::Number("3.14159".parse::<Number>().expect("number")),
            Value::Timestamp(Timestamp::new(1_700_000_000, 5_000_000).expect("ts")),
        ],
    );

    let mut seed = 0xA5A5_5A5A_u64;
    for _ in 0..RUNS {
        let mut mutated = valid.clone();
        seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        let at = ((seed >> 33) as usize) % mutated.len();
        mutated[at] = (seed >> 16) as u8;

        seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        let cut = ((seed >> 33) as usize) % (mutated.len() + 1);
        mutated.truncate(cut);

        if let Ok(decoded) = index.deserialize(&mutated, true) {
            assert_eq!(index.serialize(&decoded).expect("re-encode"), mutated);
        }
    }
}

fn arb_slot_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        4 => any::<i32>().prop_map(Value::Int),
        1 => Just(Value::Empty),
        1 => Just(Value::JsonNull),
        1 => Just(Value::Null),
    ]
}

fn arb_text_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        4 => "[a-c\\x00]{0,4}".prop_map(Value::Text),
        1 => Just(Value::Empty),
        1 => Just(Value::Null),
    ]
}

proptest! {
    #[test]
    fn composite_byte_order_matches_key_order(
        a in (arb_slot_value(), arb_text_value()),
        b in (arb_slot_value(), arb_text_value()),
    ) {
        let index = int_text_index();
        let ka = index.key(vec![a.0, a.1]).expect("key a");
        let kb = index.key(vec![b.0, b.1]).expect("key b");
        let ba = index.serialize(&ka).expect("serialize a");
        let bb = index.serialize(&kb).expect("serialize b");

        prop_assert_eq!(ba.cmp(&bb), compare_keys(&ka, &kb));
        prop_assert_eq!(index.deserialize(&ba, false).expect("round trip"), ka);
    }
}
