use super::*;
use crate::types::Number;
use proptest::prelude::*;

fn encode(value: &Value, slot: ScalarType) -> Vec<u8> {
    let mut out = Vec::new();
    encode_slot(&mut out, value, slot, &IndexConfig::new()).expect("slot should encode");
    out
}

fn decode(bytes: &[u8], slot: ScalarType) -> Value {
    let mut cursor = KeyCursor::new(bytes);
    let value = decode_slot(&mut cursor, slot, &IndexConfig::new()).expect("slot should decode");
    assert!(cursor.is_empty(), "decoder must consume the whole slot");
    value
}

fn assert_order(left: &Value, right: &Value, slot: ScalarType) {
    let expected = left.cmp(right);
    let actual = encode(left, slot).cmp(&encode(right, slot));
    assert_eq!(actual, expected, "{left} vs {right} as {slot}");
}

#[test]
fn null_states_sort_after_every_concrete_value() {
    let slots = [
        (ScalarType::Int, Value::Int(i32::MAX)),
        (ScalarType::Float64, Value::Float64(f64::NAN)),
        (ScalarType::Text, Value::Text("\u{10FFFF}".repeat(8))),
        (ScalarType::Binary, Value::Blob(vec![0xFF; 32])),
        (ScalarType::FixedBinary { size: 4 }, Value::Blob(vec![0xFF; 4])),
        (ScalarType::Number, Value::Number("9e999999999".parse().expect("number"))),
        (ScalarType::Timestamp { precision: 9 }, Value::Timestamp(Timestamp::MAX)),
    ];

    for (slot, max) in slots {
        let concrete = encode(&max, slot);
        let empty = encode(&Value::Empty, slot);
        let json_null = encode(&Value::JsonNull, slot);
        let sql_null = encode(&Value::Null, slot);

        assert!(concrete < empty, "{slot}");
        assert!(empty < json_null);
        assert!(json_null < sql_null);
    }
}

#[test]
fn text_prefix_sorts_before_extension() {
    let slot = ScalarType::Text;
    assert_order(&Value::from("abc"), &Value::from("abc "), slot);
    assert_order(&Value::from(""), &Value::from("\0"), slot);
    assert_order(&Value::from("a\0"), &Value::from("a\u{1}"), slot);
}

#[test]
fn enum_orders_by_declaration_ordinal() {
    let small = ScalarType::Enum { symbols: 3 };
    assert_eq!(encode(&Value::Enum(2), small).len(), 2);
    assert_order(&Value::Enum(0), &Value::Enum(2), small);

    let wide = ScalarType::Enum { symbols: 300 };
    assert_eq!(encode(&Value::Enum(299), wide).len(), 3);
    assert_order(&Value::Enum(255), &Value::Enum(256), wide);
}

#[test]
fn timestamp_precision_controls_width() {
    let ts = Timestamp::new(1_700_000_000, 123_456_789).expect("ts");

    assert_eq!(encode(&Value::Timestamp(ts), ScalarType::Timestamp { precision: 0 }).len(), 9);
    assert_eq!(encode(&Value::Timestamp(ts), ScalarType::Timestamp { precision: 3 }).len(), 13);

    let slot = ScalarType::Timestamp { precision: 9 };
    assert_order(&Value::Timestamp(Timestamp::MIN), &Value::Timestamp(Timestamp::EPOCH), slot);
    assert_order(&Value::Timestamp(ts), &Value::Timestamp(Timestamp::MAX), slot);
    assert_eq!(decode(&encode(&Value::Timestamp(ts), slot), slot), Value::Timestamp(ts));
}

#[test]
fn legacy_config_has_no_header_and_rejects_null_states() {
    let legacy = IndexConfig::legacy();
    let mut out = Vec::new();

    encode_slot(&mut out, &Value::Int(0), ScalarType::Int, &legacy).expect("int");
    assert_eq!(out, vec![0x80, 0, 0, 0]);

    for state in [Value::Empty, Value::JsonNull, Value::Null] {
        assert!(encode_slot(&mut Vec::new(), &state, ScalarType::Int, &legacy).is_err());
    }
}

#[test]
fn without_null_support_only_sql_null_is_encodable() {
    let config = IndexConfig::new().with_null_support(false);

    assert!(encode_slot(&mut Vec::new(), &Value::Null, ScalarType::Int, &config).is_ok());
    assert!(encode_slot(&mut Vec::new(), &Value::Empty, ScalarType::Int, &config).is_err());

    let mut cursor = KeyCursor::new(&[EMPTY_MARKER]);
    assert_eq!(
        decode_slot(&mut cursor, ScalarType::Int, &config),
        Err(KeyDecodeError::StateNotEncodable { slot: 0 })
    );
}

#[test]
fn mismatched_value_kind_is_rejected() {
    let err = encode_slot(
        &mut Vec::new(),
        &Value::Long(1),
        ScalarType::Int,
        &IndexConfig::new(),
    )
    .expect_err("long into int slot");

    assert!(matches!(err, KeyEncodeError::Mismatch { found: "Long", .. }));
}

#[test]
fn decode_rejects_unknown_header_and_bad_bool() {
    let config = IndexConfig::new();

    let mut cursor = KeyCursor::new(&[0x42]);
    assert!(matches!(
        decode_slot(&mut cursor, ScalarType::Bool, &config),
        Err(KeyDecodeError::InvalidHeader { header: 0x42, .. })
    ));

    let mut cursor = KeyCursor::new(&[VALUE_HEADER, 7]);
    assert!(matches!(
        decode_slot(&mut cursor, ScalarType::Bool, &config),
        Err(KeyDecodeError::InvalidBool { byte: 7, .. })
    ));

    let mut cursor = KeyCursor::new(&[VALUE_HEADER, 5]);
    assert!(matches!(
        decode_slot(&mut cursor, ScalarType::Enum { symbols: 5 }, &config),
        Err(KeyDecodeError::EnumOutOfRange { ordinal: 5, .. })
    ));
}

fn arb_number() -> impl Strategy<Value = Number> {
    (any::<bool>(), prop::collection::vec(0u8..10, 1..24), -400i64..400).prop_map(
        |(negative, digits, exponent)| {
            let digits = digits.into_iter().map(|d| b'0' + d).collect();
            Number::from_scientific(negative, digits, exponent).expect("bounded digits")
        },
    )
}

proptest! {
    #[test]
    fn int_order_and_round_trip(a in any::<i32>(), b in any::<i32>()) {
        let (a, b) = (Value::Int(a), Value::Int(b));
        assert_order(&a, &b, ScalarType::Int);
        prop_assert_eq!(decode(&encode(&a, ScalarType::Int), ScalarType::Int), a);
    }

    #[test]
    fn long_order(a in any::<i64>(), b in any::<i64>()) {
        assert_order(&Value::Long(a), &Value::Long(b), ScalarType::Long);
    }

    #[test]
    fn float_order_follows_total_order(a in any::<u64>(), b in any::<u64>()) {
        let (a, b) = (f64::from_bits(a), f64::from_bits(b));
        let expected = a.total_cmp(&b);
        let actual = encode(&Value::Float64(a), ScalarType::Float64)
            .cmp(&encode(&Value::Float64(b), ScalarType::Float64));
        prop_assert_eq!(actual, expected);

        let back = decode(&encode(&Value::Float64(a), ScalarType::Float64), ScalarType::Float64);
        prop_assert!(matches!(back, Value::Float64(v) if v.to_bits() == a.to_bits()));
    }

    #[test]
    fn float32_order_follows_total_order(a in any::<u32>(), b in any::<u32>()) {
        let (a, b) = (f32::from_bits(a), f32::from_bits(b));
        let actual = encode(&Value::Float32(a), ScalarType::Float32)
            .cmp(&encode(&Value::Float32(b), ScalarType::Float32));
        prop_assert_eq!(actual, a.total_cmp(&b));
    }

    #[test]
    fn text_order_and_round_trip(a in ".{0,12}", b in ".{0,12}") {
        let (a, b) = (Value::Text(a), Value::Text(b));
        assert_order(&a, &b, ScalarType::Text);
        prop_assert_eq!(decode(&encode(&a, ScalarType::Text), ScalarType::Text), a);
    }

    #[test]
    fn binary_order_and_round_trip(
        a in prop::collection::vec(any::<u8>(), 0..16),
        b in prop::collection::vec(any::<u8>(), 0..16),
    ) {
        let (a, b) = (Value::Blob(a), Value::Blob(b));
        assert_order(&a, &b, ScalarType::Binary);
        prop_assert_eq!(decode(&encode(&a, ScalarType::Binary), ScalarType::Binary), a);
    }

    #[test]
    fn number_order_and_round_trip(a in arb_number(), b in arb_number()) {
        let expected = a.cmp(&b);
        let (a, b) = (Value::Number(a), Value::Number(b));
        let actual = encode(&a, ScalarType::Number).cmp(&encode(&b, ScalarType::Number));
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(decode(&encode(&a, ScalarType::Number), ScalarType::Number), a);
    }

    #[test]
    fn timestamp_order(
        a in Timestamp::MIN.seconds()..=Timestamp::MAX.seconds(),
        an in 0u32..1_000_000_000,
        b in Timestamp::MIN.seconds()..=Timestamp::MAX.seconds(),
        bn in 0u32..1_000_000_000,
    ) {
        let a = Timestamp::new(a, an).expect("in range");
        let b = Timestamp::new(b, bn).expect("in range");
        assert_order(&Value::Timestamp(a), &Value::Timestamp(b), ScalarType::Timestamp { precision: 9 });
    }
}
