use proptest::prelude::*;
use protostruct::{DecodeError, ListValue, Struct, Value, WireMessage};

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::null()),
        Just(Value::absent()),
        any::<bool>().prop_map(Value::from),
        any::<f64>()
            .prop_filter("NaN never equals itself", |n| !n.is_nan())
            .prop_map(Value::from),
        ".*".prop_map(Value::from),
    ];

    leaf.prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8)
                .prop_map(|values| Value::from(ListValue { values })),
            // Absent struct entries are never written, so leave them out of the input.
            prop::collection::btree_map(".*", inner, 0..8).prop_map(|fields| {
                Value::from(Struct {
                    fields: fields
                        .into_iter()
                        .filter(|(_, value)| !value.is_absent())
                        .collect(),
                })
            }),
        ]
    })
}

proptest! {
    #[test]
    fn test_decode_inverts_encode(value in arb_value()) {
        let bytes = protostruct::encode(&value).unwrap();
        prop_assert_eq!(protostruct::decode(&bytes).unwrap(), value);
    }

    #[test]
    fn test_re_encode_is_byte_identical(value in arb_value()) {
        let first = protostruct::encode(&value).unwrap();
        let second = protostruct::encode(&protostruct::decode(&first).unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_encoded_len_is_exact(value in arb_value()) {
        let bytes = protostruct::encode(&value).unwrap();
        prop_assert_eq!(value.encoded_len().unwrap(), bytes.len());
    }

    #[test]
    fn test_dropping_last_byte_is_truncation(value in arb_value()) {
        let bytes = protostruct::encode(&value).unwrap();
        prop_assume!(!bytes.is_empty());

        let result = protostruct::decode(&bytes[..bytes.len() - 1]);
        prop_assert!(
            matches!(result, Err(DecodeError::Truncated { .. })),
            "got {:?}",
            result
        );
    }
}
