//! Checks the encoding against `prost`, a standard protobuf runtime with generated
//! definitions of the same well-known types.
use prost::Message;
use protostruct::{ListValue, Struct, Value, WireMessage, native};
use serde_json::json;

fn fixtures() -> Vec<serde_json::Value> {
    vec![
        json!(null),
        json!(true),
        json!(false),
        json!(0),
        json!(-1.5e-7),
        json!(""),
        json!("plain ascii"),
        json!("multi-byte ✓ 雪"),
        json!([]),
        json!({}),
        json!([null, [null], {}]),
        json!({ "": "empty key", "a": 1, "b": [true, null, "x"] }),
        json!({
            "release": { "name": "wordpress", "namespace": "default", "revision": 3 },
            "values": { "replicaCount": 2, "service": { "type": "ClusterIP", "ports": [80, 443] } },
            "labels": ["app", "tier"]
        }),
    ]
}

#[test]
fn test_value_bytes_match_prost() {
    for native in fixtures() {
        let value = native::wrap(&native).unwrap();
        let prost_value: prost_types::Value = value.clone().into();

        assert_eq!(
            protostruct::encode(&value).unwrap(),
            prost_value.encode_to_vec(),
            "encoding of {native}"
        );
    }
}

#[test]
fn test_prost_decodes_our_bytes() {
    for native in fixtures() {
        let value = native::wrap(&native).unwrap();
        let bytes = protostruct::encode(&value).unwrap();

        let prost_value = prost_types::Value::decode(bytes.as_slice()).unwrap();

        assert_eq!(Value::from(prost_value), value, "decoding of {native}");
    }
}

#[test]
fn test_we_decode_prost_bytes() {
    for native in fixtures() {
        let value = native::wrap(&native).unwrap();
        let prost_value: prost_types::Value = value.clone().into();

        let decoded = protostruct::decode(&prost_value.encode_to_vec()).unwrap();

        assert_eq!(decoded, value, "decoding of {native}");
    }
}

#[test]
fn test_struct_and_list_bytes_match_prost() {
    let message = native::wrap_struct(&json!({ "k": [1, 2, { "n": null }], "s": "v" })).unwrap();
    let prost_struct: prost_types::Struct = message.clone().into();
    assert_eq!(message.encode_to_vec().unwrap(), prost_struct.encode_to_vec());
    assert_eq!(
        Struct::decode(&prost_struct.encode_to_vec()).unwrap(),
        message
    );

    let list = native::wrap_list(&[json!("a"), json!(2.5), json!([])]).unwrap();
    let prost_list: prost_types::ListValue = list.clone().into();
    assert_eq!(list.encode_to_vec().unwrap(), prost_list.encode_to_vec());
    assert_eq!(
        ListValue::decode(&prost_list.encode_to_vec()).unwrap(),
        list
    );
}

#[test]
fn test_absent_list_element_matches_prost() {
    let list = ListValue::from_iter([Value::absent(), Value::from(1.0)]);
    let prost_list: prost_types::ListValue = list.clone().into();

    assert_eq!(list.encode_to_vec().unwrap(), prost_list.encode_to_vec());
}

#[test]
fn test_encoded_len_matches_prost() {
    for native in fixtures() {
        let value = native::wrap(&native).unwrap();
        let prost_value: prost_types::Value = value.clone().into();

        assert_eq!(value.encoded_len().unwrap(), prost_value.encoded_len());
    }
}
