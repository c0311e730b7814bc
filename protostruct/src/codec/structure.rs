//! # Struct Codec
//!
//! `google.protobuf.Struct` declares `map<string, Value> fields = 1`, which on the wire is a
//! repeated submessage:
//!
//! ```text
//! message FieldsEntry {
//!   string key = 1;
//!   Value value = 2;
//! }
//! ```
//!
//! Entries whose value is absent are not written at all, and an empty key is elided like any
//! other proto3 default. When decoding, a repeated key simply overwrites the earlier entry, and
//! an entry that carries no `value` field is dropped.
use super::{
    SizeCache, WireMessage, encode_message, enter_decode, enter_encode, measure_message,
    trace_decode, value,
};
use crate::{
    error::{DecodeError, EncodeError},
    options::{CodecOptions, Depth},
    types::{Struct, Value},
    wire::{WireReader, WireType, WireWriter, length_delimited_len},
};
use bytes::BufMut;
use std::collections::BTreeMap;

const FIELDS: u32 = 1;

const ENTRY_KEY: u32 = 1;
const ENTRY_VALUE: u32 = 2;

/// Measures the body of a `Struct` message.
pub(crate) fn measure(
    message: &Struct,
    cache: &mut SizeCache,
    depth: Depth,
) -> Result<usize, EncodeError> {
    let depth = enter_encode(depth)?;
    let mut len = 0;

    for (key, field) in present_entries(message) {
        let entry_slot = cache.reserve();
        let value_slot = cache.reserve();

        let value_len = value::measure(field, cache, depth)?;
        cache.fill(value_slot, value_len);

        let entry_len = key_len(key) + length_delimited_len(ENTRY_VALUE, value_len);
        cache.fill(entry_slot, entry_len);

        len += length_delimited_len(FIELDS, entry_len);
    }

    Ok(len)
}

/// Writes the body of a `Struct` message previously passed to [`measure`].
pub(crate) fn write<B: BufMut>(
    message: &Struct,
    writer: &mut WireWriter<'_, B>,
    cache: &mut SizeCache,
) {
    for (key, field) in present_entries(message) {
        writer.write_message_header(FIELDS, cache.next_len());

        if !key.is_empty() {
            writer.write_tag(ENTRY_KEY, WireType::LengthDelimited);
            writer.write_length_delimited(key.as_bytes());
        }

        writer.write_message_header(ENTRY_VALUE, cache.next_len());
        value::write(field, writer, cache);
    }
}

/// Decodes a `Struct` body from a reader scoped to exactly that body.
pub(crate) fn decode(mut reader: WireReader<'_>, depth: Depth) -> Result<Struct, DecodeError> {
    let depth = enter_decode(depth)?;
    let mut fields = BTreeMap::new();

    while !reader.is_empty() {
        let (field, wire_type) = reader.read_tag()?;

        match field {
            FIELDS => {
                WireReader::expect_wire_type(field, WireType::LengthDelimited, wire_type)?;
                let entry = reader.read_message()?;

                if let Some((key, field)) = decode_entry(entry, depth)? {
                    fields.insert(key, field);
                }
            }
            _ => reader.skip_field(field, wire_type, depth)?,
        }
    }

    Ok(Struct { fields })
}

fn decode_entry(
    mut reader: WireReader<'_>,
    depth: Depth,
) -> Result<Option<(String, Value)>, DecodeError> {
    let mut key = String::new();
    let mut entry_value = None;

    while !reader.is_empty() {
        let (field, wire_type) = reader.read_tag()?;

        match field {
            ENTRY_KEY => {
                WireReader::expect_wire_type(field, WireType::LengthDelimited, wire_type)?;
                key = reader.read_string()?.to_owned();
            }
            ENTRY_VALUE => {
                WireReader::expect_wire_type(field, WireType::LengthDelimited, wire_type)?;
                let body = reader.read_message()?;
                entry_value = Some(value::decode(body, depth)?);
            }
            _ => reader.skip_field(field, wire_type, depth)?,
        }
    }

    Ok(entry_value.map(|field| (key, field)))
}

fn present_entries(message: &Struct) -> impl Iterator<Item = (&String, &Value)> {
    message
        .fields
        .iter()
        .filter(|(_, field)| !field.is_absent())
}

fn key_len(key: &str) -> usize {
    if key.is_empty() {
        0
    } else {
        length_delimited_len(ENTRY_KEY, key.len())
    }
}

impl WireMessage for Struct {
    fn encoded_len_with(&self, options: &CodecOptions) -> Result<usize, EncodeError> {
        measure_message(options, |cache, depth| measure(self, cache, depth))
    }

    fn encode_with<B: BufMut>(
        &self,
        buf: &mut B,
        options: &CodecOptions,
    ) -> Result<(), EncodeError> {
        encode_message(
            buf,
            options,
            |cache, depth| measure(self, cache, depth),
            |writer, cache| write(self, writer, cache),
        )
    }

    fn decode_with(bytes: &[u8], options: &CodecOptions) -> Result<Self, DecodeError> {
        trace_decode(
            decode(WireReader::new(bytes), Depth::root(options)),
            bytes.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Kind;

    #[test]
    fn test_single_entry_layout() {
        let message: Struct = [("a", Value::from(true))].into_iter().collect();

        assert_eq!(
            message.encode_to_vec().unwrap(),
            vec![
                0x0A, 0x07, // fields entry, 7 bytes
                0x0A, 0x01, b'a', // key
                0x12, 0x02, 0x20, 0x01, // value { bool_value: true }
            ]
        );
    }

    #[test]
    fn test_absent_values_are_omitted() {
        let message: Struct = [("gone", Value::absent()), ("kept", Value::null())]
            .into_iter()
            .collect();

        let decoded = Struct::decode(&message.encode_to_vec().unwrap()).unwrap();

        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded.get("kept"), Some(&Value::null()));
    }

    #[test]
    fn test_empty_key_is_elided_and_restored() {
        let message: Struct = [("", Value::from(2.0))].into_iter().collect();
        let bytes = message.encode_to_vec().unwrap();

        assert_eq!(&bytes[..4], &[0x0A, 0x0B, 0x12, 0x09]);
        assert_eq!(Struct::decode(&bytes), Ok(message));
    }

    #[test]
    fn test_duplicate_key_keeps_later_value() {
        let bytes = [
            0x0A, 0x07, 0x0A, 0x01, b'k', 0x12, 0x02, 0x20, 0x00, // k: false
            0x0A, 0x07, 0x0A, 0x01, b'k', 0x12, 0x02, 0x20, 0x01, // k: true
        ];

        let decoded = Struct::decode(&bytes).unwrap();

        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded.get("k"), Some(&Value::from(true)));
    }

    #[test]
    fn test_entry_without_value_is_dropped() {
        let bytes = [0x0A, 0x03, 0x0A, 0x01, b'k'];
        assert_eq!(Struct::decode(&bytes), Ok(Struct::new()));
    }

    #[test]
    fn test_entry_with_empty_value_keeps_key_as_absent() {
        let bytes = [0x0A, 0x05, 0x0A, 0x01, b'k', 0x12, 0x00];
        let decoded = Struct::decode(&bytes).unwrap();

        assert_eq!(decoded.get("k"), Some(&Value::absent()));
    }

    #[test]
    fn test_recursion_limit_on_encode() {
        let mut nested = Value::null();
        for _ in 0..5 {
            nested = Struct::from_iter([("n", nested)]).into();
        }
        let Some(Kind::Struct(message)) = nested.kind else {
            unreachable!("built as a struct");
        };
        let options = CodecOptions::default().with_recursion_limit(3);

        assert_eq!(
            message.encode_to_vec_with(&options),
            Err(EncodeError::RecursionLimitExceeded(3))
        );
        assert!(message.encode_to_vec().is_ok());
    }
}
