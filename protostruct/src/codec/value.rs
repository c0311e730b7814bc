//! # Value Codec
//!
//! `google.protobuf.Value` is a oneof over six fields:
//!
//! | Field          | Number | Wire type        |
//! |----------------|--------|------------------|
//! | `null_value`   | 1      | varint (enum)    |
//! | `number_value` | 2      | fixed64 (double) |
//! | `string_value` | 3      | length-delimited |
//! | `bool_value`   | 4      | varint           |
//! | `struct_value` | 5      | length-delimited |
//! | `list_value`   | 6      | length-delimited |
//!
//! Encoding emits exactly one field, or nothing for an absent value. Decoding overwrites the
//! oneof slot every time one of these fields is read, so when a (non-conforming) encoder sets
//! several of them the last one on the wire wins.
use super::{
    SizeCache, WireMessage, encode_message, list, measure_message, structure, trace_decode,
};
use crate::{
    error::{DecodeError, EncodeError},
    options::{CodecOptions, Depth},
    types::{Kind, Value},
    wire::{WireReader, WireType, WireWriter, length_delimited_len, tag_len},
};
use bytes::BufMut;

const NULL_VALUE: u32 = 1;
const NUMBER_VALUE: u32 = 2;
const STRING_VALUE: u32 = 3;
const BOOL_VALUE: u32 = 4;
const STRUCT_VALUE: u32 = 5;
const LIST_VALUE: u32 = 6;

/// `NullValue.NULL_VALUE`, the only value the enum defines.
const NULL_VALUE_ZERO: u64 = 0;

/// Measures the body of a `Value` message.
pub(crate) fn measure(
    value: &Value,
    cache: &mut SizeCache,
    depth: Depth,
) -> Result<usize, EncodeError> {
    let len = match &value.kind {
        None => 0,
        Some(Kind::Null) => tag_len(NULL_VALUE) + 1,
        Some(Kind::Number(_)) => tag_len(NUMBER_VALUE) + 8,
        Some(Kind::String(s)) => length_delimited_len(STRING_VALUE, s.len()),
        Some(Kind::Bool(_)) => tag_len(BOOL_VALUE) + 1,
        Some(Kind::Struct(s)) => {
            let slot = cache.reserve();
            let body = structure::measure(s, cache, depth)?;
            cache.fill(slot, body);
            length_delimited_len(STRUCT_VALUE, body)
        }
        Some(Kind::List(l)) => {
            let slot = cache.reserve();
            let body = list::measure(l, cache, depth)?;
            cache.fill(slot, body);
            length_delimited_len(LIST_VALUE, body)
        }
    };

    Ok(len)
}

/// Writes the body of a `Value` message previously passed to [`measure`].
pub(crate) fn write<B: BufMut>(
    value: &Value,
    writer: &mut WireWriter<'_, B>,
    cache: &mut SizeCache,
) {
    match &value.kind {
        None => {}
        Some(Kind::Null) => {
            writer.write_tag(NULL_VALUE, WireType::Varint);
            writer.write_varint(NULL_VALUE_ZERO);
        }
        Some(Kind::Number(n)) => {
            writer.write_tag(NUMBER_VALUE, WireType::Fixed64);
            writer.write_double(*n);
        }
        Some(Kind::String(s)) => {
            writer.write_tag(STRING_VALUE, WireType::LengthDelimited);
            writer.write_length_delimited(s.as_bytes());
        }
        Some(Kind::Bool(b)) => {
            writer.write_tag(BOOL_VALUE, WireType::Varint);
            writer.write_varint(u64::from(*b));
        }
        Some(Kind::Struct(s)) => {
            writer.write_message_header(STRUCT_VALUE, cache.next_len());
            structure::write(s, writer, cache);
        }
        Some(Kind::List(l)) => {
            writer.write_message_header(LIST_VALUE, cache.next_len());
            list::write(l, writer, cache);
        }
    }
}

/// Decodes a `Value` body from a reader scoped to exactly that body.
pub(crate) fn decode(mut reader: WireReader<'_>, depth: Depth) -> Result<Value, DecodeError> {
    let mut kind = None;

    while !reader.is_empty() {
        let (field, wire_type) = reader.read_tag()?;

        match field {
            NULL_VALUE => {
                WireReader::expect_wire_type(field, WireType::Varint, wire_type)?;
                // Open enum: unknown numbers are still the null variant.
                reader.read_varint()?;
                kind = Some(Kind::Null);
            }
            NUMBER_VALUE => {
                WireReader::expect_wire_type(field, WireType::Fixed64, wire_type)?;
                kind = Some(Kind::Number(reader.read_double()?));
            }
            STRING_VALUE => {
                WireReader::expect_wire_type(field, WireType::LengthDelimited, wire_type)?;
                kind = Some(Kind::String(reader.read_string()?.to_owned()));
            }
            BOOL_VALUE => {
                WireReader::expect_wire_type(field, WireType::Varint, wire_type)?;
                kind = Some(Kind::Bool(reader.read_bool()?));
            }
            STRUCT_VALUE => {
                WireReader::expect_wire_type(field, WireType::LengthDelimited, wire_type)?;
                let body = reader.read_message()?;
                kind = Some(Kind::Struct(structure::decode(body, depth)?));
            }
            LIST_VALUE => {
                WireReader::expect_wire_type(field, WireType::LengthDelimited, wire_type)?;
                let body = reader.read_message()?;
                kind = Some(Kind::List(list::decode(body, depth)?));
            }
            _ => reader.skip_field(field, wire_type, depth)?,
        }
    }

    Ok(Value { kind })
}

impl WireMessage for Value {
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
    use crate::types::{ListValue, Struct};

    fn encoded(value: &Value) -> Vec<u8> {
        value.encode_to_vec().unwrap()
    }

    #[test]
    fn test_null_is_tag_plus_zero() {
        assert_eq!(encoded(&Value::null()), vec![0x08, 0x00]);
    }

    #[test]
    fn test_absent_is_empty() {
        assert!(encoded(&Value::absent()).is_empty());
        assert_eq!(Value::decode(&[]), Ok(Value::absent()));
    }

    #[test]
    fn test_scalar_encodings() {
        assert_eq!(
            encoded(&Value::from(1.0)),
            vec![0x11, 0, 0, 0, 0, 0, 0, 0xF0, 0x3F]
        );
        assert_eq!(encoded(&Value::from("x")), vec![0x1A, 0x01, b'x']);
        assert_eq!(encoded(&Value::from(true)), vec![0x20, 0x01]);
        assert_eq!(encoded(&Value::from(false)), vec![0x20, 0x00]);
    }

    #[test]
    fn test_empty_containers_are_present_but_empty() {
        assert_eq!(encoded(&Value::from(Struct::new())), vec![0x2A, 0x00]);
        assert_eq!(encoded(&Value::from(ListValue::new())), vec![0x32, 0x00]);
    }

    #[test]
    fn test_last_oneof_field_wins() {
        // bool_value = true, then string_value = "s", then null_value.
        let bytes = [0x20, 0x01, 0x1A, 0x01, b's', 0x08, 0x00];
        assert_eq!(Value::decode(&bytes), Ok(Value::null()));

        let bytes = [0x08, 0x00, 0x20, 0x01];
        assert_eq!(Value::decode(&bytes), Ok(Value::from(true)));
    }

    #[test]
    fn test_non_zero_null_enum_still_decodes_as_null() {
        assert_eq!(Value::decode(&[0x08, 0x05]), Ok(Value::null()));
    }

    #[test]
    fn test_non_zero_bool_is_true() {
        assert_eq!(Value::decode(&[0x20, 0x7F]), Ok(Value::from(true)));
    }

    #[test]
    fn test_unknown_fields_are_skipped() {
        // field 9 varint, then string_value "ok", then field 10 length-delimited.
        let bytes = [0x48, 0x2A, 0x1A, 0x02, b'o', b'k', 0x52, 0x01, 0xFF];
        assert_eq!(Value::decode(&bytes), Ok(Value::from("ok")));
    }

    #[test]
    fn test_wrong_wire_type_for_known_field() {
        // number_value sent as a varint.
        assert_eq!(
            Value::decode(&[0x10, 0x01]),
            Err(DecodeError::WireTypeMismatch {
                field: 2,
                expected: WireType::Fixed64,
                actual: WireType::Varint,
            })
        );
    }

    #[test]
    fn test_invalid_utf8_string() {
        assert_eq!(
            Value::decode(&[0x1A, 0x02, 0xC3, 0x28]),
            Err(DecodeError::InvalidUtf8)
        );
    }

    #[test]
    fn test_encoded_len_matches_output() {
        let value = Value::from(
            [
                ("name", Value::from("granite")),
                ("tags", ListValue::from_iter(["a", "b"]).into()),
                ("nothing", Value::null()),
            ]
            .into_iter()
            .collect::<Struct>(),
        );

        assert_eq!(value.encoded_len().unwrap(), encoded(&value).len());
    }

    #[test]
    fn test_insufficient_capacity_writes_nothing() {
        let mut storage = [0u8; 2];
        let mut buf = &mut storage[..];

        assert_eq!(
            Value::from("too long").encode(&mut buf),
            Err(EncodeError::InsufficientCapacity {
                required: 10,
                remaining: 2
            })
        );
        assert_eq!(storage, [0, 0]);
    }
}
