//! # ListValue Codec
//!
//! `google.protobuf.ListValue` is `repeated Value values = 1`: one length-delimited `Value`
//! submessage per element, in order. Absent elements are written as empty submessages so the
//! element count and positions survive a round trip.
use super::{
    SizeCache, WireMessage, encode_message, enter_decode, enter_encode, measure_message,
    trace_decode, value,
};
use crate::{
    error::{DecodeError, EncodeError},
    options::{CodecOptions, Depth},
    types::ListValue,
    wire::{WireReader, WireType, WireWriter, length_delimited_len},
};
use bytes::BufMut;

const VALUES: u32 = 1;

/// Measures the body of a `ListValue` message.
pub(crate) fn measure(
    message: &ListValue,
    cache: &mut SizeCache,
    depth: Depth,
) -> Result<usize, EncodeError> {
    let depth = enter_encode(depth)?;
    let mut len = 0;

    for element in &message.values {
        let slot = cache.reserve();
        let element_len = value::measure(element, cache, depth)?;
        cache.fill(slot, element_len);

        len += length_delimited_len(VALUES, element_len);
    }

    Ok(len)
}

/// Writes the body of a `ListValue` message previously passed to [`measure`].
pub(crate) fn write<B: BufMut>(
    message: &ListValue,
    writer: &mut WireWriter<'_, B>,
    cache: &mut SizeCache,
) {
    for element in &message.values {
        writer.write_message_header(VALUES, cache.next_len());
        value::write(element, writer, cache);
    }
}

/// Decodes a `ListValue` body from a reader scoped to exactly that body.
pub(crate) fn decode(mut reader: WireReader<'_>, depth: Depth) -> Result<ListValue, DecodeError> {
    let depth = enter_decode(depth)?;
    let mut values = Vec::new();

    while !reader.is_empty() {
        let (field, wire_type) = reader.read_tag()?;

        match field {
            VALUES => {
                WireReader::expect_wire_type(field, WireType::LengthDelimited, wire_type)?;
                let body = reader.read_message()?;
                values.push(value::decode(body, depth)?);
            }
            _ => reader.skip_field(field, wire_type, depth)?,
        }
    }

    Ok(ListValue { values })
}

impl WireMessage for ListValue {
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
    use crate::{types::Value, wire::varint::encode_varint};

    #[test]
    fn test_empty_list_is_zero_bytes() {
        assert!(ListValue::new().encode_to_vec().unwrap().is_empty());
        assert_eq!(ListValue::decode(&[]), Ok(ListValue::new()));
    }

    #[test]
    fn test_elements_keep_their_order() {
        let message: ListValue = [Value::from(true), Value::null(), Value::from("x")]
            .into_iter()
            .collect();

        let bytes = message.encode_to_vec().unwrap();

        assert_eq!(
            bytes,
            vec![
                0x0A, 0x02, 0x20, 0x01, // true
                0x0A, 0x02, 0x08, 0x00, // null
                0x0A, 0x03, 0x1A, 0x01, b'x', // "x"
            ]
        );
        assert_eq!(ListValue::decode(&bytes), Ok(message));
    }

    #[test]
    fn test_absent_elements_keep_their_slot() {
        let message: ListValue = [Value::from(1.0), Value::absent(), Value::from(3.0)]
            .into_iter()
            .collect();

        let decoded = ListValue::decode(&message.encode_to_vec().unwrap()).unwrap();

        assert_eq!(decoded.len(), 3);
        assert!(decoded.values[1].is_absent());
    }

    #[test]
    fn test_deep_nesting_on_decode_hits_the_limit() {
        // Each level is `values { list_value { ... } }`, built from the inside out.
        let mut bytes: Vec<u8> = Vec::new();
        for _ in 0..50 {
            let mut value = vec![0x32];
            encode_varint(bytes.len() as u64, &mut value);
            value.extend_from_slice(&bytes);

            let mut list = vec![0x0A];
            encode_varint(value.len() as u64, &mut list);
            list.extend_from_slice(&value);
            bytes = list;
        }
        let options = CodecOptions::default().with_recursion_limit(10);

        assert_eq!(
            ListValue::decode_with(&bytes, &options),
            Err(DecodeError::RecursionLimitExceeded(10))
        );
        assert!(ListValue::decode(&bytes).is_ok());
    }
}
