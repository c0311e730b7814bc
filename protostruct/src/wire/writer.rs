//! Tag multiplexing and length-delimited framing on top of [`varint`](super::varint).
use super::{WireType, tag, varint};
use bytes::BufMut;

/// Writes wire-format fields into a borrowed buffer.
///
/// The writer never measures anything itself: nested messages are framed with
/// [`WireWriter::write_message_header`] using a length computed beforehand.
pub struct WireWriter<'a, B: BufMut> {
    buf: &'a mut B,
}

impl<'a, B: BufMut> WireWriter<'a, B> {
    pub fn new(buf: &'a mut B) -> Self {
        Self { buf }
    }

    /// Emits `(field_number << 3) | wire_type` as a varint.
    pub fn write_tag(&mut self, field_number: u32, wire_type: WireType) {
        varint::encode_varint(u64::from(tag(field_number, wire_type)), &mut *self.buf);
    }

    pub fn write_varint(&mut self, value: u64) {
        varint::encode_varint(value, &mut *self.buf);
    }

    pub fn write_double(&mut self, value: f64) {
        varint::encode_double(value, &mut *self.buf);
    }

    /// Emits a varint length prefix followed by the raw bytes.
    pub fn write_length_delimited(&mut self, bytes: &[u8]) {
        self.write_varint(bytes.len() as u64);
        self.buf.put_slice(bytes);
    }

    /// Emits the tag and length prefix of a nested message whose body follows.
    pub fn write_message_header(&mut self, field_number: u32, body_len: usize) {
        self.write_tag(field_number, WireType::LengthDelimited);
        self.write_varint(body_len as u64);
    }
}
