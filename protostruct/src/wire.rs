//! # Wire Primitives
//!
//! The subset of the Protocol Buffers binary format needed by the well-known
//! `Struct`/`Value`/`ListValue` types.
//!
//! * [`varint`]: base-128 varints and little-endian `fixed64` doubles.
//! * [`writer`]: tag emission and length-delimited framing over any `bytes::BufMut`.
//! * [`reader`]: a bounded cursor over a byte slice with tag parsing and unknown field skipping.
//!
//! ## References
//!
//! * [Protocol Buffers Encoding](https://protobuf.dev/programming-guides/encoding/)
pub mod reader;
pub mod varint;
pub mod writer;

pub use reader::WireReader;
pub use writer::WireWriter;

use crate::error::DecodeError;

/// The 3-bit framing code carried in the low bits of every tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    StartGroup = 3,
    EndGroup = 4,
    Fixed32 = 5,
}

impl TryFrom<u8> for WireType {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::LengthDelimited),
            3 => Ok(WireType::StartGroup),
            4 => Ok(WireType::EndGroup),
            5 => Ok(WireType::Fixed32),
            other => Err(DecodeError::UnsupportedWireType(other)),
        }
    }
}

/// Largest field number the format allows (2^29 - 1).
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// Builds the tag value `(field_number << 3) | wire_type`.
pub const fn tag(field_number: u32, wire_type: WireType) -> u32 {
    (field_number << 3) | wire_type as u32
}

/// Number of bytes the tag for `field_number` occupies on the wire.
pub const fn tag_len(field_number: u32) -> usize {
    varint::encoded_len(tag(field_number, WireType::Varint) as u64)
}

/// Encoded size of a length-delimited field: tag, length prefix and payload.
pub const fn length_delimited_len(field_number: u32, payload_len: usize) -> usize {
    tag_len(field_number) + varint::encoded_len(payload_len as u64) + payload_len
}
