//! A bounded cursor over wire bytes.
//!
//! Nested messages are read by slicing: [`WireReader::read_message`] validates the length prefix
//! against the bytes left in the current frame and hands back a reader that can only see the
//! submessage body. A decode loop therefore terminates exactly when its reader
//! [`is_empty`](WireReader::is_empty), and any field that runs past the frame is reported as
//! [`DecodeError::Truncated`].
use super::{MAX_FIELD_NUMBER, WireType, varint};
use crate::{error::DecodeError, options::Depth};

#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes left before the end of this frame.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_varint(&mut self) -> Result<u64, DecodeError> {
        let (value, consumed) = varint::decode_varint(&self.buf[self.pos..])?;
        self.pos += consumed;
        Ok(value)
    }

    /// Reads a tag and splits it into field number and wire type.
    pub fn read_tag(&mut self) -> Result<(u32, WireType), DecodeError> {
        let raw = self.read_varint()?;
        let field_number = raw >> 3;

        let in_range = (1..=u64::from(MAX_FIELD_NUMBER)).contains(&field_number);
        if raw > u64::from(u32::MAX) || !in_range {
            return Err(DecodeError::InvalidTag(raw));
        }

        let wire_type = WireType::try_from((raw & 0x07) as u8)?;
        Ok((field_number as u32, wire_type))
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(DecodeError::Truncated {
                needed: len,
                remaining,
            });
        }

        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    pub fn read_double(&mut self) -> Result<f64, DecodeError> {
        let bytes = self.read_bytes(8)?;
        let mut array = [0u8; 8];
        array.copy_from_slice(bytes);
        Ok(varint::decode_double(array))
    }

    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        Ok(self.read_varint()? != 0)
    }

    /// Reads a varint length prefix and the bytes it covers.
    pub fn read_length_delimited(&mut self) -> Result<&'a [u8], DecodeError> {
        let len = self.read_varint()?;
        // A length that does not even fit in usize can never be satisfied.
        let len = usize::try_from(len).unwrap_or(usize::MAX);
        self.read_bytes(len)
    }

    pub fn read_string(&mut self) -> Result<&'a str, DecodeError> {
        let bytes = self.read_length_delimited()?;
        std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)
    }

    /// Reads a length-delimited submessage and returns a reader scoped to its body.
    pub fn read_message(&mut self) -> Result<WireReader<'a>, DecodeError> {
        self.read_length_delimited().map(WireReader::new)
    }

    /// Discards the payload of a field this decoder does not recognise.
    ///
    /// Groups are skipped up to their matching end-group tag; every nested group
    /// consumes one level of `depth`.
    pub(crate) fn skip_field(
        &mut self,
        field_number: u32,
        wire_type: WireType,
        depth: Depth,
    ) -> Result<(), DecodeError> {
        tracing::trace!(field_number, ?wire_type, "skipping unknown field");

        match wire_type {
            WireType::Varint => self.read_varint().map(|_| ()),
            WireType::Fixed64 => self.read_bytes(8).map(|_| ()),
            WireType::LengthDelimited => self.read_length_delimited().map(|_| ()),
            WireType::Fixed32 => self.read_bytes(4).map(|_| ()),
            WireType::StartGroup => self.skip_group(field_number, depth),
            WireType::EndGroup => Err(stray_end_group()),
        }
    }

    fn skip_group(&mut self, group_number: u32, depth: Depth) -> Result<(), DecodeError> {
        let depth = depth
            .enter()
            .ok_or(DecodeError::RecursionLimitExceeded(depth.limit()))?;

        loop {
            if self.is_empty() {
                return Err(DecodeError::Truncated {
                    needed: 1,
                    remaining: 0,
                });
            }

            match self.read_tag()? {
                (field_number, WireType::EndGroup) if field_number == group_number => {
                    return Ok(());
                }
                (_, WireType::EndGroup) => return Err(stray_end_group()),
                (field_number, wire_type) => self.skip_field(field_number, wire_type, depth)?,
            }
        }
    }

    /// Fails unless a recognised field arrived with the wire type its definition requires.
    pub fn expect_wire_type(
        field: u32,
        expected: WireType,
        actual: WireType,
    ) -> Result<(), DecodeError> {
        if expected == actual {
            Ok(())
        } else {
            Err(DecodeError::WireTypeMismatch {
                field,
                expected,
                actual,
            })
        }
    }
}

fn stray_end_group() -> DecodeError {
    DecodeError::UnsupportedWireType(WireType::EndGroup as u8)
}
