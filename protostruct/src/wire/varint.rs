//! Base-128 varints and `fixed64` doubles.
use crate::error::DecodeError;
use bytes::BufMut;

/// A `u64` never needs more than ten 7-bit groups.
pub const MAX_VARINT_LEN: usize = 10;

/// Appends `value` as a varint: 7 payload bits per byte, with the high bit set on all but
/// the last byte.
pub fn encode_varint(mut value: u64, buf: &mut impl BufMut) {
    while value >= 0x80 {
        buf.put_u8((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

/// Decodes a varint from the front of `bytes`, returning the value and the number of bytes consumed.
///
/// Fails with [`DecodeError::Truncated`] when the input ends on a continuation byte and with
/// [`DecodeError::MalformedVarint`] when the varint runs past ten bytes or overflows 64 bits.
pub fn decode_varint(bytes: &[u8]) -> Result<(u64, usize), DecodeError> {
    let mut value = 0u64;

    for index in 0..MAX_VARINT_LEN {
        let Some(&byte) = bytes.get(index) else {
            return Err(DecodeError::Truncated {
                needed: 1,
                remaining: 0,
            });
        };

        // The tenth byte only has room for the single remaining bit of a u64.
        if index == MAX_VARINT_LEN - 1 && byte > 0x01 {
            return Err(DecodeError::MalformedVarint);
        }

        value |= u64::from(byte & 0x7F) << (7 * index);

        if byte < 0x80 {
            return Ok((value, index + 1));
        }
    }

    Err(DecodeError::MalformedVarint)
}

/// Number of bytes [`encode_varint`] writes for `value`.
pub const fn encoded_len(value: u64) -> usize {
    // ((bits - 1) / 7) + 1, written so that zero still takes one byte.
    let bits = 64 - (value | 1).leading_zeros() as usize;
    (bits + 6) / 7
}

/// Appends an IEEE-754 double as 8 little-endian bytes.
pub fn encode_double(value: f64, buf: &mut impl BufMut) {
    buf.put_f64_le(value);
}

/// Reads an IEEE-754 double from exactly 8 little-endian bytes.
pub fn decode_double(bytes: [u8; 8]) -> f64 {
    f64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(value: u64) -> Vec<u8> {
        let mut buf = Vec::new();
        encode_varint(value, &mut buf);
        buf
    }

    #[test]
    fn test_known_encodings() {
        assert_eq!(encoded(0), vec![0x00]);
        assert_eq!(encoded(1), vec![0x01]);
        assert_eq!(encoded(127), vec![0x7F]);
        assert_eq!(encoded(128), vec![0x80, 0x01]);
        assert_eq!(encoded(300), vec![0xAC, 0x02]);
        assert_eq!(
            encoded(u64::MAX),
            vec![0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]
        );
    }

    #[test]
    fn test_encoded_len_matches_output() {
        for value in [0, 1, 127, 128, 16_383, 16_384, u32::MAX as u64, u64::MAX] {
            assert_eq!(encoded_len(value), encoded(value).len(), "value {value}");
        }
    }

    #[test]
    fn test_decode_reports_consumed_bytes() {
        assert_eq!(decode_varint(&[0xAC, 0x02, 0xFF]), Ok((300, 2)));
        assert_eq!(decode_varint(&encoded(u64::MAX)), Ok((u64::MAX, 10)));
    }

    #[test]
    fn test_decode_eleven_bytes_is_malformed() {
        let bytes = [0x80; 11];
        assert_eq!(decode_varint(&bytes), Err(DecodeError::MalformedVarint));
    }

    #[test]
    fn test_decode_overflowing_tenth_byte_is_malformed() {
        let mut bytes = vec![0xFF; 9];
        bytes.push(0x02);
        assert_eq!(decode_varint(&bytes), Err(DecodeError::MalformedVarint));
    }

    #[test]
    fn test_decode_cut_on_continuation_is_truncated() {
        assert!(matches!(
            decode_varint(&[0x80, 0x80]),
            Err(DecodeError::Truncated { .. })
        ));
        assert!(matches!(
            decode_varint(&[]),
            Err(DecodeError::Truncated { .. })
        ));
    }

    #[test]
    fn test_double_is_little_endian() {
        let mut buf = Vec::new();
        encode_double(1.0, &mut buf);
        assert_eq!(buf, vec![0, 0, 0, 0, 0, 0, 0xF0, 0x3F]);
        assert_eq!(decode_double([0, 0, 0, 0, 0, 0, 0xF0, 0x3F]), 1.0);
    }
}
