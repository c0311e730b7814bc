//! # Message Codecs
//!
//! Encoders and decoders for the three mutually recursive well-known messages:
//!
//! * [`value`]: the six-way `Value` oneof.
//! * [`structure`]: `Struct`, a map encoded as repeated `FieldsEntry { key, value }` submessages.
//! * [`list`]: `ListValue`, a repeated `Value` field.
//!
//! ## Encoding in two passes
//!
//! Every nested message is preceded by its length. Rather than encoding each submessage into a
//! scratch buffer and copying it into its parent, encoding runs a measuring pass first. The
//! measuring pass records the body length of every nested message in a [`SizeCache`], in the same
//! pre-order in which the writing pass emits the length prefixes, so the writing pass simply
//! consumes the cached lengths one by one. Both passes visit each node once.
//!
//! ## Decoding
//!
//! Every message body is decoded from a [`WireReader`](crate::wire::WireReader) scoped to exactly
//! that body. Unknown fields are skipped, and any error aborts the whole call.
pub mod list;
pub mod structure;
pub mod value;

use crate::{
    error::{DecodeError, EncodeError},
    options::{CodecOptions, Depth},
    wire::WireWriter,
};
use bytes::BufMut;

/// A message that can be written to and read from the protobuf binary format.
///
/// Implemented by [`Value`](crate::Value), [`Struct`](crate::Struct) and
/// [`ListValue`](crate::ListValue). The bytes produced are the message *body*, exactly what a
/// standard protobuf runtime produces for `google.protobuf.Value`, `Struct` or `ListValue`.
pub trait WireMessage: Sized {
    /// Number of bytes [`WireMessage::encode_with`] would write.
    fn encoded_len_with(&self, options: &CodecOptions) -> Result<usize, EncodeError>;

    /// Appends the encoded message to `buf`.
    ///
    /// Nothing is written if an error is returned.
    fn encode_with<B: BufMut>(
        &self,
        buf: &mut B,
        options: &CodecOptions,
    ) -> Result<(), EncodeError>;

    /// Decodes a complete message from `bytes`.
    fn decode_with(bytes: &[u8], options: &CodecOptions) -> Result<Self, DecodeError>;

    fn encoded_len(&self) -> Result<usize, EncodeError> {
        self.encoded_len_with(&CodecOptions::default())
    }

    fn encode<B: BufMut>(&self, buf: &mut B) -> Result<(), EncodeError> {
        self.encode_with(buf, &CodecOptions::default())
    }

    fn encode_to_vec_with(&self, options: &CodecOptions) -> Result<Vec<u8>, EncodeError> {
        let mut buf = Vec::new();
        self.encode_with(&mut buf, options)?;
        Ok(buf)
    }

    fn encode_to_vec(&self) -> Result<Vec<u8>, EncodeError> {
        self.encode_to_vec_with(&CodecOptions::default())
    }

    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::decode_with(bytes, &CodecOptions::default())
    }
}

/// Body lengths of nested messages, stored in the order their prefixes are written.
#[derive(Debug, Default)]
pub(crate) struct SizeCache {
    sizes: Vec<usize>,
    cursor: usize,
}

impl SizeCache {
    /// Reserves the slot for a length prefix that precedes everything measured after it.
    pub(crate) fn reserve(&mut self) -> usize {
        self.sizes.push(0);
        self.sizes.len() - 1
    }

    pub(crate) fn fill(&mut self, slot: usize, len: usize) {
        self.sizes[slot] = len;
    }

    /// Returns the next cached length during the writing pass.
    pub(crate) fn next_len(&mut self) -> usize {
        let len = self.sizes[self.cursor];
        self.cursor += 1;
        len
    }
}

/// Descends one container level while encoding.
pub(crate) fn enter_encode(depth: Depth) -> Result<Depth, EncodeError> {
    depth
        .enter()
        .ok_or(EncodeError::RecursionLimitExceeded(depth.limit()))
}

/// Descends one container level while decoding.
pub(crate) fn enter_decode(depth: Depth) -> Result<Depth, DecodeError> {
    depth
        .enter()
        .ok_or(DecodeError::RecursionLimitExceeded(depth.limit()))
}

/// Shared driver for [`WireMessage::encode_with`]: measure, check capacity, then write.
pub(crate) fn encode_message<B, M, W>(
    buf: &mut B,
    options: &CodecOptions,
    measure: M,
    write: W,
) -> Result<(), EncodeError>
where
    B: BufMut,
    M: FnOnce(&mut SizeCache, Depth) -> Result<usize, EncodeError>,
    W: FnOnce(&mut WireWriter<'_, B>, &mut SizeCache),
{
    let mut cache = SizeCache::default();
    let required = measure(&mut cache, Depth::root(options)).inspect_err(|err| {
        tracing::debug!(error = %err, "encode aborted");
    })?;

    let remaining = buf.remaining_mut();
    if required > remaining {
        return Err(EncodeError::InsufficientCapacity {
            required,
            remaining,
        });
    }

    write(&mut WireWriter::new(buf), &mut cache);
    Ok(())
}

/// Shared driver for [`WireMessage::encoded_len_with`].
pub(crate) fn measure_message<M>(
    options: &CodecOptions,
    measure: M,
) -> Result<usize, EncodeError>
where
    M: FnOnce(&mut SizeCache, Depth) -> Result<usize, EncodeError>,
{
    measure(&mut SizeCache::default(), Depth::root(options))
}

/// Logs decode failures at the public boundary before handing them back.
pub(crate) fn trace_decode<T>(
    result: Result<T, DecodeError>,
    len: usize,
) -> Result<T, DecodeError> {
    result.inspect_err(|err| tracing::debug!(error = %err, len, "decode aborted"))
}
