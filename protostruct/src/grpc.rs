//! # gRPC Codec Adapter
//!
//! This module implements `tonic::codec::Codec` so that `tonic` can transport [`Value`],
//! [`Struct`] and [`ListValue`] directly as request and response messages, the same way a
//! generated client would transport `google.protobuf.Value`.
//!
//! ## How it works
//!
//! 1. **Encoder**: measures the message and writes it straight into the gRPC frame buffer.
//! 2. **Decoder**: takes the bytes of one frame and decodes them with the [`CodecOptions`]
//!    the codec was built with.
//!
//! Connecting, retrying and everything else about the call stays with `tonic`.
//!
//! [`Value`]: crate::Value
//! [`Struct`]: crate::Struct
//! [`ListValue`]: crate::ListValue
use crate::{codec::WireMessage, options::CodecOptions};
use bytes::Buf;
use std::marker::PhantomData;
use tonic::{
    Status,
    codec::{Codec, DecodeBuf, Decoder, EncodeBuf, Encoder},
};

/// A `tonic` codec for one of the well-known dynamic messages.
///
/// The same message type is used for both directions, e.g. `WellKnownCodec<Struct>` for a
/// method declared as `rpc Call(google.protobuf.Struct) returns (google.protobuf.Struct)`.
#[derive(Debug)]
pub struct WellKnownCodec<M> {
    options: CodecOptions,
    _message: PhantomData<fn() -> M>,
}

impl<M> WellKnownCodec<M> {
    pub fn new(options: CodecOptions) -> Self {
        Self {
            options,
            _message: PhantomData,
        }
    }
}

impl<M> Default for WellKnownCodec<M> {
    fn default() -> Self {
        Self::new(CodecOptions::default())
    }
}

impl<M> Codec for WellKnownCodec<M>
where
    M: WireMessage + Send + 'static,
{
    type Encode = M;
    type Decode = M;

    type Encoder = WellKnownEncoder<M>;
    type Decoder = WellKnownDecoder<M>;

    fn encoder(&mut self) -> Self::Encoder {
        WellKnownEncoder(self.options, PhantomData)
    }

    fn decoder(&mut self) -> Self::Decoder {
        WellKnownDecoder(self.options, PhantomData)
    }
}

/// Responsible for encoding a message into the outgoing frame.
pub struct WellKnownEncoder<M>(CodecOptions, PhantomData<fn() -> M>);

impl<M: WireMessage> Encoder for WellKnownEncoder<M> {
    type Item = M;
    type Error = Status;

    fn encode(&mut self, item: Self::Item, dst: &mut EncodeBuf<'_>) -> Result<(), Self::Error> {
        item.encode_with(dst, &self.0)
            .map_err(|e| Status::invalid_argument(format!("Failed to encode message: {}", e)))
    }
}

/// Responsible for decoding one incoming frame into a message.
pub struct WellKnownDecoder<M>(CodecOptions, PhantomData<fn() -> M>);

impl<M: WireMessage> Decoder for WellKnownDecoder<M> {
    type Item = M;
    type Error = Status;

    fn decode(&mut self, src: &mut DecodeBuf<'_>) -> Result<Option<Self::Item>, Self::Error> {
        let bytes = src.copy_to_bytes(src.remaining());

        let message = M::decode_with(&bytes, &self.0)
            .map_err(|e| Status::internal(format!("Failed to decode Protobuf bytes: {}", e)))?;

        Ok(Some(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ListValue, Struct, Value};

    fn build<C: Codec>(mut codec: C) {
        let _encoder = codec.encoder();
        let _decoder = codec.decoder();
    }

    #[test]
    fn test_codec_exists_for_each_message() {
        build(WellKnownCodec::<Value>::default());
        build(WellKnownCodec::<Struct>::default());
        build(WellKnownCodec::<ListValue>::new(
            CodecOptions::default().with_recursion_limit(8),
        ));
    }
}
