//! # Protostruct
//!
//! `protostruct` is a schema-less codec for the Protocol Buffers well-known types
//! `google.protobuf.Value`, `Struct` and `ListValue`: JSON-shaped data (null, bool, number,
//! string, nested object, nested array) in a binary encoding that is byte-compatible with any
//! standard protobuf runtime on the other end of a call.
//!
//! ## Key Components
//!
//! * **[`Value`], [`Struct`] & [`ListValue`]:** The in-memory model. The `Value` oneof is the
//!   [`Kind`] enum, and `Value { kind: None }` is *absence*, which is not the same as `null`.
//! * **[`WireMessage`]:** Encode/decode for all three messages, built on the [`wire`] primitives.
//! * **[`native`]:** The wrap/unwrap bridge to `serde_json::Value`.
//! * **[`grpc::WellKnownCodec`]:** A `tonic` codec carrying the messages over gRPC.
//!
//! ## Usage
//!
//! ```rust
//! use protostruct::{Value, native};
//! use serde_json::json;
//!
//! let value = native::wrap(&json!({ "a": 1, "b": [true, null, "x"] }))?;
//!
//! let bytes = protostruct::encode(&value)?;
//! let decoded = protostruct::decode(&bytes)?;
//!
//! assert_eq!(decoded, value);
//! assert_eq!(protostruct::encode(&Value::null())?, vec![0x08, 0x00]);
//! assert!(protostruct::encode(&Value::absent())?.is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Errors
//!
//! Decoding returns a complete value or a [`DecodeError`], never a partial result. Input nested
//! deeper than [`CodecOptions::recursion_limit`] is rejected instead of growing the call stack.
//!
//! ## Re-exports
//!
//! This crate re-exports `prost-types` and `tonic` so that consumers use versions compatible
//! with the conversions in [`convert`] and the codec in [`grpc`].
pub mod codec;
pub mod convert;
pub mod error;
pub mod grpc;
pub mod native;
pub mod options;
pub mod types;
pub mod wire;

pub use codec::WireMessage;
pub use error::{DecodeError, EncodeError, WrapError};
pub use options::CodecOptions;
pub use types::{Kind, ListValue, Struct, Value};

// Re-exports
pub use prost_types;
pub use tonic;

/// Encodes a [`Value`] into a fresh buffer.
pub fn encode(value: &Value) -> Result<Vec<u8>, EncodeError> {
    value.encode_to_vec()
}

/// Decodes a [`Value`] from a complete message body.
pub fn decode(bytes: &[u8]) -> Result<Value, DecodeError> {
    Value::decode(bytes)
}
