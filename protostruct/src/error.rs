//! # Codec Errors
//!
//! Every public operation returns one of the error enums below. All of them are terminal
//! for the call that produced them: a decode either yields a complete value or an error,
//! never a partially populated one.
use crate::wire::WireType;

/// Errors that can occur while decoding wire bytes into a [`Value`](crate::Value),
/// [`Struct`](crate::Struct) or [`ListValue`](crate::ListValue).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Malformed varint: more than 10 bytes or overflowing 64 bits")]
    MalformedVarint,

    #[error("Truncated message: needed {needed} more bytes but only {remaining} remain")]
    Truncated { needed: usize, remaining: usize },

    #[error("Unsupported wire type {0}")]
    UnsupportedWireType(u8),

    #[error("Field {field} expects wire type {expected:?} but found {actual:?}")]
    WireTypeMismatch {
        field: u32,
        expected: WireType,
        actual: WireType,
    },

    #[error("Invalid tag value: {0}")]
    InvalidTag(u64),

    #[error("String field is not valid UTF-8")]
    InvalidUtf8,

    #[error("Nesting exceeds the recursion limit of {0}")]
    RecursionLimitExceeded(usize),
}

/// Errors that can occur while encoding a value into a byte buffer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("Nesting exceeds the recursion limit of {0}")]
    RecursionLimitExceeded(usize),

    #[error("Buffer too small: {required} bytes required but only {remaining} available")]
    InsufficientCapacity { required: usize, remaining: usize },
}

/// Errors that can occur when bridging a native value into the wire model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WrapError {
    #[error("Unsupported value type: {0}")]
    UnsupportedValueType(String),

    #[error("Nesting exceeds the recursion limit of {0}")]
    RecursionLimitExceeded(usize),
}

impl serde::ser::Error for WrapError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Self::UnsupportedValueType(msg.to_string())
    }
}
