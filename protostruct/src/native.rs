//! # Native Bridge
//!
//! Converts between `serde_json::Value`, the native dynamic value of the Rust ecosystem, and
//! the wire model in [`crate::types`]. This is the layer application code talks to: `wrap` a
//! native value before encoding, `unwrap` it after decoding.
//!
//! | Native                  | Wire                |
//! |-------------------------|---------------------|
//! | missing (`None`)        | absent `Value`      |
//! | `null`                  | `null_value`        |
//! | bool                    | `bool_value`        |
//! | number                  | `number_value`      |
//! | string                  | `string_value`      |
//! | array                   | `list_value`        |
//! | object                  | `struct_value`      |
//!
//! Numbers travel as IEEE-754 doubles. On the way back, integral doubles within the range a
//! double represents exactly come out as JSON integers, so `json!(1)` survives a round trip.
//! Non-finite doubles have no JSON form and come out as `null`.
//!
//! Every `wrap_*` entry point has a `*_with` form taking [`CodecOptions`], whose recursion
//! limit bounds how deep the wrapped value may nest.
//!
//! ## Example
//!
//! ```rust
//! use protostruct::{WireMessage, native};
//! use serde_json::json;
//!
//! let value = native::wrap(&json!({ "a": 1, "b": [true, null, "x"] }))?;
//! let bytes = value.encode_to_vec()?;
//!
//! let decoded = protostruct::Value::decode(&bytes)?;
//! assert_eq!(native::unwrap(&decoded), Some(json!({ "a": 1, "b": [true, null, "x"] })));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
use crate::{
    error::WrapError,
    options::{CodecOptions, Depth},
    types::{Kind, ListValue, Struct, Value},
};
use serde::Serialize;
use serde_json::{Map, Number};
use serializer::ValueSerializer;

mod serializer;

/// Largest integer a double holds exactly (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Wraps a native JSON value.
pub fn wrap(native: &serde_json::Value) -> Result<Value, WrapError> {
    wrap_with(native, &CodecOptions::default())
}

pub fn wrap_with(native: &serde_json::Value, options: &CodecOptions) -> Result<Value, WrapError> {
    trace_wrap(wrap_value(native, Depth::root(options)))
}

/// Wraps a possibly missing native value; `None` becomes an absent [`Value`].
pub fn wrap_optional(native: Option<&serde_json::Value>) -> Result<Value, WrapError> {
    wrap_optional_with(native, &CodecOptions::default())
}

pub fn wrap_optional_with(
    native: Option<&serde_json::Value>,
    options: &CodecOptions,
) -> Result<Value, WrapError> {
    native.map_or_else(|| Ok(Value::absent()), |native| wrap_with(native, options))
}

/// Wraps any serializable value.
///
/// The value is serialized straight into a [`Value`], so non-finite floats stay numbers.
/// Enums follow the externally tagged layout of `serde_json`, `None` becomes `null`, and map
/// keys must serialize as strings, booleans or finite numbers. Anything else fails with
/// [`WrapError::UnsupportedValueType`].
pub fn wrap_serialize<T: Serialize + ?Sized>(native: &T) -> Result<Value, WrapError> {
    wrap_serialize_with(native, &CodecOptions::default())
}

pub fn wrap_serialize_with<T: Serialize + ?Sized>(
    native: &T,
    options: &CodecOptions,
) -> Result<Value, WrapError> {
    trace_wrap(native.serialize(ValueSerializer::new(Depth::root(options))))
}

/// Wraps a native object into a [`Struct`]; any other shape is rejected.
pub fn wrap_struct(native: &serde_json::Value) -> Result<Struct, WrapError> {
    wrap_struct_with(native, &CodecOptions::default())
}

pub fn wrap_struct_with(
    native: &serde_json::Value,
    options: &CodecOptions,
) -> Result<Struct, WrapError> {
    let result = match native {
        serde_json::Value::Object(map) => wrap_map(map, Depth::root(options)),
        other => Err(WrapError::UnsupportedValueType(format!(
            "expected an object, found {}",
            shape_name(other)
        ))),
    };

    trace_wrap(result)
}

/// Wraps a native sequence into a [`ListValue`].
pub fn wrap_list(native: &[serde_json::Value]) -> Result<ListValue, WrapError> {
    wrap_list_with(native, &CodecOptions::default())
}

pub fn wrap_list_with(
    native: &[serde_json::Value],
    options: &CodecOptions,
) -> Result<ListValue, WrapError> {
    trace_wrap(wrap_elements(native, Depth::root(options)))
}

/// Unwraps a [`Value`] into its native form, or `None` if it is absent.
///
/// Unwrapping follows the nesting of `value` as it is. Values that came out of a decode or a
/// wrap are already bounded by the recursion limit of that call; a value assembled by hand is
/// only bounded by how it was built.
pub fn unwrap(value: &Value) -> Option<serde_json::Value> {
    value.kind.as_ref().map(unwrap_kind)
}

/// Unwraps a [`Struct`] into a native object, leaving out absent entries.
pub fn unwrap_struct(message: &Struct) -> Map<String, serde_json::Value> {
    message
        .fields
        .iter()
        .filter_map(|(key, value)| unwrap(value).map(|native| (key.clone(), native)))
        .collect()
}

/// Unwraps a [`ListValue`] into a native sequence.
///
/// A sequence has no hole to leave, so absent elements come out as `null`.
pub fn unwrap_list(message: &ListValue) -> Vec<serde_json::Value> {
    message
        .values
        .iter()
        .map(|value| unwrap(value).unwrap_or(serde_json::Value::Null))
        .collect()
}

fn trace_wrap<T>(result: Result<T, WrapError>) -> Result<T, WrapError> {
    result.inspect_err(|err| tracing::debug!(error = %err, "wrap aborted"))
}

fn wrap_value(native: &serde_json::Value, depth: Depth) -> Result<Value, WrapError> {
    let kind = match native {
        serde_json::Value::Null => Kind::Null,
        serde_json::Value::Bool(b) => Kind::Bool(*b),
        serde_json::Value::Number(n) => Kind::Number(n.as_f64().ok_or_else(|| {
            WrapError::UnsupportedValueType(format!("number {n} is not representable as a double"))
        })?),
        serde_json::Value::String(s) => Kind::String(s.clone()),
        serde_json::Value::Array(elements) => Kind::List(wrap_elements(elements, depth)?),
        serde_json::Value::Object(map) => Kind::Struct(wrap_map(map, depth)?),
    };

    Ok(kind.into())
}

fn wrap_map(map: &Map<String, serde_json::Value>, depth: Depth) -> Result<Struct, WrapError> {
    let depth = enter_wrap(depth)?;

    let fields = map
        .iter()
        .map(|(key, native)| Ok((key.clone(), wrap_value(native, depth)?)))
        .collect::<Result<_, WrapError>>()?;

    Ok(Struct { fields })
}

fn wrap_elements(elements: &[serde_json::Value], depth: Depth) -> Result<ListValue, WrapError> {
    let depth = enter_wrap(depth)?;

    let values = elements
        .iter()
        .map(|native| wrap_value(native, depth))
        .collect::<Result<_, _>>()?;

    Ok(ListValue { values })
}

fn enter_wrap(depth: Depth) -> Result<Depth, WrapError> {
    depth
        .enter()
        .ok_or(WrapError::RecursionLimitExceeded(depth.limit()))
}

fn unwrap_kind(kind: &Kind) -> serde_json::Value {
    match kind {
        Kind::Null => serde_json::Value::Null,
        Kind::Number(n) => number_to_json(*n),
        Kind::String(s) => serde_json::Value::String(s.clone()),
        Kind::Bool(b) => serde_json::Value::Bool(*b),
        Kind::Struct(s) => serde_json::Value::Object(unwrap_struct(s)),
        Kind::List(l) => serde_json::Value::Array(unwrap_list(l)),
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    let negative_zero = n == 0.0 && n.is_sign_negative();

    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER && !negative_zero {
        return serde_json::Value::from(n as i64);
    }

    Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

fn shape_name(native: &serde_json::Value) -> &'static str {
    match native {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
