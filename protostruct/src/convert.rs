//! # prost-types Interop
//!
//! Lossless conversions between this crate's model and the generated `prost-types`
//! definitions of the same well-known types, for code that already holds a
//! `prost_types::Struct` from a typed message.
//!
//! The conversions recurse through the whole value without a depth limit. A value decoded by
//! either runtime is already bounded by that runtime's recursion limit.
use crate::types::{Kind, ListValue, Struct, Value};
use prost_types::{NullValue, value::Kind as ProstKind};

impl From<prost_types::Value> for Value {
    fn from(value: prost_types::Value) -> Self {
        let kind = value.kind.map(|kind| match kind {
            // Unknown enum numbers are still the null variant.
            ProstKind::NullValue(_) => Kind::Null,
            ProstKind::NumberValue(n) => Kind::Number(n),
            ProstKind::StringValue(s) => Kind::String(s),
            ProstKind::BoolValue(b) => Kind::Bool(b),
            ProstKind::StructValue(s) => Kind::Struct(s.into()),
            ProstKind::ListValue(l) => Kind::List(l.into()),
        });

        Self { kind }
    }
}

impl From<Value> for prost_types::Value {
    fn from(value: Value) -> Self {
        let kind = value.kind.map(|kind| match kind {
            Kind::Null => ProstKind::NullValue(NullValue::NullValue as i32),
            Kind::Number(n) => ProstKind::NumberValue(n),
            Kind::String(s) => ProstKind::StringValue(s),
            Kind::Bool(b) => ProstKind::BoolValue(b),
            Kind::Struct(s) => ProstKind::StructValue(s.into()),
            Kind::List(l) => ProstKind::ListValue(l.into()),
        });

        Self { kind }
    }
}

impl From<prost_types::Struct> for Struct {
    fn from(message: prost_types::Struct) -> Self {
        message
            .fields
            .into_iter()
            .map(|(key, value)| (key, Value::from(value)))
            .collect()
    }
}

impl From<Struct> for prost_types::Struct {
    fn from(message: Struct) -> Self {
        Self {
            fields: message
                .fields
                .into_iter()
                .map(|(key, value)| (key, value.into()))
                .collect(),
        }
    }
}

impl From<prost_types::ListValue> for ListValue {
    fn from(message: prost_types::ListValue) -> Self {
        message.values.into_iter().map(Value::from).collect()
    }
}

impl From<ListValue> for prost_types::ListValue {
    fn from(message: ListValue) -> Self {
        Self {
            values: message.values.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_and_absent_stay_distinct() {
        let null: prost_types::Value = Value::null().into();
        let absent: prost_types::Value = Value::absent().into();

        assert_eq!(null.kind, Some(ProstKind::NullValue(0)));
        assert_eq!(absent.kind, None);
        assert_eq!(Value::from(null), Value::null());
        assert_eq!(Value::from(absent), Value::absent());
    }

    #[test]
    fn test_nested_conversion_is_lossless() {
        let original = Value::from(Struct::from_iter([
            ("n", Value::from(4.5)),
            (
                "l",
                ListValue::from_iter([Value::from("a"), Value::from(false), Value::absent()])
                    .into(),
            ),
        ]));

        let prost: prost_types::Value = original.clone().into();

        assert_eq!(Value::from(prost), original);
    }
}
