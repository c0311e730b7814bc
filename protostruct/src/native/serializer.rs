//! A `serde::Serializer` that produces a [`Value`] directly.
//!
//! Going through `serde_json::Value` first would turn NaN and the infinities into `null`,
//! so [`wrap_serialize`](super::wrap_serialize) builds the wire model itself. The layout
//! otherwise matches `serde_json::to_value`: sequences and tuples become lists, structs and
//! maps become structs, and enum variants with data are tagged as `{ "Variant": data }`.
use super::{enter_wrap, number_to_json};
use crate::{
    error::WrapError,
    options::Depth,
    types::{Kind, ListValue, Struct, Value},
};
use serde::ser::{self, Serialize};
use std::collections::BTreeMap;

pub(super) struct ValueSerializer {
    depth: Depth,
}

impl ValueSerializer {
    pub(super) fn new(depth: Depth) -> Self {
        Self { depth }
    }
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = WrapError;

    type SerializeSeq = ListBuilder;
    type SerializeTuple = ListBuilder;
    type SerializeTupleStruct = ListBuilder;
    type SerializeTupleVariant = VariantBuilder<ListBuilder>;
    type SerializeMap = StructBuilder;
    type SerializeStruct = StructBuilder;
    type SerializeStructVariant = VariantBuilder<StructBuilder>;

    fn serialize_bool(self, v: bool) -> Result<Value, WrapError> {
        Ok(Value::from(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, WrapError> {
        Ok(Value::from(f64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, WrapError> {
        Ok(Value::from(f64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, WrapError> {
        Ok(Value::from(f64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<Value, WrapError> {
        Ok(Value::from(v as f64))
    }

    fn serialize_i128(self, v: i128) -> Result<Value, WrapError> {
        Ok(Value::from(v as f64))
    }

    fn serialize_u8(self, v: u8) -> Result<Value, WrapError> {
        Ok(Value::from(f64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<Value, WrapError> {
        Ok(Value::from(f64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<Value, WrapError> {
        Ok(Value::from(f64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<Value, WrapError> {
        Ok(Value::from(v as f64))
    }

    fn serialize_u128(self, v: u128) -> Result<Value, WrapError> {
        Ok(Value::from(v as f64))
    }

    fn serialize_f32(self, v: f32) -> Result<Value, WrapError> {
        Ok(Value::from(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, WrapError> {
        Ok(Value::from(v))
    }

    fn serialize_char(self, v: char) -> Result<Value, WrapError> {
        Ok(Value::from(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value, WrapError> {
        Ok(Value::from(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, WrapError> {
        let mut list = ListBuilder::new(self.depth, Some(v.len()))?;
        for byte in v {
            list.push(byte)?;
        }
        Ok(list.finish().into())
    }

    fn serialize_none(self) -> Result<Value, WrapError> {
        Ok(Value::null())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Value, WrapError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, WrapError> {
        Ok(Value::null())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, WrapError> {
        Ok(Value::null())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, WrapError> {
        Ok(Value::from(variant))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value, WrapError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, WrapError> {
        let depth = enter_wrap(self.depth)?;
        Ok(tagged(variant, value.serialize(ValueSerializer::new(depth))?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<ListBuilder, WrapError> {
        ListBuilder::new(self.depth, len)
    }

    fn serialize_tuple(self, len: usize) -> Result<ListBuilder, WrapError> {
        ListBuilder::new(self.depth, Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<ListBuilder, WrapError> {
        ListBuilder::new(self.depth, Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantBuilder<ListBuilder>, WrapError> {
        let depth = enter_wrap(self.depth)?;
        Ok(VariantBuilder {
            variant,
            inner: ListBuilder::new(depth, Some(len))?,
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<StructBuilder, WrapError> {
        StructBuilder::new(self.depth)
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<StructBuilder, WrapError> {
        StructBuilder::new(self.depth)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<VariantBuilder<StructBuilder>, WrapError> {
        let depth = enter_wrap(self.depth)?;
        Ok(VariantBuilder {
            variant,
            inner: StructBuilder::new(depth)?,
        })
    }
}

/// Collects the elements of a sequence, tuple or tuple struct.
pub(super) struct ListBuilder {
    depth: Depth,
    values: Vec<Value>,
}

impl ListBuilder {
    fn new(depth: Depth, len: Option<usize>) -> Result<Self, WrapError> {
        Ok(Self {
            depth: enter_wrap(depth)?,
            values: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), WrapError> {
        self.values
            .push(value.serialize(ValueSerializer::new(self.depth))?);
        Ok(())
    }

    fn finish(self) -> ListValue {
        ListValue {
            values: self.values,
        }
    }
}

impl ser::SerializeSeq for ListBuilder {
    type Ok = Value;
    type Error = WrapError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), WrapError> {
        self.push(value)
    }

    fn end(self) -> Result<Value, WrapError> {
        Ok(self.finish().into())
    }
}

impl ser::SerializeTuple for ListBuilder {
    type Ok = Value;
    type Error = WrapError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), WrapError> {
        self.push(value)
    }

    fn end(self) -> Result<Value, WrapError> {
        Ok(self.finish().into())
    }
}

impl ser::SerializeTupleStruct for ListBuilder {
    type Ok = Value;
    type Error = WrapError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), WrapError> {
        self.push(value)
    }

    fn end(self) -> Result<Value, WrapError> {
        Ok(self.finish().into())
    }
}

/// Collects the entries of a map or the fields of a struct.
pub(super) struct StructBuilder {
    depth: Depth,
    fields: BTreeMap<String, Value>,
    pending_key: Option<String>,
}

impl StructBuilder {
    fn new(depth: Depth) -> Result<Self, WrapError> {
        Ok(Self {
            depth: enter_wrap(depth)?,
            fields: BTreeMap::new(),
            pending_key: None,
        })
    }

    fn insert<T: ?Sized + Serialize>(&mut self, key: String, value: &T) -> Result<(), WrapError> {
        let value = value.serialize(ValueSerializer::new(self.depth))?;
        self.fields.insert(key, value);
        Ok(())
    }

    fn finish(self) -> Struct {
        Struct {
            fields: self.fields,
        }
    }
}

impl ser::SerializeMap for StructBuilder {
    type Ok = Value;
    type Error = WrapError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), WrapError> {
        let key = key.serialize(ValueSerializer::new(self.depth))?;
        self.pending_key = Some(map_key(key)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), WrapError> {
        let key = self.pending_key.take().ok_or_else(|| {
            WrapError::UnsupportedValueType("map value serialized without a key".to_string())
        })?;
        self.insert(key, value)
    }

    fn end(self) -> Result<Value, WrapError> {
        Ok(self.finish().into())
    }
}

impl ser::SerializeStruct for StructBuilder {
    type Ok = Value;
    type Error = WrapError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), WrapError> {
        self.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Value, WrapError> {
        Ok(self.finish().into())
    }
}

/// Builds the payload of a tuple or struct variant, then tags it with the variant name.
pub(super) struct VariantBuilder<B> {
    variant: &'static str,
    inner: B,
}

impl ser::SerializeTupleVariant for VariantBuilder<ListBuilder> {
    type Ok = Value;
    type Error = WrapError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), WrapError> {
        self.inner.push(value)
    }

    fn end(self) -> Result<Value, WrapError> {
        Ok(tagged(self.variant, self.inner.finish().into()))
    }
}

impl ser::SerializeStructVariant for VariantBuilder<StructBuilder> {
    type Ok = Value;
    type Error = WrapError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), WrapError> {
        self.inner.insert(key.to_string(), value)
    }

    fn end(self) -> Result<Value, WrapError> {
        Ok(tagged(self.variant, self.inner.finish().into()))
    }
}

fn tagged(variant: &'static str, payload: Value) -> Value {
    Struct::from_iter([(variant, payload)]).into()
}

fn map_key(key: Value) -> Result<String, WrapError> {
    match key.kind {
        Some(Kind::String(s)) => Ok(s),
        Some(Kind::Bool(b)) => Ok(b.to_string()),
        Some(Kind::Number(n)) if n.is_finite() => Ok(number_to_json(n).to_string()),
        _ => Err(WrapError::UnsupportedValueType(
            "map keys must be strings, booleans or finite numbers".to_string(),
        )),
    }
}
