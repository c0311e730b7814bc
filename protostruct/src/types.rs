//! # Dynamic Value Model
//!
//! In-memory representation of the `google.protobuf` well-known types `Value`, `Struct`
//! and `ListValue`.
//!
//! The wire `Value` is a oneof of six fields. Here it is a [`Kind`] enum, so "more than one
//! variant set" cannot be expressed, wrapped in an `Option` so that *absence* (no field set)
//! stays distinct from an explicit [`Kind::Null`].
use std::collections::BTreeMap;

/// The populated variant of a [`Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    /// `null_value` (field 1).
    Null,
    /// `number_value` (field 2).
    Number(f64),
    /// `string_value` (field 3).
    String(String),
    /// `bool_value` (field 4).
    Bool(bool),
    /// `struct_value` (field 5).
    Struct(Struct),
    /// `list_value` (field 6).
    List(ListValue),
}

/// A dynamically typed value, or the absence of one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Value {
    /// `None` when no oneof field is set.
    pub kind: Option<Kind>,
}

impl Value {
    pub fn null() -> Self {
        Kind::Null.into()
    }

    /// A value with no variant set. Encodes to zero bytes.
    pub fn absent() -> Self {
        Self { kind: None }
    }

    pub fn is_absent(&self) -> bool {
        self.kind.is_none()
    }

    pub fn is_null(&self) -> bool {
        matches!(self.kind, Some(Kind::Null))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.kind {
            Some(Kind::Number(n)) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            Some(Kind::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.kind {
            Some(Kind::Bool(b)) => Some(b),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&Struct> {
        match &self.kind {
            Some(Kind::Struct(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListValue> {
        match &self.kind {
            Some(Kind::List(l)) => Some(l),
            _ => None,
        }
    }
}

impl From<Kind> for Value {
    fn from(kind: Kind) -> Self {
        Self { kind: Some(kind) }
    }
}

impl From<Option<Kind>> for Value {
    fn from(kind: Option<Kind>) -> Self {
        Self { kind }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Kind::Number(value).into()
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Kind::Bool(value).into()
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Kind::String(value).into()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Kind::String(value.to_string()).into()
    }
}

impl From<Struct> for Value {
    fn from(value: Struct) -> Self {
        Kind::Struct(value).into()
    }
}

impl From<ListValue> for Value {
    fn from(value: ListValue) -> Self {
        Kind::List(value).into()
    }
}

/// A mapping from string keys to dynamically typed values.
///
/// Backed by a `BTreeMap`, so entries are always encoded in key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Struct {
    pub fields: BTreeMap<String, Value>,
}

impl Struct {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` under `key`, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Struct {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// An ordered sequence of dynamically typed values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListValue {
    pub values: Vec<Value>,
}

impl ListValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.values.push(value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<V: Into<Value>> FromIterator<V> for ListValue {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(Into::into).collect(),
        }
    }
}
