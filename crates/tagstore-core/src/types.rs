//! Tag tree data model: tagged values, compounds and lists.
//!
//! A tag tree is a strict tree: a [`Compound`] owns its named children, a
//! [`List`] owns its positional children, and every leaf is one of seven
//! scalar variants. Numeric widths are distinct variants and never convert
//! into one another implicitly, so `Byte(127)` and `Int(127)` are different
//! values.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::TagStoreError;
use crate::path;

/// The closed set of discriminators a tree node can carry.
///
/// The string forms returned by [`TagKind::as_str`] are the persisted
/// discriminator values and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Compound,
    List,
    String,
    Int,
    Long,
    Short,
    Byte,
    Float,
    Double,
}

impl TagKind {
    pub const ALL: [TagKind; 9] = [
        TagKind::Compound,
        TagKind::List,
        TagKind::String,
        TagKind::Int,
        TagKind::Long,
        TagKind::Short,
        TagKind::Byte,
        TagKind::Float,
        TagKind::Double,
    ];

    /// The persisted discriminator string.
    pub fn as_str(self) -> &'static str {
        match self {
            TagKind::Compound => "tag",
            TagKind::List => "list",
            TagKind::String => "string",
            TagKind::Int => "int",
            TagKind::Long => "long",
            TagKind::Short => "short",
            TagKind::Byte => "byte",
            TagKind::Float => "float",
            TagKind::Double => "double",
        }
    }

    /// Parse a persisted discriminator. Matching is exact and case-sensitive.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }

    /// True for the seven leaf variants.
    pub fn is_scalar(self) -> bool {
        !matches!(self, TagKind::Compound | TagKind::List)
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of a tag tree.
///
/// Serializes adjacently tagged with the persisted discriminators, e.g.
/// `{"type":"int","value":5}` or `{"type":"tag","value":{...}}`. Infinite
/// and NaN floats serialize as the strings `"inf"`, `"-inf"` and `"nan"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum TaggedValue {
    #[serde(rename = "string")]
    String(String),
    #[serde(rename = "int")]
    Int32(i32),
    #[serde(rename = "long")]
    Int64(i64),
    #[serde(rename = "short")]
    Int16(i16),
    #[serde(rename = "byte")]
    Int8(i8),
    #[serde(rename = "float")]
    Float32(#[serde(with = "float_repr::narrow")] f32),
    #[serde(rename = "double")]
    Float64(#[serde(with = "float_repr")] f64),
    #[serde(rename = "tag")]
    Compound(Compound),
    #[serde(rename = "list")]
    List(List),
}

/// Float payloads in the interchange form. JSON has no literal for
/// non-finite numbers, so those are written as strings.
mod float_repr {
    use serde::de::{self, Unexpected};
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    fn non_finite_label(value: f64) -> &'static str {
        if value.is_nan() {
            "nan"
        } else if value > 0.0 {
            "inf"
        } else {
            "-inf"
        }
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_str(non_finite_label(*value))
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(n),
            Repr::Text(text) => match text.as_str() {
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                "nan" => Ok(f64::NAN),
                other => Err(de::Error::invalid_value(
                    Unexpected::Str(other),
                    &"a number, \"inf\", \"-inf\" or \"nan\"",
                )),
            },
        }
    }

    /// Single precision: written as `f32`, read as `f64` and narrowed.
    pub mod narrow {
        use serde::{Deserializer, Serializer};

        pub fn serialize<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
            if value.is_finite() {
                serializer.serialize_f32(*value)
            } else {
                serializer.serialize_str(super::non_finite_label(f64::from(*value)))
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
            super::deserialize(deserializer).map(|n| n as f32)
        }
    }
}

impl TaggedValue {
    pub fn kind(&self) -> TagKind {
        match self {
            TaggedValue::String(_) => TagKind::String,
            TaggedValue::Int32(_) => TagKind::Int,
            TaggedValue::Int64(_) => TagKind::Long,
            TaggedValue::Int16(_) => TagKind::Short,
            TaggedValue::Int8(_) => TagKind::Byte,
            TaggedValue::Float32(_) => TagKind::Float,
            TaggedValue::Float64(_) => TagKind::Double,
            TaggedValue::Compound(_) => TagKind::Compound,
            TaggedValue::List(_) => TagKind::List,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TaggedValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            TaggedValue::Int32(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TaggedValue::Int64(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i16(&self) -> Option<i16> {
        match self {
            TaggedValue::Int16(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i8(&self) -> Option<i8> {
        match self {
            TaggedValue::Int8(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            TaggedValue::Float32(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TaggedValue::Float64(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            TaggedValue::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            TaggedValue::List(l) => Some(l),
            _ => None,
        }
    }
}

impl From<String> for TaggedValue {
    fn from(value: String) -> Self {
        TaggedValue::String(value)
    }
}

impl From<&str> for TaggedValue {
    fn from(value: &str) -> Self {
        TaggedValue::String(value.to_string())
    }
}

impl From<i32> for TaggedValue {
    fn from(value: i32) -> Self {
        TaggedValue::Int32(value)
    }
}

impl From<i64> for TaggedValue {
    fn from(value: i64) -> Self {
        TaggedValue::Int64(value)
    }
}

impl From<i16> for TaggedValue {
    fn from(value: i16) -> Self {
        TaggedValue::Int16(value)
    }
}

impl From<i8> for TaggedValue {
    fn from(value: i8) -> Self {
        TaggedValue::Int8(value)
    }
}

impl From<f32> for TaggedValue {
    fn from(value: f32) -> Self {
        TaggedValue::Float32(value)
    }
}

impl From<f64> for TaggedValue {
    fn from(value: f64) -> Self {
        TaggedValue::Float64(value)
    }
}

impl From<Compound> for TaggedValue {
    fn from(value: Compound) -> Self {
        TaggedValue::Compound(value)
    }
}

impl From<List> for TaggedValue {
    fn from(value: List) -> Self {
        TaggedValue::List(value)
    }
}

/// Named children of a tree node.
///
/// Keys are non-empty and never contain the path separator; both are checked
/// on insertion. Iteration order is the keys' sort order and carries no
/// meaning.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, TaggedValue>")]
pub struct Compound {
    entries: BTreeMap<String, TaggedValue>,
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field, returning the previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<TaggedValue>,
    ) -> crate::error::Result<Option<TaggedValue>> {
        let key = key.into();
        path::validate_key(&key)?;
        Ok(self.entries.insert(key, value.into()))
    }

    /// Builder-style [`Compound::insert`].
    pub fn with(
        mut self,
        key: impl Into<String>,
        value: impl Into<TaggedValue>,
    ) -> crate::error::Result<Self> {
        self.insert(key, value)?;
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&TaggedValue> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut TaggedValue> {
        self.entries.get_mut(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<TaggedValue> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Discriminator of the field stored under `key`, if any.
    pub fn kind_of(&self, key: &str) -> Option<TagKind> {
        self.entries.get(key).map(TaggedValue::kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TaggedValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(TaggedValue::as_str)
    }

    pub fn get_int(&self, key: &str) -> Option<i32> {
        self.get(key).and_then(TaggedValue::as_i32)
    }

    pub fn get_long(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(TaggedValue::as_i64)
    }

    pub fn get_short(&self, key: &str) -> Option<i16> {
        self.get(key).and_then(TaggedValue::as_i16)
    }

    pub fn get_byte(&self, key: &str) -> Option<i8> {
        self.get(key).and_then(TaggedValue::as_i8)
    }

    pub fn get_float(&self, key: &str) -> Option<f32> {
        self.get(key).and_then(TaggedValue::as_f32)
    }

    pub fn get_double(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(TaggedValue::as_f64)
    }

    pub fn get_compound(&self, key: &str) -> Option<&Compound> {
        self.get(key).and_then(TaggedValue::as_compound)
    }

    pub fn get_list(&self, key: &str) -> Option<&List> {
        self.get(key).and_then(TaggedValue::as_list)
    }
}

impl TryFrom<BTreeMap<String, TaggedValue>> for Compound {
    type Error = TagStoreError;

    fn try_from(entries: BTreeMap<String, TaggedValue>) -> Result<Self, Self::Error> {
        for key in entries.keys() {
            path::validate_key(key)?;
        }
        Ok(Self { entries })
    }
}

impl Serialize for Compound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(&self.entries)
    }
}

impl<'a> IntoIterator for &'a Compound {
    type Item = (&'a String, &'a TaggedValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, TaggedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Positional children of a tree node. Order is significant and elements
/// may be of mixed kinds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct List {
    items: Vec<TaggedValue>,
}

impl List {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: impl Into<TaggedValue>) {
        self.items.push(value.into());
    }

    pub fn get(&self, index: usize) -> Option<&TaggedValue> {
        self.items.get(index)
    }

    /// Discriminator of the element at `index`, if any.
    pub fn kind_of(&self, index: usize) -> Option<TagKind> {
        self.items.get(index).map(TaggedValue::kind)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TaggedValue> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[TaggedValue] {
        &self.items
    }
}

impl From<Vec<TaggedValue>> for List {
    fn from(items: Vec<TaggedValue>) -> Self {
        Self { items }
    }
}

impl FromIterator<TaggedValue> for List {
    fn from_iter<I: IntoIterator<Item = TaggedValue>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for List {
    type Item = TaggedValue;
    type IntoIter = std::vec::IntoIter<TaggedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a TaggedValue;
    type IntoIter = std::slice::Iter<'a, TaggedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
