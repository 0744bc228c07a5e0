//! In-memory YAML document implementing [`FlatStore`].
//!
//! The document is a tree of YAML mappings. A dotted path walks mapping keys
//! one segment at a time, so `a.b.c` is the key `c` of the mapping at `b` of
//! the mapping at `a`. Writes create intermediate mappings as needed.
//!
//! All mapping keys are strings. Documents parsed from text have their
//! numeric and boolean keys converted (`0:` becomes `"0"`), so list indices
//! written by hand address the same nodes as those written by the codec.

use serde_yaml::{Mapping, Value};

use crate::error::{Result, TagStoreError};
use crate::path::{self, PATH_SEPARATOR};
use crate::store::{FlatStore, Leaf};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct YamlDocument {
    root: Mapping,
}

impl YamlDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML document. Empty input yields an empty document.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::new());
        }
        match serde_yaml::from_str::<Value>(text)? {
            Value::Null => Ok(Self::new()),
            Value::Mapping(mapping) => Ok(Self {
                root: normalize_mapping(mapping)?,
            }),
            other => Err(TagStoreError::BackendRead(format!(
                "document root must be a mapping, found {}",
                describe(&other)
            ))),
        }
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.root)?)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Deep copy of the section at `path` as a standalone document. A path
    /// that is absent or holds a scalar yields an empty document.
    pub fn subsection(&self, path: &str) -> YamlDocument {
        match self.section(path) {
            Some(mapping) => Self {
                root: mapping.clone(),
            },
            None => Self::new(),
        }
    }

    /// Strings stored as a YAML sequence at `path`. Scalar elements are
    /// converted to their string form; nested structures are skipped.
    pub fn get_string_list(&self, path: &str) -> Vec<String> {
        match self.node(path) {
            Some(Value::Sequence(items)) => items
                .iter()
                .filter_map(|item| match value_to_leaf(item) {
                    Ok(Some(Leaf::String(s))) => Some(s),
                    Ok(Some(other)) => Some(other.to_string()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Store a sequence of strings at `path`.
    pub fn set_string_list(&mut self, path: &str, items: &[String]) -> Result<()> {
        let sequence = items.iter().cloned().map(Value::String).collect();
        self.put(path, Value::Sequence(sequence))
    }

    fn node(&self, path: &str) -> Option<&Value> {
        let mut segments = path::segments(path);
        let first = segments.next()?;
        let mut current = self.root.get(first)?;
        for segment in segments {
            current = current.as_mapping()?.get(segment)?;
        }
        match current {
            Value::Null => None,
            value => Some(value),
        }
    }

    fn section(&self, path: &str) -> Option<&Mapping> {
        if path.is_empty() {
            return Some(&self.root);
        }
        self.node(path)?.as_mapping()
    }

    fn put(&mut self, path: &str, value: Value) -> Result<()> {
        let (parent, last) = split_last(path)?;
        let section = section_mut(&mut self.root, parent)?;
        section.insert(Value::String(last.to_string()), value);
        Ok(())
    }
}

impl FlatStore for YamlDocument {
    fn has(&self, path: &str) -> bool {
        path.is_empty() || self.node(path).is_some()
    }

    fn get(&self, path: &str) -> Result<Option<Leaf>> {
        match self.node(path) {
            Some(value) => value_to_leaf(value).map_err(|reason| {
                TagStoreError::BackendRead(format!("'{path}': {reason}"))
            }),
            None => Ok(None),
        }
    }

    fn set(&mut self, path: &str, value: Leaf) -> Result<()> {
        self.put(path, leaf_to_value(value))
    }

    fn keys_under(&self, path: &str) -> Result<Vec<String>> {
        Ok(match self.section(path) {
            Some(mapping) => mapping.keys().filter_map(key_to_string).collect(),
            None => Vec::new(),
        })
    }

    fn clear(&mut self, path: &str) -> Result<()> {
        if path.is_empty() {
            self.root.clear();
            return Ok(());
        }
        let (parent, last) = split_last(path)?;
        let mut current = &mut self.root;
        for segment in parent {
            current = match current.get_mut(segment) {
                Some(Value::Mapping(mapping)) => mapping,
                _ => return Ok(()),
            };
        }
        current.remove(last);
        Ok(())
    }
}

/// Split a non-empty path into its parent segments and final segment,
/// rejecting empty segments such as those in `a..b`.
fn split_last(path: &str) -> Result<(Vec<&str>, &str)> {
    let mut segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(TagStoreError::BackendWrite(format!(
            "path '{path}' has an empty segment"
        )));
    }
    let last = segments.pop().unwrap_or_default();
    Ok((segments, last))
}

/// Walk to the mapping at `segments`, creating or replacing nodes on the way.
fn section_mut<'a>(root: &'a mut Mapping, segments: Vec<&str>) -> Result<&'a mut Mapping> {
    let mut current = root;
    for segment in segments {
        let entry = current
            .entry(Value::String(segment.to_string()))
            .or_insert(Value::Mapping(Mapping::new()));
        if !entry.is_mapping() {
            *entry = Value::Mapping(Mapping::new());
        }
        current = entry.as_mapping_mut().ok_or_else(|| {
            TagStoreError::BackendWrite(format!("cannot create section '{segment}'"))
        })?;
    }
    Ok(current)
}

fn leaf_to_value(leaf: Leaf) -> Value {
    match leaf {
        Leaf::Bool(b) => Value::Bool(b),
        Leaf::Int(n) => Value::Number(n.into()),
        Leaf::Float(n) => Value::Number(n.into()),
        Leaf::String(s) => Value::String(s),
    }
}

fn value_to_leaf(value: &Value) -> std::result::Result<Option<Leaf>, String> {
    match value {
        Value::Null | Value::Mapping(_) | Value::Sequence(_) => Ok(None),
        Value::Bool(b) => Ok(Some(Leaf::Bool(*b))),
        Value::String(s) => Ok(Some(Leaf::String(s.clone()))),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Ok(Some(Leaf::Int(i))),
            (None, Some(f)) => Ok(Some(Leaf::Float(f))),
            (None, None) => Err(format!("unrepresentable number {n}")),
        },
        Value::Tagged(tagged) => Err(format!("unsupported YAML tag {}", tagged.tag)),
    }
}

fn key_to_string(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn normalize_mapping(mapping: Mapping) -> Result<Mapping> {
    let mut out = Mapping::with_capacity(mapping.len());
    for (key, value) in mapping {
        let name = key_to_string(&key).ok_or_else(|| {
            TagStoreError::BackendRead(format!(
                "mapping key must be a scalar, found {}",
                describe(&key)
            ))
        })?;
        if out.contains_key(name.as_str()) {
            return Err(TagStoreError::BackendRead(format!(
                "duplicate mapping key '{name}' after key normalization"
            )));
        }
        out.insert(Value::String(name), normalize_value(value)?);
    }
    Ok(out)
}

fn normalize_value(value: Value) -> Result<Value> {
    Ok(match value {
        Value::Mapping(mapping) => Value::Mapping(normalize_mapping(mapping)?),
        Value::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .map(normalize_value)
                .collect::<Result<Vec<_>>>()?,
        ),
        other => other,
    })
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
