//! Tree codec: explodes a tag tree into a [`FlatStore`] and reassembles it.
//!
//! # Layout
//!
//! A compound at prefix `p` writes, for every field `name`:
//!
//! - `p.name.type`: the discriminator (`tag`, `list`, `string`, `int`,
//!   `long`, `short`, `byte`, `float`, `double`)
//! - `p.name.value`: the scalar payload, or the prefix of the nested
//!   compound or list
//!
//! A list at prefix `p` writes `p.i.format` and `p.i.value` for each index
//! `i`. Nothing is ever packed into a single string; nesting is expressed
//! purely through paths.
//!
//! # Guarantees
//!
//! - Encoding clears the target prefix first, so re-encoding a smaller or
//!   differently shaped tree leaves no stale keys behind.
//! - List decoding sorts children by their numeric index, so element order
//!   does not depend on the store's key enumeration order.
//! - An absent or unrecognised discriminator is an error, never a skipped
//!   field.
//! - A present discriminator with an absent payload reads the store's zero
//!   value for that kind (an empty compound or list for the two branch kinds).
//!
//! Writes are not transactional: a failing store leaves the prefix partially
//! rewritten.

use tracing::{debug, trace, warn};

use crate::error::{Result, TagStoreError};
use crate::path::NodePaths;
use crate::store::{FlatStore, Leaf};
use crate::types::{Compound, List, TagKind, TaggedValue};

/// Replace everything under `path` with the exploded form of `compound`.
pub fn encode_compound<S: FlatStore + ?Sized>(
    compound: &Compound,
    store: &mut S,
    path: &str,
) -> Result<()> {
    debug!(path, fields = compound.len(), "encoding compound");
    store.clear(path)?;
    write_compound(compound, store, path)
}

/// Replace everything under `path` with the exploded form of `list`.
pub fn encode_list<S: FlatStore + ?Sized>(list: &List, store: &mut S, path: &str) -> Result<()> {
    debug!(path, elements = list.len(), "encoding list");
    store.clear(path)?;
    write_list(list, store, path)
}

/// Reassemble the compound exploded under `path`. An absent path decodes as
/// an empty compound.
pub fn decode_compound<S: FlatStore + ?Sized>(store: &S, path: &str) -> Result<Compound> {
    let compound = read_compound(store, path)?;
    debug!(path, fields = compound.len(), "decoded compound");
    Ok(compound)
}

/// Reassemble the list exploded under `path`. An absent path decodes as an
/// empty list.
pub fn decode_list<S: FlatStore + ?Sized>(store: &S, path: &str) -> Result<List> {
    let list = read_list(store, path)?;
    debug!(path, elements = list.len(), "decoded list");
    Ok(list)
}

fn write_compound<S: FlatStore + ?Sized>(
    compound: &Compound,
    store: &mut S,
    path: &str,
) -> Result<()> {
    for (name, value) in compound.iter() {
        write_node(value, store, &NodePaths::field(path, name))?;
    }
    Ok(())
}

fn write_list<S: FlatStore + ?Sized>(list: &List, store: &mut S, path: &str) -> Result<()> {
    for (index, value) in list.iter().enumerate() {
        write_node(value, store, &NodePaths::element(path, &index.to_string()))?;
    }
    Ok(())
}

/// Write one node's discriminator, then its payload.
fn write_node<S: FlatStore + ?Sized>(
    value: &TaggedValue,
    store: &mut S,
    node: &NodePaths,
) -> Result<()> {
    let kind = value.kind();
    trace!(path = %node.value, %kind, "write");
    store.set(&node.discriminator, Leaf::String(kind.as_str().to_string()))?;

    match value {
        TaggedValue::Compound(compound) => write_compound(compound, store, &node.value),
        TaggedValue::List(list) => write_list(list, store, &node.value),
        TaggedValue::String(s) => store.set(&node.value, Leaf::String(s.clone())),
        TaggedValue::Int32(n) => store.set(&node.value, Leaf::Int((*n).into())),
        TaggedValue::Int64(n) => store.set(&node.value, Leaf::Int(*n)),
        TaggedValue::Int16(n) => store.set(&node.value, Leaf::Int((*n).into())),
        TaggedValue::Int8(n) => store.set(&node.value, Leaf::Int((*n).into())),
        TaggedValue::Float32(n) => store.set(&node.value, Leaf::Float((*n).into())),
        TaggedValue::Float64(n) => store.set(&node.value, Leaf::Float(*n)),
    }
}

fn read_compound<S: FlatStore + ?Sized>(store: &S, path: &str) -> Result<Compound> {
    let mut compound = Compound::new();
    for name in store.keys_under(path)? {
        let value = read_node(store, &NodePaths::field(path, &name))?;
        compound.insert(name, value)?;
    }
    Ok(compound)
}

fn read_list<S: FlatStore + ?Sized>(store: &S, path: &str) -> Result<List> {
    let mut indexed = Vec::new();
    for key in store.keys_under(path)? {
        let index = parse_index(&key).ok_or_else(|| TagStoreError::MalformedListIndex {
            path: path.to_string(),
            key: key.clone(),
        })?;
        indexed.push((index, key));
    }
    // Store enumeration order is arbitrary; position comes from the index alone.
    indexed.sort_unstable_by_key(|(index, _)| *index);

    let mut list = List::new();
    for (_, key) in indexed {
        list.push(read_node(store, &NodePaths::element(path, &key))?);
    }
    Ok(list)
}

/// Digits only: rejects signs, whitespace and the empty string.
fn parse_index(key: &str) -> Option<usize> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

fn read_node<S: FlatStore + ?Sized>(store: &S, node: &NodePaths) -> Result<TaggedValue> {
    let kind = read_kind(store, &node.discriminator)?;
    trace!(path = %node.value, %kind, "read");
    let path = node.value.as_str();

    Ok(match kind {
        TagKind::Compound => TaggedValue::Compound(read_compound(store, path)?),
        TagKind::List => TaggedValue::List(read_list(store, path)?),
        TagKind::String => TaggedValue::String(store.get_string(path)?),
        TagKind::Int => TaggedValue::Int32(store.get_int(path)?),
        TagKind::Long => TaggedValue::Int64(store.get_long(path)?),
        TagKind::Short => TaggedValue::Int16(store.get_short(path)?),
        TagKind::Byte => TaggedValue::Int8(store.get_byte(path)?),
        TagKind::Float => TaggedValue::Float32(store.get_float(path)?),
        TagKind::Double => TaggedValue::Float64(store.get_double(path)?),
    })
}

fn read_kind<S: FlatStore + ?Sized>(store: &S, discriminator: &str) -> Result<TagKind> {
    let found = store.get(discriminator)?;
    let kind = match &found {
        Some(Leaf::String(tag)) => TagKind::from_tag(tag),
        _ => None,
    };
    kind.ok_or_else(|| {
        let found = found.map(|leaf| leaf.to_string());
        warn!(path = discriminator, ?found, "missing or unknown type tag");
        TagStoreError::MissingOrUnknownTypeTag {
            path: discriminator.to_string(),
            found,
        }
    })
}
