//! Dotted path construction for the flat store namespace.
//!
//! Every node of an exploded tree lives at a path built by joining segments
//! with [`PATH_SEPARATOR`]. A compound field `name` under `prefix` occupies
//! `prefix.name.type` (its discriminator) and `prefix.name.value` (its payload
//! or nested prefix); a list element uses `prefix.i.format` instead of `type`.
//! The empty path addresses the store root.

use crate::error::{Result, TagStoreError};

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '.';

/// Discriminator key for compound fields.
pub const FIELD_TYPE_KEY: &str = "type";

/// Discriminator key for list elements.
pub const ELEMENT_FORMAT_KEY: &str = "format";

/// Payload key shared by fields and elements.
pub const VALUE_KEY: &str = "value";

/// Join a child segment onto a prefix. An empty prefix yields the bare segment.
pub fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        let mut out = String::with_capacity(prefix.len() + 1 + segment.len());
        out.push_str(prefix);
        out.push(PATH_SEPARATOR);
        out.push_str(segment);
        out
    }
}

/// Paths of the two sibling keys that make up one exploded node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePaths {
    pub discriminator: String,
    pub value: String,
}

impl NodePaths {
    /// Node paths for compound field `name` under `prefix`.
    pub fn field(prefix: &str, name: &str) -> Self {
        let node = join(prefix, name);
        Self {
            discriminator: join(&node, FIELD_TYPE_KEY),
            value: join(&node, VALUE_KEY),
        }
    }

    /// Node paths for the list element stored under child key `index`.
    pub fn element(prefix: &str, index: &str) -> Self {
        let node = join(prefix, index);
        Self {
            discriminator: join(&node, ELEMENT_FORMAT_KEY),
            value: join(&node, VALUE_KEY),
        }
    }
}

/// Split a path into its segments. The empty path has no segments.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(PATH_SEPARATOR).filter(move |_| !path.is_empty())
}

/// Check that `key` can be used as a compound field name.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(TagStoreError::InvalidKey {
            key: key.to_string(),
            reason: "key must not be empty",
        });
    }
    if key.contains(PATH_SEPARATOR) {
        return Err(TagStoreError::InvalidKey {
            key: key.to_string(),
            reason: "key must not contain the path separator",
        });
    }
    Ok(())
}
