//! Error types for tag tree encoding, decoding and settings persistence.

use thiserror::Error;

/// Errors that can occur while moving tag trees in and out of a flat store.
#[derive(Error, Debug)]
pub enum TagStoreError {
    /// A field or list element has no discriminator, or one outside the
    /// nine recognised tags. `found` is `None` when the discriminator key
    /// is absent altogether.
    #[error("missing or unknown type tag at '{path}'{}", describe_found(.found))]
    MissingOrUnknownTypeTag { path: String, found: Option<String> },

    /// A child key under a list path does not parse as a non-negative index.
    #[error("malformed list index '{key}' under '{path}'")]
    MalformedListIndex { path: String, key: String },

    /// The backing store refused a write.
    #[error("store write failed: {0}")]
    BackendWrite(String),

    /// The backing store could not produce a readable value.
    #[error("store read failed: {0}")]
    BackendRead(String),

    /// A compound key that cannot be addressed in the flat namespace.
    #[error("invalid compound key '{key}': {reason}")]
    InvalidKey { key: String, reason: &'static str },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON interchange failure (tree import/export).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn describe_found(found: &Option<String>) -> String {
    match found {
        Some(tag) => format!(" (found '{tag}')"),
        None => String::new(),
    }
}

/// Convenience alias used throughout tagstore-core.
pub type Result<T> = std::result::Result<T, TagStoreError>;
