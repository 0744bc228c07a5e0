//! The flat store boundary.
//!
//! The codec never touches a backing medium directly; it talks to anything
//! implementing [`FlatStore`], a hierarchical key-value store addressed by
//! dotted paths whose leaves are plain scalars.
//!
//! Typed getters never fail on absence. A missing key (or a key holding a
//! section or an incompatible scalar) reads as the type's zero value, which
//! lets partially written trees be read back without special casing.

use std::fmt;

use crate::error::Result;

/// A scalar stored at a single path.
#[derive(Debug, Clone, PartialEq)]
pub enum Leaf {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leaf::Bool(b) => write!(f, "{b}"),
            Leaf::Int(n) => write!(f, "{n}"),
            Leaf::Float(n) => write!(f, "{n}"),
            Leaf::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Leaf {
    fn from(value: bool) -> Self {
        Leaf::Bool(value)
    }
}

impl From<i32> for Leaf {
    fn from(value: i32) -> Self {
        Leaf::Int(value.into())
    }
}

impl From<i64> for Leaf {
    fn from(value: i64) -> Self {
        Leaf::Int(value)
    }
}

impl From<f32> for Leaf {
    fn from(value: f32) -> Self {
        Leaf::Float(value.into())
    }
}

impl From<f64> for Leaf {
    fn from(value: f64) -> Self {
        Leaf::Float(value)
    }
}

impl From<&str> for Leaf {
    fn from(value: &str) -> Self {
        Leaf::String(value.to_string())
    }
}

impl From<String> for Leaf {
    fn from(value: String) -> Self {
        Leaf::String(value)
    }
}

/// A hierarchical key-value store addressed by dotted paths.
///
/// Implementations are single-threaded and synchronous. Writing below a path
/// that currently holds a scalar replaces that scalar with a section.
pub trait FlatStore {
    /// Whether anything (a scalar or a section) exists at `path`.
    fn has(&self, path: &str) -> bool;

    /// The scalar at `path`, or `None` if the path is absent or a section.
    fn get(&self, path: &str) -> Result<Option<Leaf>>;

    /// Write a scalar, overwriting whatever was at `path`.
    fn set(&mut self, path: &str, value: Leaf) -> Result<()>;

    /// Names of the direct children of `path`, in no particular order.
    /// Scalars and absent paths have no children.
    fn keys_under(&self, path: &str) -> Result<Vec<String>>;

    /// Remove `path` and everything nested under it.
    fn clear(&mut self, path: &str) -> Result<()>;

    /// String form of the scalar at `path`; empty if absent.
    fn get_string(&self, path: &str) -> Result<String> {
        Ok(match self.get(path)? {
            Some(Leaf::String(s)) => s,
            Some(other) => other.to_string(),
            None => String::new(),
        })
    }

    fn get_long(&self, path: &str) -> Result<i64> {
        Ok(match self.get(path)? {
            Some(Leaf::Int(n)) => n,
            Some(Leaf::Float(n)) => n as i64,
            _ => 0,
        })
    }

    fn get_int(&self, path: &str) -> Result<i32> {
        Ok(match self.get(path)? {
            Some(Leaf::Int(n)) => n as i32,
            Some(Leaf::Float(n)) => n as i32,
            _ => 0,
        })
    }

    /// Read as a 32-bit int, then truncate.
    fn get_short(&self, path: &str) -> Result<i16> {
        Ok(self.get_int(path)? as i16)
    }

    /// Read as a 32-bit int, then truncate.
    fn get_byte(&self, path: &str) -> Result<i8> {
        Ok(self.get_int(path)? as i8)
    }

    fn get_double(&self, path: &str) -> Result<f64> {
        Ok(match self.get(path)? {
            Some(Leaf::Float(n)) => n,
            Some(Leaf::Int(n)) => n as f64,
            _ => 0.0,
        })
    }

    /// Read as a double, then narrow.
    fn get_float(&self, path: &str) -> Result<f32> {
        Ok(self.get_double(path)? as f32)
    }

    fn get_bool(&self, path: &str) -> Result<bool> {
        Ok(matches!(self.get(path)?, Some(Leaf::Bool(true))))
    }
}
