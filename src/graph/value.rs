//! Owned graph value model shared by the marshal and JSON codecs
//!
//! A decoded game-data file is a tree of [`Value`] nodes. The model keeps
//! exactly the distinctions the write path needs to reproduce the input
//! byte-for-byte: text that arrived UTF-8-tagged stays [`Value::Str`],
//! raw legacy-encoded text stays [`Value::Bytes`], and floats keep their
//! serialized ASCII representation.

use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;

/// A single node of a decoded object graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Ruby `nil` / JSON `null`.
    Nil,
    /// Boolean.
    Bool(bool),
    /// Integer (marshal fixnum, JSON integral number).
    Int(i64),
    /// Float, kept as its serialized ASCII form for round-trip fidelity.
    Float(String),
    /// UTF-8 text (JSON string, or marshal string with `:E => true`).
    Str(String),
    /// Raw marshal string bytes in an unspecified legacy encoding.
    Bytes(Vec<u8>),
    /// Interned symbol.
    Symbol(String),
    /// Ordered sequence.
    Array(Vec<Value>),
    /// Keyed mapping; insertion order is preserved.
    Hash(IndexMap<HashKey, Value>),
    /// Class instance with named instance variables (`@name` keys).
    Object(Object),
    /// Opaque user-defined marshal payload (`Table`, `Color`, `Tone`, ...).
    UserData {
        /// Ruby class name.
        class: String,
        /// Raw `_dump` payload, passed through untouched.
        data: Vec<u8>,
    },
}

/// The key shapes the two game-data formats actually produce.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HashKey {
    /// Integer key (event IDs in map files).
    Int(i64),
    /// String key (JSON object members).
    Str(String),
    /// Symbol key (encoding ivars, VX Ace hashes).
    Symbol(String),
}

/// A class instance: class name plus ordered instance variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Object {
    /// Ruby class name (e.g. `RPG::EventCommand`).
    pub class: String,
    /// Instance variables in serialization order, names include the `@`.
    pub ivars: IndexMap<String, Value>,
}

impl Value {
    /// Integer value, if this node is an integer.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Array contents, if this node is a sequence.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Mutable array contents.
    #[must_use]
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Whether this node carries text in either representation.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Value::Str(_) | Value::Bytes(_))
    }

    /// Whether this node is the raw-bytes text representation.
    #[must_use]
    pub fn is_bytes(&self) -> bool {
        matches!(self, Value::Bytes(_))
    }

    /// Decode this node as text.
    ///
    /// `Str` borrows; `Bytes` decodes lazily, borrowing when the bytes
    /// happen to be valid UTF-8. Non-text nodes yield `None` so walkers
    /// can skip fields with unexpected shapes.
    #[must_use]
    pub fn to_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Str(s) => Some(Cow::Borrowed(s)),
            Value::Bytes(b) => Some(String::from_utf8_lossy(b)),
            _ => None,
        }
    }

    /// Re-encode `new` in this node's text representation.
    ///
    /// Representation kind is preserved: a `Str` field stays `Str`, a
    /// `Bytes` field stays `Bytes`. Returns `None` for non-text nodes.
    #[must_use]
    pub fn with_text(&self, new: &str) -> Option<Value> {
        match self {
            Value::Str(_) => Some(Value::Str(new.to_string())),
            Value::Bytes(_) => Some(Value::Bytes(new.as_bytes().to_vec())),
            _ => None,
        }
    }
}

impl fmt::Display for HashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashKey::Int(i) => write!(f, "{i}"),
            HashKey::Str(s) => write!(f, "{s}"),
            HashKey::Symbol(s) => write!(f, ":{s}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_representation_is_preserved() {
        let s = Value::Str("hello".into());
        let b = Value::Bytes(b"hello".to_vec());

        assert_eq!(s.with_text("bye"), Some(Value::Str("bye".into())));
        assert_eq!(b.with_text("bye"), Some(Value::Bytes(b"bye".to_vec())));
        assert_eq!(Value::Int(3).with_text("bye"), None);
    }

    #[test]
    fn bytes_decode_lazily() {
        let b = Value::Bytes(vec![0x41, 0x42]);
        assert_eq!(b.to_text().unwrap(), "AB");
        // Invalid UTF-8 still yields text, lossily.
        let bad = Value::Bytes(vec![0xff, 0x41]);
        assert!(bad.to_text().unwrap().contains('A'));
    }
}
