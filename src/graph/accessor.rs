//! Name-keyed field access over graph nodes
//!
//! Marshal objects key their fields by `@`-prefixed instance-variable
//! symbols; JSON nodes key theirs by plain strings. The accessor hides
//! that difference: callers pass the bare field name and it resolves
//! against whichever representation the node has.
//!
//! `set` never creates fields. Writing to a name the node does not have
//! is a silent no-op, so a substitution pass cannot change a graph's
//! shape, only its text.

use std::borrow::Cow;

use crate::graph::{HashKey, Value};

/// Read a field by name. Returns `None` when absent or when the node
/// kind has no named fields.
#[must_use]
pub fn get<'a>(node: &'a Value, name: &str) -> Option<&'a Value> {
    match node {
        Value::Object(obj) => obj
            .ivars
            .get(name)
            .or_else(|| obj.ivars.get(format!("@{name}").as_str())),
        Value::Hash(map) => map
            .get(&HashKey::Str(name.to_string()))
            .or_else(|| map.get(&HashKey::Symbol(name.to_string()))),
        _ => None,
    }
}

/// Mutable variant of [`get`].
#[must_use]
pub fn get_mut<'a>(node: &'a mut Value, name: &str) -> Option<&'a mut Value> {
    match node {
        Value::Object(obj) => {
            let key = if obj.ivars.contains_key(name) {
                name.to_string()
            } else {
                format!("@{name}")
            };
            obj.ivars.get_mut(&key)
        }
        Value::Hash(map) => {
            let key = if map.contains_key(&HashKey::Str(name.to_string())) {
                HashKey::Str(name.to_string())
            } else {
                HashKey::Symbol(name.to_string())
            };
            map.get_mut(&key)
        }
        _ => None,
    }
}

/// Overwrite an existing field. Silent no-op when the field is absent.
pub fn set(node: &mut Value, name: &str, value: Value) {
    if let Some(slot) = get_mut(node, name) {
        *slot = value;
    }
}

/// Decode a field as text, whichever representation it has.
#[must_use]
pub fn text<'a>(node: &'a Value, name: &str) -> Option<Cow<'a, str>> {
    get(node, name).and_then(Value::to_text)
}

/// Replace a text field's content, preserving its representation kind.
///
/// No-op when the field is absent or holds a non-text value.
pub fn set_text(node: &mut Value, name: &str, new: &str) {
    if let Some(slot) = get_mut(node, name) {
        if let Some(replacement) = slot.with_text(new) {
            *slot = replacement;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Object;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn marshal_node() -> Value {
        let mut ivars = IndexMap::new();
        ivars.insert("@name".to_string(), Value::Bytes(b"Slime".to_vec()));
        ivars.insert("@hp".to_string(), Value::Int(20));
        Value::Object(Object {
            class: "RPG::Enemy".to_string(),
            ivars,
        })
    }

    fn json_node() -> Value {
        let mut map = IndexMap::new();
        map.insert(HashKey::Str("name".to_string()), Value::Str("Slime".into()));
        Value::Hash(map)
    }

    #[test]
    fn resolves_ivar_and_plain_names() {
        assert_eq!(text(&marshal_node(), "name").unwrap(), "Slime");
        assert_eq!(text(&json_node(), "name").unwrap(), "Slime");
        assert!(get(&marshal_node(), "nickname").is_none());
    }

    #[test]
    fn set_does_not_create_fields() {
        let mut node = marshal_node();
        set(&mut node, "nickname", Value::Str("Blob".into()));
        assert!(get(&node, "nickname").is_none());

        set(&mut node, "hp", Value::Int(25));
        assert_eq!(get(&node, "hp"), Some(&Value::Int(25)));
    }

    #[test]
    fn set_text_preserves_representation() {
        let mut node = marshal_node();
        set_text(&mut node, "name", "Goo");
        // Field was bytes, stays bytes.
        assert_eq!(get(&node, "name"), Some(&Value::Bytes(b"Goo".to_vec())));

        let mut node = json_node();
        set_text(&mut node, "name", "Goo");
        assert_eq!(get(&node, "name"), Some(&Value::Str("Goo".into())));
    }

    #[test]
    fn set_text_skips_non_text_fields() {
        let mut node = marshal_node();
        set_text(&mut node, "hp", "99");
        assert_eq!(get(&node, "hp"), Some(&Value::Int(20)));
    }
}
