//! JSON codec for the newer engine generation
//!
//! MV/MZ data files are plain JSON (sometimes BOM-prefixed); plugins.js
//! wraps a JSON array in a `var $plugins =` assignment. Member order is
//! preserved end to end so untouched files re-serialize identically.

use std::path::Path;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::graph::{HashKey, Value};

/// Read and decode a JSON data file, tolerating a UTF-8 BOM.
///
/// # Errors
/// Returns [`Error::ReadFileFailed`] if the file cannot be read, or
/// [`Error::Json`] if parsing fails.
pub fn read_json_file<P: AsRef<Path>>(path: P) -> Result<Value> {
    let content = std::fs::read_to_string(&path).map_err(|source| Error::ReadFileFailed {
        file: path.as_ref().to_path_buf(),
        source,
    })?;
    let trimmed = content.strip_prefix('\u{feff}').unwrap_or(&content);
    let parsed: serde_json::Value = serde_json::from_str(trimmed)?;
    Ok(from_json(parsed))
}

/// Encode a [`Value`] graph and write it as JSON.
///
/// # Errors
/// Returns [`Error::WriteFileFailed`] if the file cannot be written.
pub fn write_json_file<P: AsRef<Path>>(path: P, value: &Value) -> Result<()> {
    let json = to_json(value);
    let data = serde_json::to_vec(&json)?;
    std::fs::write(&path, data).map_err(|source| Error::WriteFileFailed {
        file: path.as_ref().to_path_buf(),
        source,
    })
}

/// Read a plugins.js file: strip the `var $plugins =` wrapper and any
/// trailing semicolon, then parse the JSON array.
///
/// # Errors
/// Returns [`Error::MalformedPlugins`] if the wrapper is missing.
pub fn read_plugins_file<P: AsRef<Path>>(path: P) -> Result<Value> {
    let content = std::fs::read_to_string(&path).map_err(|source| Error::ReadFileFailed {
        file: path.as_ref().to_path_buf(),
        source,
    })?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

    let start = content
        .find('=')
        .ok_or_else(|| Error::MalformedPlugins("missing '=' assignment".to_string()))?;
    let body = content[start + 1..].trim().trim_end_matches(';').trim();

    let parsed: serde_json::Value = serde_json::from_str(body)?;
    Ok(from_json(parsed))
}

/// Write a plugins graph back with its `var $plugins =` wrapper.
///
/// # Errors
/// Returns [`Error::WriteFileFailed`] if the file cannot be written.
pub fn write_plugins_file<P: AsRef<Path>>(path: P, value: &Value) -> Result<()> {
    let json = to_json(value);
    let mut data = b"var $plugins =\n".to_vec();
    data.extend_from_slice(&serde_json::to_vec(&json)?);
    data.extend_from_slice(b";\n");
    std::fs::write(&path, data).map_err(|source| Error::WriteFileFailed {
        file: path.as_ref().to_path_buf(),
        source,
    })
}

/// Convert a parsed JSON document into the graph model.
#[must_use]
pub fn from_json(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Nil,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                Value::Float(n.to_string())
            }
        }
        serde_json::Value::String(s) => Value::Str(s),
        serde_json::Value::Array(items) => {
            Value::Array(items.into_iter().map(from_json).collect())
        }
        serde_json::Value::Object(members) => {
            let mut map = IndexMap::with_capacity(members.len());
            for (key, val) in members {
                map.insert(HashKey::Str(key), from_json(val));
            }
            Value::Hash(map)
        }
    }
}

/// Convert a graph back into a JSON document.
///
/// Marshal-only shapes degrade explicitly: bytes decode lossily, symbols
/// become strings, user data has no JSON counterpart and becomes null.
#[must_use]
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Nil => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::Number((*i).into()),
        Value::Float(repr) => repr
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
        Value::Str(s) => serde_json::Value::String(s.clone()),
        Value::Bytes(b) => serde_json::Value::String(String::from_utf8_lossy(b).into_owned()),
        Value::Symbol(s) => serde_json::Value::String(s.clone()),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Hash(map) => {
            let mut members = serde_json::Map::with_capacity(map.len());
            for (key, val) in map {
                members.insert(key.to_string(), to_json(val));
            }
            serde_json::Value::Object(members)
        }
        Value::Object(obj) => {
            let mut members = serde_json::Map::with_capacity(obj.ivars.len());
            for (name, val) in &obj.ivars {
                members.insert(name.trim_start_matches('@').to_string(), to_json(val));
            }
            serde_json::Value::Object(members)
        }
        Value::UserData { .. } => serde_json::Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn json_object_becomes_string_keyed_hash() {
        let value = from_json(serde_json::json!({"code": 401, "parameters": ["Hi"]}));
        let Value::Hash(map) = &value else {
            panic!("expected hash")
        };
        assert_eq!(
            map.get(&HashKey::Str("code".into())),
            Some(&Value::Int(401))
        );
        assert_eq!(to_json(&value), serde_json::json!({"code": 401, "parameters": ["Hi"]}));
    }

    #[test]
    fn member_order_survives_conversion() {
        let source = r#"{"zeta":1,"alpha":2,"mid":3}"#;
        let parsed: serde_json::Value = serde_json::from_str(source).unwrap();
        let back = serde_json::to_string(&to_json(&from_json(parsed))).unwrap();
        assert_eq!(back, source);
    }
}
