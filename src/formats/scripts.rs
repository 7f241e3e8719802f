//! Script block compression
//!
//! Scripts files hold a sequence of `[id, title, blob]` triples where the
//! blob is a zlib-deflated source listing. Extraction inflates every
//! slot; reinsertion deflates only slots whose text actually changed, so
//! untouched scripts keep their original compressed bytes and the file
//! round-trips exactly.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::{Error, Result};
use crate::graph::Value;

/// One script slot, inflated.
#[derive(Debug, Clone)]
pub struct Script {
    /// Slot position in the scripts array.
    pub index: usize,
    /// Editor-assigned magic number.
    pub id: i64,
    /// Script title as shown in the editor.
    pub title: String,
    /// Inflated source text.
    pub source: String,
}

/// Inflate every script slot of a decoded Scripts graph.
///
/// # Errors
/// Returns [`Error::MalformedScriptSlot`] if a slot is not an
/// `[id, title, blob]` triple, or [`Error::ScriptInflateFailed`] if a
/// blob does not inflate.
pub fn inflate_scripts(root: &Value) -> Result<Vec<Script>> {
    let slots = root
        .as_array()
        .ok_or(Error::MalformedScriptSlot(0))?;

    let mut scripts = Vec::with_capacity(slots.len());
    for (index, slot) in slots.iter().enumerate() {
        let (id, title, blob) = split_slot(slot, index)?;
        let source = inflate(blob).map_err(|message| Error::ScriptInflateFailed {
            index,
            title: title.clone(),
            message,
        })?;
        scripts.push(Script {
            index,
            id,
            title,
            source,
        });
    }
    Ok(scripts)
}

/// Replace the blob of `slot_index` with freshly deflated `source`.
///
/// The blob keeps the raw-bytes representation regardless of what the
/// new source contains.
///
/// # Errors
/// Returns [`Error::MalformedScriptSlot`] if the slot shape is wrong.
pub fn deflate_into_slot(root: &mut Value, slot_index: usize, source: &str) -> Result<()> {
    let slots = root
        .as_array_mut()
        .ok_or(Error::MalformedScriptSlot(0))?;
    let slot = slots
        .get_mut(slot_index)
        .and_then(Value::as_array_mut)
        .ok_or(Error::MalformedScriptSlot(slot_index))?;
    if slot.len() < 3 {
        return Err(Error::MalformedScriptSlot(slot_index));
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(source.as_bytes())?;
    let compressed = encoder.finish()?;

    slot[2] = Value::Bytes(compressed);
    Ok(())
}

fn split_slot(slot: &Value, index: usize) -> Result<(i64, String, &[u8])> {
    let triple = slot
        .as_array()
        .ok_or(Error::MalformedScriptSlot(index))?;
    if triple.len() < 3 {
        return Err(Error::MalformedScriptSlot(index));
    }

    let id = triple[0].as_int().unwrap_or(0);
    let title = triple[1]
        .to_text()
        .map(|t| t.into_owned())
        .unwrap_or_default();
    let blob = match &triple[2] {
        Value::Bytes(b) => b.as_slice(),
        Value::Str(s) => s.as_bytes(),
        _ => return Err(Error::MalformedScriptSlot(index)),
    };
    Ok((id, title, blob))
}

fn inflate(blob: &[u8]) -> std::result::Result<String, String> {
    let mut decoder = ZlibDecoder::new(blob);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| e.to_string())?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn deflated(text: &str) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    fn scripts_root() -> Value {
        Value::Array(vec![Value::Array(vec![
            Value::Int(12345),
            Value::Bytes(b"Main".to_vec()),
            Value::Bytes(deflated("p \"hello\"\nexit\n")),
        ])])
    }

    #[test]
    fn inflates_slots() {
        let scripts = inflate_scripts(&scripts_root()).unwrap();
        assert_eq!(scripts.len(), 1);
        assert_eq!(scripts[0].title, "Main");
        assert_eq!(scripts[0].source, "p \"hello\"\nexit\n");
    }

    #[test]
    fn deflate_roundtrips_through_inflate() {
        let mut root = scripts_root();
        deflate_into_slot(&mut root, 0, "translated\n").unwrap();
        let scripts = inflate_scripts(&root).unwrap();
        assert_eq!(scripts[0].source, "translated\n");
    }

    #[test]
    fn bad_blob_reports_slot() {
        let root = Value::Array(vec![Value::Array(vec![
            Value::Int(1),
            Value::Bytes(b"Broken".to_vec()),
            Value::Bytes(vec![0x00, 0x01]),
        ])]);
        let err = inflate_scripts(&root).unwrap_err();
        assert!(matches!(err, Error::ScriptInflateFailed { index: 0, .. }));
    }
}
