//! Marshal stream writing
//!
//! The writer mirrors the reader's subset and reproduces the editor
//! dumper's byte layout: symbols are emitted once and back-referenced
//! afterwards, UTF-8 text strings carry the `:E => true` ivar, raw byte
//! strings are emitted bare, floats re-emit their stored ASCII form.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::graph::{HashKey, Value};

use super::{tag, ENCODING_IVAR, MARSHAL_VERSION};

/// Encode a [`Value`] graph and write it to disk.
///
/// # Errors
/// Returns [`Error::WriteFileFailed`] if the file cannot be written, or
/// any encode error from [`dump_marshal`].
pub fn write_marshal_file<P: AsRef<Path>>(path: P, value: &Value) -> Result<()> {
    let data = dump_marshal(value)?;
    std::fs::write(&path, data).map_err(|source| Error::WriteFileFailed {
        file: path.as_ref().to_path_buf(),
        source,
    })
}

/// Encode a [`Value`] graph as a marshal 4.8 stream.
///
/// # Errors
/// Returns [`Error::FixnumOutOfRange`] if an integer exceeds the 4-byte
/// fixnum encoding.
pub fn dump_marshal(value: &Value) -> Result<Vec<u8>> {
    let mut writer = MarshalWriter::new();
    writer.out.extend_from_slice(&MARSHAL_VERSION);
    writer.write_value(value)?;
    Ok(writer.out)
}

struct MarshalWriter {
    out: Vec<u8>,
    symbols: HashMap<String, usize>,
}

impl MarshalWriter {
    fn new() -> Self {
        Self {
            out: Vec::new(),
            symbols: HashMap::new(),
        }
    }

    /// Marshal "long" encoding, the inverse of the reader's.
    fn write_long(&mut self, v: i64) -> Result<()> {
        if v == 0 {
            self.out.push(0);
        } else if v > 0 && v < 123 {
            self.out.push((v + 5) as u8);
        } else if v < 0 && v > -124 {
            self.out.push((v - 5) as u8);
        } else {
            let mut buf = [0u8; 5];
            let mut x = v;
            let mut len = 0usize;
            for i in 1..=4 {
                buf[i] = (x & 0xff) as u8;
                x >>= 8;
                if x == 0 {
                    buf[0] = i as u8;
                    len = i;
                    break;
                }
                if x == -1 {
                    buf[0] = (-(i as i64)) as u8;
                    len = i;
                    break;
                }
            }
            if len == 0 {
                return Err(Error::FixnumOutOfRange(v));
            }
            self.out.extend_from_slice(&buf[..=len]);
        }
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_long(bytes.len() as i64)?;
        self.out.extend_from_slice(bytes);
        Ok(())
    }

    fn write_symbol(&mut self, name: &str) -> Result<()> {
        if let Some(&index) = self.symbols.get(name) {
            self.out.push(tag::SYMLINK);
            self.write_long(index as i64)?;
        } else {
            let index = self.symbols.len();
            self.symbols.insert(name.to_string(), index);
            self.out.push(tag::SYMBOL);
            self.write_bytes(name.as_bytes())?;
        }
        Ok(())
    }

    fn write_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Nil => self.out.push(tag::NIL),
            Value::Bool(true) => self.out.push(tag::TRUE),
            Value::Bool(false) => self.out.push(tag::FALSE),
            Value::Int(i) => {
                self.out.push(tag::FIXNUM);
                self.write_long(*i)?;
            }
            Value::Float(repr) => {
                self.out.push(tag::FLOAT);
                self.write_bytes(repr.as_bytes())?;
            }
            Value::Bytes(bytes) => {
                self.out.push(tag::STRING);
                self.write_bytes(bytes)?;
            }
            Value::Str(s) => {
                // UTF-8 text: I-wrapped string with the :E => true ivar.
                self.out.push(tag::IVAR);
                self.out.push(tag::STRING);
                self.write_bytes(s.as_bytes())?;
                self.write_long(1)?;
                self.write_symbol(ENCODING_IVAR)?;
                self.out.push(tag::TRUE);
            }
            Value::Symbol(name) => self.write_symbol(name)?,
            Value::Array(items) => {
                self.out.push(tag::ARRAY);
                self.write_long(items.len() as i64)?;
                for item in items {
                    self.write_value(item)?;
                }
            }
            Value::Hash(map) => {
                self.out.push(tag::HASH);
                self.write_long(map.len() as i64)?;
                for (key, val) in map {
                    match key {
                        HashKey::Int(i) => {
                            self.out.push(tag::FIXNUM);
                            self.write_long(*i)?;
                        }
                        HashKey::Symbol(s) => self.write_symbol(s)?,
                        HashKey::Str(s) => self.write_value(&Value::Str(s.clone()))?,
                    }
                    self.write_value(val)?;
                }
            }
            Value::Object(obj) => {
                self.out.push(tag::OBJECT);
                self.write_symbol(&obj.class)?;
                self.write_long(obj.ivars.len() as i64)?;
                for (name, val) in &obj.ivars {
                    self.write_symbol(name)?;
                    self.write_value(val)?;
                }
            }
            Value::UserData { class, data } => {
                self.out.push(tag::USERDEF);
                self.write_symbol(class)?;
                self.write_bytes(data)?;
            }
        }
        Ok(())
    }
}
