//! Marshal stream reading

use std::io::{Cursor, Read};
use std::path::Path;

use byteorder::ReadBytesExt;
use indexmap::IndexMap;

use super::{tag, ENCODING_IVAR, MARSHAL_VERSION};
use crate::error::{Error, Result};
use crate::graph::{HashKey, Object, Value};

/// Read and decode a marshal data file from disk.
///
/// # Errors
/// Returns [`Error::ReadFileFailed`] if the file cannot be read, or any
/// decode error from [`load_marshal`].
pub fn read_marshal_file<P: AsRef<Path>>(path: P) -> Result<Value> {
    let data = std::fs::read(&path).map_err(|source| Error::ReadFileFailed {
        file: path.as_ref().to_path_buf(),
        source,
    })?;
    load_marshal(&data)
}

/// Decode a marshal 4.8 stream into a [`Value`] graph.
///
/// # Errors
/// Returns [`Error::InvalidMarshalHeader`] if the version header is
/// missing, [`Error::UnsupportedMarshalTag`] for record shapes outside
/// the supported subset, and [`Error::UnexpectedEof`] for truncation.
pub fn load_marshal(data: &[u8]) -> Result<Value> {
    let mut reader = MarshalReader::new(data);
    reader.read_header()?;
    reader.read_value()
}

struct MarshalReader<'a> {
    cursor: Cursor<&'a [u8]>,
    symbols: Vec<String>,
}

impl<'a> MarshalReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
            symbols: Vec::new(),
        }
    }

    fn read_header(&mut self) -> Result<()> {
        let major = self.read_byte()?;
        let minor = self.read_byte()?;
        if [major, minor] != MARSHAL_VERSION {
            return Err(Error::InvalidMarshalHeader(major, minor));
        }
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8> {
        self.cursor.read_u8().map_err(|_| Error::UnexpectedEof)
    }

    /// Marshal "long" encoding: packed small integers, or a count byte
    /// followed by up to four little-endian bytes.
    fn read_long(&mut self) -> Result<i64> {
        let c = self.cursor.read_i8().map_err(|_| Error::UnexpectedEof)?;
        Ok(match c {
            0 => 0,
            1..=4 => {
                let mut x: i64 = 0;
                for i in 0..c {
                    x |= i64::from(self.read_byte()?) << (8 * i);
                }
                x
            }
            -4..=-1 => {
                let mut x: i64 = -1;
                for i in 0..-c {
                    x &= !(0xff_i64 << (8 * i));
                    x |= i64::from(self.read_byte()?) << (8 * i);
                }
                x
            }
            5..=127 => i64::from(c) - 5,
            -128..=-5 => i64::from(c) + 5,
        })
    }

    fn read_bytes(&mut self) -> Result<Vec<u8>> {
        let len = u64::try_from(self.read_long()?).map_err(|_| Error::UnexpectedEof)?;
        // Bound the claimed length against the stream before allocating,
        // so a malformed length fails like any other truncation.
        let remaining =
            (self.cursor.get_ref().len() as u64).saturating_sub(self.cursor.position());
        if len > remaining {
            return Err(Error::UnexpectedEof);
        }
        let mut buf = vec![0u8; usize::try_from(len).map_err(|_| Error::UnexpectedEof)?];
        self.cursor
            .read_exact(&mut buf)
            .map_err(|_| Error::UnexpectedEof)?;
        Ok(buf)
    }

    fn read_symbol_body(&mut self) -> Result<String> {
        let bytes = self.read_bytes()?;
        let name = String::from_utf8_lossy(&bytes).into_owned();
        self.symbols.push(name.clone());
        Ok(name)
    }

    /// Read a value that must be a symbol (class names, ivar names).
    fn read_symbol(&mut self) -> Result<String> {
        let offset = self.cursor.position();
        match self.read_byte()? {
            tag::SYMBOL => self.read_symbol_body(),
            tag::SYMLINK => {
                let index = usize::try_from(self.read_long()?).unwrap_or(usize::MAX);
                self.symbols
                    .get(index)
                    .cloned()
                    .ok_or(Error::InvalidSymbolLink(index))
            }
            other => Err(Error::UnsupportedMarshalTag {
                tag: char::from(other),
                offset,
            }),
        }
    }

    fn read_value(&mut self) -> Result<Value> {
        let offset = self.cursor.position();
        let tag_byte = self.read_byte()?;

        match tag_byte {
            tag::NIL => Ok(Value::Nil),
            tag::TRUE => Ok(Value::Bool(true)),
            tag::FALSE => Ok(Value::Bool(false)),
            tag::FIXNUM => self.read_long().map(Value::Int),
            tag::FLOAT => {
                let bytes = self.read_bytes()?;
                Ok(Value::Float(String::from_utf8_lossy(&bytes).into_owned()))
            }
            tag::STRING => self.read_bytes().map(Value::Bytes),
            tag::SYMBOL => self.read_symbol_body().map(Value::Symbol),
            tag::SYMLINK => {
                let index = usize::try_from(self.read_long()?).unwrap_or(usize::MAX);
                self.symbols
                    .get(index)
                    .cloned()
                    .map(Value::Symbol)
                    .ok_or(Error::InvalidSymbolLink(index))
            }
            tag::ARRAY => {
                let len = usize::try_from(self.read_long()?).map_err(|_| Error::UnexpectedEof)?;
                let mut items = Vec::with_capacity(len.min(1 << 20));
                for _ in 0..len {
                    items.push(self.read_value()?);
                }
                Ok(Value::Array(items))
            }
            tag::HASH => {
                let len = usize::try_from(self.read_long()?).map_err(|_| Error::UnexpectedEof)?;
                let mut map = IndexMap::with_capacity(len.min(1 << 20));
                for _ in 0..len {
                    let key_offset = self.cursor.position();
                    let key = match self.read_value()? {
                        Value::Int(i) => HashKey::Int(i),
                        Value::Symbol(s) => HashKey::Symbol(s),
                        Value::Str(s) => HashKey::Str(s),
                        _ => return Err(Error::UnsupportedHashKey { offset: key_offset }),
                    };
                    let value = self.read_value()?;
                    map.insert(key, value);
                }
                Ok(Value::Hash(map))
            }
            tag::OBJECT => {
                let class = self.read_symbol()?;
                let len = usize::try_from(self.read_long()?).map_err(|_| Error::UnexpectedEof)?;
                let mut ivars = IndexMap::with_capacity(len.min(1 << 16));
                for _ in 0..len {
                    let name = self.read_symbol()?;
                    let value = self.read_value()?;
                    ivars.insert(name, value);
                }
                Ok(Value::Object(Object { class, ivars }))
            }
            tag::IVAR => self.read_ivar_wrapped(offset),
            tag::USERDEF => {
                let class = self.read_symbol()?;
                let data = self.read_bytes()?;
                Ok(Value::UserData { class, data })
            }
            tag::LINK => Err(Error::ObjectLink { offset }),
            other => Err(Error::UnsupportedMarshalTag {
                tag: char::from(other),
                offset,
            }),
        }
    }

    /// `I`-wrapped records: in editor files this is always a string
    /// carrying the UTF-8 `:E => true` encoding ivar, which decodes to
    /// [`Value::Str`]. Any other ivar shape (`:E => false`, a named
    /// `:encoding`) has no faithful representation here and is refused,
    /// so every string this codec accepts re-serializes to the exact
    /// input bytes.
    fn read_ivar_wrapped(&mut self, offset: u64) -> Result<Value> {
        let inner_offset = self.cursor.position();
        let inner_tag = self.read_byte()?;
        if inner_tag != tag::STRING {
            return Err(Error::UnsupportedMarshalTag {
                tag: char::from(inner_tag),
                offset: inner_offset,
            });
        }

        let bytes = self.read_bytes()?;
        let count = usize::try_from(self.read_long()?).map_err(|_| Error::UnexpectedEof)?;
        if count != 1 {
            return Err(Error::UnsupportedStringEncoding { offset });
        }
        let name = self.read_symbol()?;
        let value = self.read_value()?;
        if name != ENCODING_IVAR || value != Value::Bool(true) {
            return Err(Error::UnsupportedStringEncoding { offset });
        }

        String::from_utf8(bytes)
            .map(Value::Str)
            .map_err(|_| Error::UnsupportedStringEncoding { offset })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn load(bytes: &[u8]) -> Value {
        load_marshal(bytes).unwrap()
    }

    #[test]
    fn reads_scalars() {
        assert_eq!(load(b"\x04\x080"), Value::Nil);
        assert_eq!(load(b"\x04\x08T"), Value::Bool(true));
        assert_eq!(load(b"\x04\x08F"), Value::Bool(false));
        assert_eq!(load(b"\x04\x08i\x00"), Value::Int(0));
        assert_eq!(load(b"\x04\x08i\x06"), Value::Int(1));
        assert_eq!(load(b"\x04\x08i\xfa"), Value::Int(-1));
        // 401 needs two little-endian bytes: 0x0191.
        assert_eq!(load(b"\x04\x08i\x02\x91\x01"), Value::Int(401));
        assert_eq!(load(b"\x04\x08i\xfe\x18\xfc"), Value::Int(-1000));
    }

    #[test]
    fn reads_strings_both_representations() {
        // Bare string: raw bytes representation.
        assert_eq!(load(b"\x04\x08\"\x07AB"), Value::Bytes(b"AB".to_vec()));
        // I-wrapped with :E => true: decoded text representation.
        assert_eq!(
            load(b"\x04\x08I\"\x07AB\x06:\x06ET"),
            Value::Str("AB".into())
        );
    }

    #[test]
    fn reads_array_with_symbol_links() {
        // [:a, :a] - second occurrence is a symlink to index 0.
        let value = load(b"\x04\x08[\x07:\x06a;\x00");
        assert_eq!(
            value,
            Value::Array(vec![Value::Symbol("a".into()), Value::Symbol("a".into())])
        );
    }

    #[test]
    fn reads_object_with_int_keyed_hash() {
        // {1 => nil} as an event table stand-in.
        let value = load(b"\x04\x08{\x06i\x060");
        let Value::Hash(map) = value else {
            panic!("expected hash")
        };
        assert_eq!(map.get(&HashKey::Int(1)), Some(&Value::Nil));
    }

    #[test]
    fn rejects_unsupported_tags() {
        let err = load_marshal(b"\x04\x08l+\x0a\x00\x00").unwrap_err();
        assert!(matches!(err, Error::UnsupportedMarshalTag { tag: 'l', .. }));
    }

    #[test]
    fn rejects_non_utf8_encoding_ivars() {
        // :E => false: US-ASCII tagged, would not re-serialize identically.
        let err = load_marshal(b"\x04\x08I\"\x07AB\x06:\x06EF").unwrap_err();
        assert!(matches!(err, Error::UnsupportedStringEncoding { .. }));

        // :encoding => "Shift_JIS" style named-encoding ivar.
        let err =
            load_marshal(b"\x04\x08I\"\x07AB\x06:\x0dencoding\"\x0eShift_JIS").unwrap_err();
        assert!(matches!(err, Error::UnsupportedStringEncoding { .. }));

        // :E => true whose payload is not valid UTF-8.
        let err = load_marshal(b"\x04\x08I\"\x07\xff\xfe\x06:\x06ET").unwrap_err();
        assert!(matches!(err, Error::UnsupportedStringEncoding { .. }));
    }

    #[test]
    fn oversized_length_claim_is_truncation_not_allocation() {
        // A bare string claiming ~2 GiB with no payload behind it.
        let err = load_marshal(b"\x04\x08\"\x04\xff\xff\xff\x7f").unwrap_err();
        assert!(matches!(err, Error::UnexpectedEof));

        // Same claim on a symbol.
        let err = load_marshal(b"\x04\x08:\x04\xff\xff\xff\x7f").unwrap_err();
        assert!(matches!(err, Error::UnexpectedEof));
    }

    #[test]
    fn rejects_bad_header() {
        let err = load_marshal(b"\x05\x080").unwrap_err();
        assert!(matches!(err, Error::InvalidMarshalHeader(5, 8)));
    }
}
