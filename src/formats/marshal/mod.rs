//! Ruby Marshal 4.8 subset codec
//!
//! The legacy engine generations persist their data files with Ruby's
//! `Marshal` format. This codec covers exactly the record shapes those
//! editors emit: nil/bool/fixnum/float, strings (raw and UTF-8-tagged),
//! symbols with back-references, arrays, integer/symbol-keyed hashes,
//! plain objects, and opaque `_dump` payloads (`Table`, `Color`, `Tone`)
//! which pass through untouched.
//!
//! It is deliberately not a general marshalling library. Tags outside
//! that set fail decoding for the file at hand.

mod reader;
mod writer;

pub use reader::{load_marshal, read_marshal_file};
pub use writer::{dump_marshal, write_marshal_file};

/// Marshal format version header (major, minor).
pub const MARSHAL_VERSION: [u8; 2] = [4, 8];

/// Type tag bytes used by the supported subset.
pub(crate) mod tag {
    pub const NIL: u8 = b'0';
    pub const TRUE: u8 = b'T';
    pub const FALSE: u8 = b'F';
    pub const FIXNUM: u8 = b'i';
    pub const FLOAT: u8 = b'f';
    pub const STRING: u8 = b'"';
    pub const SYMBOL: u8 = b':';
    pub const SYMLINK: u8 = b';';
    pub const ARRAY: u8 = b'[';
    pub const HASH: u8 = b'{';
    pub const OBJECT: u8 = b'o';
    pub const IVAR: u8 = b'I';
    pub const USERDEF: u8 = b'u';
    pub const LINK: u8 = b'@';
}

/// Name of the encoding instance variable carried by UTF-8 strings.
pub(crate) const ENCODING_IVAR: &str = "E";
