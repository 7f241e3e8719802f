//! Error types for `rmtext`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `rmtext` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A source file could not be read.
    #[error("failed to read {file}: {source}")]
    ReadFileFailed {
        /// The file that could not be read.
        file: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// An output file could not be written.
    #[error("failed to write {file}: {source}")]
    WriteFileFailed {
        /// The file that could not be written.
        file: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    // ==================== Marshal Format Errors ====================
    /// The file does not start with the marshal 4.8 version header.
    #[error("invalid marshal header: expected 04 08, found {0:02x} {1:02x}")]
    InvalidMarshalHeader(u8, u8),

    /// A marshal type tag this codec does not support.
    ///
    /// Only the record shapes produced by the game editors are supported;
    /// anything else is a decode failure for that file.
    #[error("unsupported marshal tag {tag:?} at offset {offset}")]
    UnsupportedMarshalTag {
        /// The tag byte.
        tag: char,
        /// Stream offset of the tag.
        offset: u64,
    },

    /// A symbol back-reference pointed outside the symbol table.
    #[error("invalid symbol link index: {0}")]
    InvalidSymbolLink(usize),

    /// An object back-reference was encountered.
    ///
    /// The editor save path serializes trees, never shared identities,
    /// so a link means the file was produced by something else.
    #[error("object back-reference at offset {offset} (shared objects are not supported)")]
    ObjectLink {
        /// Stream offset of the link tag.
        offset: u64,
    },

    /// An `I"`-wrapped string carried an encoding ivar other than the
    /// UTF-8 `:E => true` tag, or its bytes did not decode as UTF-8.
    ///
    /// Other encodings have no faithful representation here; accepting
    /// them would break byte-identical re-serialization.
    #[error("unsupported string encoding at offset {offset}")]
    UnsupportedStringEncoding {
        /// Stream offset of the `I` tag.
        offset: u64,
    },

    /// A fixnum did not fit the 4-byte marshal integer encoding.
    #[error("integer {0} out of marshal fixnum range")]
    FixnumOutOfRange(i64),

    /// A hash key was neither an integer, a string, nor a symbol.
    #[error("unsupported hash key shape at offset {offset}")]
    UnsupportedHashKey {
        /// Stream offset of the key.
        offset: u64,
    },

    /// The stream ended in the middle of a record.
    #[error("unexpected end of marshal stream")]
    UnexpectedEof,

    // ==================== JSON Format Errors ====================
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A plugins.js file did not have the expected `var $plugins =` wrapper.
    #[error("malformed plugins file: {0}")]
    MalformedPlugins(String),

    // ==================== Script Block Errors ====================
    /// Zlib inflation of a script blob failed.
    #[error("script {index} ({title}): zlib decompression failed: {message}")]
    ScriptInflateFailed {
        /// Index of the script slot.
        index: usize,
        /// Script title, if it decoded.
        title: String,
        /// The underlying error message.
        message: String,
    },

    /// A script slot did not have the `[id, title, blob]` shape.
    #[error("script slot {0} does not have the [id, title, blob] shape")]
    MalformedScriptSlot(usize),

    // ==================== Corpus Errors ====================
    /// Original and translated corpora have different line counts.
    ///
    /// Surfaced before substitution begins; index pairing would be
    /// corrupted otherwise.
    #[error(
        "corpus mismatch for {category}: {original_lines} original lines vs {translated_lines} translated"
    )]
    CorpusMismatch {
        /// Corpus category name (e.g. "maps").
        category: String,
        /// Line count of the original file.
        original_lines: usize,
        /// Line count of the translation file.
        translated_lines: usize,
    },

    /// A corpus file required for injection does not exist.
    #[error("missing corpus file: {0}")]
    MissingCorpusFile(PathBuf),

    // ==================== File System Errors ====================
    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDir(String),

    /// A path had no recognizable engine extension.
    #[error("unrecognized data file extension: {0}")]
    UnknownExtension(PathBuf),
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDir(err.to_string())
    }
}

/// A specialized Result type for `rmtext` operations.
pub type Result<T> = std::result::Result<T, Error>;
