//! Translation corpora
//!
//! A corpus is an insertion-ordered, deduplicated sequence of
//! translatable strings. On disk it is one entry per line; embedded
//! newlines are encoded with the `\#` sentinel so a multi-line dialogue
//! run still occupies exactly one line. Each `{category}.txt` is paired
//! with a `{category}_trans.txt` of identical line count, and index `i`
//! of one corresponds to index `i` of the other - the pairing, not the
//! string value, is the unit of translation state.

use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexSet;

use crate::error::{Error, Result};

/// Sentinel that encodes a newline inside a single corpus line.
pub const NEWLINE_SENTINEL: &str = r"\#";

/// Replace real line breaks with the on-disk sentinel.
#[must_use]
pub fn encode_newlines(text: &str) -> String {
    text.replace("\r\n", NEWLINE_SENTINEL)
        .replace(['\r', '\n'], NEWLINE_SENTINEL)
}

/// Replace the on-disk sentinel with real newlines.
#[must_use]
pub fn decode_newlines(line: &str) -> String {
    line.replace(NEWLINE_SENTINEL, "\n")
}

/// Insertion-ordered deduplicated set of translatable strings.
///
/// First occurrence wins the position; later identical occurrences are
/// not re-added, so two graph occurrences of the same string always
/// resolve to the same translated value.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    entries: IndexSet<String>,
}

impl Corpus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry; duplicates and empty strings are ignored.
    pub fn insert(&mut self, entry: String) {
        if !entry.is_empty() {
            self.entries.insert(entry);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Write the corpus, one sentinel-encoded entry per line.
    ///
    /// # Errors
    /// Returns [`Error::WriteFileFailed`] if the file cannot be written.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.iter().map(encode_newlines).collect::<Vec<_>>().join("\n");
        std::fs::write(&path, content).map_err(|source| Error::WriteFileFailed {
            file: path.as_ref().to_path_buf(),
            source,
        })
    }

    /// Write the matching translation placeholder: the same number of
    /// lines, each blank, ready for a translator to fill in.
    ///
    /// # Errors
    /// Returns [`Error::WriteFileFailed`] if the file cannot be written.
    pub fn write_placeholder<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = "\n".repeat(self.entries.len().saturating_sub(1));
        std::fs::write(&path, content).map_err(|source| Error::WriteFileFailed {
            file: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// A loaded original/translated corpus pair with verified line counts.
#[derive(Debug, Clone)]
pub struct CorpusPair {
    /// Category name, for error context.
    pub category: String,
    /// Original entries, sentinel-decoded.
    pub original: Vec<String>,
    /// Translated entries, sentinel-decoded, same length as `original`.
    pub translated: Vec<String>,
}

impl CorpusPair {
    /// Load and pair `{category}.txt` with `{category}_trans.txt`.
    ///
    /// The line-count invariant is checked here, before any substitution
    /// can begin; a mismatch would silently corrupt every lookup past
    /// the divergence point.
    ///
    /// # Errors
    /// Returns [`Error::MissingCorpusFile`] if either file is absent and
    /// [`Error::CorpusMismatch`] if the line counts differ.
    pub fn load<P: AsRef<Path>>(category: &str, original: P, translated: P) -> Result<Self> {
        let original_lines = read_lines(original.as_ref())?;
        let translated_lines = read_lines(translated.as_ref())?;

        if original_lines.len() != translated_lines.len() {
            return Err(Error::CorpusMismatch {
                category: category.to_string(),
                original_lines: original_lines.len(),
                translated_lines: translated_lines.len(),
            });
        }

        Ok(Self {
            category: category.to_string(),
            original: original_lines,
            translated: translated_lines,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.original.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.original.is_empty()
    }

    /// Index-zipped `original -> translated` lookup.
    ///
    /// Entries whose translation is empty are left out: an absent key is
    /// the "missing translation" case and the caller passes the source
    /// text through unchanged.
    #[must_use]
    pub fn lookup(&self) -> HashMap<&str, &str> {
        self.original
            .iter()
            .zip(&self.translated)
            .filter(|(original, translated)| !translated.is_empty() && !original.is_empty())
            .map(|(original, translated)| (original.as_str(), translated.as_str()))
            .collect()
    }
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(Error::MissingCorpusFile(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|source| Error::ReadFileFailed {
        file: path.to_path_buf(),
        source,
    })?;
    if content.is_empty() {
        return Ok(Vec::new());
    }
    Ok(content.split('\n').map(decode_newlines).collect())
}
