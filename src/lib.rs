//! # rmtext
//!
//! A pure-Rust library for extracting and reinserting the translatable
//! text of RPG Maker games (XP, VX, VX Ace, MV/MZ).
//!
//! ## Pipeline
//!
//! - **Extract** - walk every data file and collect player-visible
//!   strings into plain-text corpus files, one entry per line
//! - **Translate** - fill in the paired `{category}_trans.txt` files by
//!   hand or with any external tool
//! - **Inject** - rebuild the data files with translations substituted,
//!   leaving everything untranslated byte-identical
//!
//! ## Supported Formats
//!
//! - **Marshal data files** - `.rxdata` / `.rvdata` / `.rvdata2`
//!   (Ruby Marshal 4.8, the subset the editors emit)
//! - **JSON data files** - MV/MZ `data/*.json` and `plugins.js`
//! - **Scripts archives** - zlib-deflated script triples
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use rmtext::extract::extract_project;
//! use rmtext::inject::inject_project;
//! use rmtext::rules::TextRules;
//!
//! let rules = TextRules::default();
//! let report = extract_project(Path::new("Data"), Path::new("text"), &rules)?;
//! println!("{} corpora written", report.corpora.len());
//!
//! // ... translate the *_trans.txt files ...
//!
//! inject_project(Path::new("Data"), Path::new("text"), Path::new("out"), &rules)?;
//! # Ok::<(), rmtext::Error>(())
//! ```
//!
//! ### Using the Prelude
//!
//! ```
//! use rmtext::prelude::*;
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `rmtext` command-line binary

pub mod corpus;
pub mod error;
pub mod extract;
pub mod formats;
pub mod graph;
pub mod inject;
pub mod project;
pub mod rules;

#[cfg(feature = "cli")]
pub mod cli;

// Re-exports for convenience
pub use error::{Error, Result};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    pub use crate::corpus::{Corpus, CorpusPair};
    pub use crate::error::{Error, Result};
    pub use crate::extract::{extract_project, ExtractReport};
    pub use crate::graph::{accessor, dialogue, HashKey, Labels, Object, Value};
    pub use crate::inject::{inject_project, verify_translations, InjectReport};
    pub use crate::project::{Category, Engine};
    pub use crate::rules::TextRules;
}
