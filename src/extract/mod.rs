//! Corpus extraction
//!
//! Each walker visits the translatable strings of one file shape. The
//! walkers are written against a replace-callback: the extraction driver
//! passes a recorder that always answers `None`, and the reinsertion
//! driver passes a corpus lookup that answers `Some(translation)`. One
//! traversal therefore defines both directions, so an extracted string
//! and its reinsertion target can never disagree about where text lives.

pub mod commands;
pub mod entities;
pub mod maps;
pub mod plugins;
pub mod system;

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::corpus::Corpus;
use crate::error::Result;
use crate::formats::scripts;
use crate::graph::Labels;
use crate::project::{self, Category, Engine, SourceFile};
use crate::rules::TextRules;

/// Callback applied to each translatable string. Returning `Some`
/// replaces the string in the graph; `None` leaves it untouched.
pub type Replace<'a> = dyn FnMut(&str) -> Option<String> + 'a;

/// Outcome of a batch extraction.
#[derive(Debug)]
pub struct ExtractReport {
    pub engine: Engine,
    /// Files successfully processed.
    pub processed: usize,
    /// Files that failed, with the error message; one bad file does not
    /// abort the rest of the batch.
    pub failed: Vec<(PathBuf, String)>,
    /// Entry count per written corpus.
    pub corpora: Vec<(Category, usize)>,
}

/// Extract every recognized data file under `data_dir` into corpus
/// files under `output_dir`.
///
/// Existing `{category}_trans.txt` files are left alone so a re-run
/// never clobbers in-progress translations; missing ones are created as
/// blank placeholders (pre-filled with the original source for the
/// scripts corpus, where "translation" usually means targeted edits).
///
/// # Errors
/// Returns an error for problems outside any single file: an
/// unrecognizable data directory or an unwritable output directory.
/// Per-file parse failures are collected in the report instead.
pub fn extract_project(
    data_dir: &Path,
    output_dir: &Path,
    rules: &TextRules,
) -> Result<ExtractReport> {
    let engine = Engine::detect(data_dir)?;
    let labels = Labels::for_engine(engine);
    let files = project::scan(data_dir, engine)?;
    std::fs::create_dir_all(output_dir)?;

    let mut corpora: IndexMap<Category, Corpus> = IndexMap::new();
    // Map display names are shared across all map files.
    let mut names = Corpus::new();
    let mut report = ExtractReport {
        engine,
        processed: 0,
        failed: Vec::new(),
        corpora: Vec::new(),
    };

    for file in &files {
        match extract_file(file, engine, &labels, rules, &mut corpora, &mut names) {
            Ok(()) => report.processed += 1,
            Err(err) => {
                warn!(file = %file.path.display(), error = %err, "skipping file");
                report.failed.push((file.path.clone(), err.to_string()));
            }
        }
    }

    for (category, corpus) in &corpora {
        if corpus.is_empty() {
            continue;
        }
        let stem = category.corpus_stem();
        corpus.write_to(output_dir.join(format!("{stem}.txt")))?;
        let trans = output_dir.join(format!("{stem}_trans.txt"));
        if !trans.exists() {
            if *category == Category::Scripts {
                // Script edits start from the original source.
                corpus.write_to(&trans)?;
            } else {
                corpus.write_placeholder(&trans)?;
            }
        }
        report.corpora.push((*category, corpus.len()));
    }
    if !names.is_empty() {
        names.write_to(output_dir.join("names.txt"))?;
        let trans = output_dir.join("names_trans.txt");
        if !trans.exists() {
            names.write_placeholder(&trans)?;
        }
    }

    Ok(report)
}

fn extract_file(
    file: &SourceFile,
    engine: Engine,
    labels: &Labels,
    rules: &TextRules,
    corpora: &mut IndexMap<Category, Corpus>,
    names: &mut Corpus,
) -> Result<()> {
    debug!(file = %file.path.display(), category = %file.category, "extracting");
    let mut root = project::load_file(file, engine)?;
    let corpus = corpora.entry(file.category).or_default();

    if file.category == Category::Scripts {
        for script in scripts::inflate_scripts(&root)? {
            corpus.insert(script.source);
        }
        return Ok(());
    }

    let mut record = |text: &str| -> Option<String> {
        corpus.insert(text.to_string());
        None
    };

    match file.category {
        Category::Maps => {
            let mut record_name = |text: &str| -> Option<String> {
                names.insert(text.to_string());
                None
            };
            maps::walk_map(&mut root, labels, rules, engine, &mut record, &mut record_name)?;
        }
        Category::CommonEvents => {
            entities::walk_common_events(&mut root, labels, rules, engine, &mut record)?;
        }
        Category::Troops => {
            entities::walk_troops(&mut root, labels, rules, engine, &mut record)?;
        }
        Category::System => {
            system::walk_system(&mut root, labels, &mut record)?;
        }
        Category::Plugins => {
            plugins::walk_plugins(&mut root, rules, &mut record)?;
        }
        _ => {
            entities::walk_entity_table(&mut root, labels, file.category, rules, engine, &mut record)?;
        }
    }
    Ok(())
}
