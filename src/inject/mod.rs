//! Translation reinsertion
//!
//! The reverse of extraction: every walker runs again over freshly
//! loaded data files, but the replace-callback now answers with the
//! corpus translation for each visited string. Strings without a
//! translation pass through untouched, dialogue runs are physically
//! collapsed into their first command, and everything the walkers never
//! visit is re-serialized byte-for-byte from the loaded graph.
//!
//! All corpus pairs are loaded and validated before the first file is
//! touched, so a line-count mismatch can never leave a half-written
//! output directory behind.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::corpus::CorpusPair;
use crate::error::Result;
use crate::extract::{entities, maps, plugins, system};
use crate::formats::scripts;
use crate::graph::{Labels, Value};
use crate::project::{self, Category, Engine, SourceFile};
use crate::rules::TextRules;

/// Outcome of a batch reinsertion.
#[derive(Debug)]
pub struct InjectReport {
    pub engine: Engine,
    /// Files written to the output directory.
    pub written: usize,
    /// Files that failed, with the error message.
    pub failed: Vec<(PathBuf, String)>,
    /// Strings actually replaced across all files.
    pub replaced: usize,
}

/// Translation state of one corpus pair, for the verification pass.
#[derive(Debug)]
pub struct PairStatus {
    pub category: String,
    pub entries: usize,
    pub translated: usize,
}

/// Rebuild every data file under `data_dir` with translations from
/// `translation_dir`, writing results to `output_dir`.
///
/// Original data files are never modified; output uses the same file
/// names under `output_dir`.
///
/// # Errors
/// Returns [`crate::Error::CorpusMismatch`] before any output is written when
/// a pair's line counts disagree. Per-file codec failures are collected
/// in the report instead.
pub fn inject_project(
    data_dir: &Path,
    translation_dir: &Path,
    output_dir: &Path,
    rules: &TextRules,
) -> Result<InjectReport> {
    let engine = Engine::detect(data_dir)?;
    let labels = Labels::for_engine(engine);
    let files = project::scan(data_dir, engine)?;
    std::fs::create_dir_all(output_dir)?;

    let lookups = load_lookups(&files, translation_dir)?;

    let mut report = InjectReport {
        engine,
        written: 0,
        failed: Vec::new(),
        replaced: 0,
    };

    for file in &files {
        let out_path = output_dir.join(file.path.file_name().unwrap_or_default());
        match inject_file(file, engine, &labels, rules, &lookups, &out_path) {
            Ok(replaced) => {
                report.written += 1;
                report.replaced += replaced;
            }
            Err(err) => {
                warn!(file = %file.path.display(), error = %err, "skipping file");
                report.failed.push((file.path.clone(), err.to_string()));
            }
        }
    }
    Ok(report)
}

/// Load and validate the translation state of every corpus pair under
/// `translation_dir`.
///
/// # Errors
/// Returns [`crate::Error::CorpusMismatch`] for the first pair whose line
/// counts disagree.
pub fn verify_translations(translation_dir: &Path) -> Result<Vec<PairStatus>> {
    let mut statuses = Vec::new();
    for stem in corpus_stems() {
        let original = translation_dir.join(format!("{stem}.txt"));
        if !original.exists() {
            continue;
        }
        let translated = translation_dir.join(format!("{stem}_trans.txt"));
        let pair = CorpusPair::load(stem, &original, &translated)?;
        let translated_count = pair.translated.iter().filter(|t| !t.is_empty()).count();
        statuses.push(PairStatus {
            category: stem.to_string(),
            entries: pair.len(),
            translated: translated_count,
        });
    }
    Ok(statuses)
}

fn corpus_stems() -> impl Iterator<Item = &'static str> {
    [
        "maps",
        "names",
        "actors",
        "armors",
        "classes",
        "commonevents",
        "enemies",
        "items",
        "skills",
        "states",
        "troops",
        "weapons",
        "system",
        "scripts",
        "plugins",
    ]
    .into_iter()
}

/// Per-category translation lookup, plus the shared names lookup.
struct Lookups {
    by_category: IndexMap<Category, HashMap<String, String>>,
    names: HashMap<String, String>,
}

impl Lookups {
    fn category(&self, category: Category) -> Option<&HashMap<String, String>> {
        self.by_category.get(&category)
    }
}

fn load_lookups(files: &[SourceFile], translation_dir: &Path) -> Result<Lookups> {
    let mut by_category = IndexMap::new();
    for file in files {
        if by_category.contains_key(&file.category) {
            continue;
        }
        let stem = file.category.corpus_stem();
        match load_pair(stem, translation_dir)? {
            Some(lookup) => {
                by_category.insert(file.category, lookup);
            }
            None => {
                warn!(category = %file.category, "no corpus pair; leaving category untouched");
            }
        }
    }
    let names = load_pair("names", translation_dir)?.unwrap_or_default();
    Ok(Lookups { by_category, names })
}

fn load_pair(stem: &str, translation_dir: &Path) -> Result<Option<HashMap<String, String>>> {
    let original = translation_dir.join(format!("{stem}.txt"));
    let translated = translation_dir.join(format!("{stem}_trans.txt"));
    if !original.exists() {
        return Ok(None);
    }
    let pair = CorpusPair::load(stem, &original, &translated)?;
    let lookup = pair
        .lookup()
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Ok(Some(lookup))
}

fn inject_file(
    file: &SourceFile,
    engine: Engine,
    labels: &Labels,
    rules: &TextRules,
    lookups: &Lookups,
    out_path: &Path,
) -> Result<usize> {
    debug!(file = %file.path.display(), category = %file.category, "injecting");
    let mut root = project::load_file(file, engine)?;
    let mut replaced = 0usize;

    if file.category == Category::Scripts {
        replaced = inject_scripts(&mut root, lookups)?;
        project::save_file(file, engine, &root, out_path)?;
        return Ok(replaced);
    }

    let empty = HashMap::new();
    let lookup = lookups.category(file.category).unwrap_or(&empty);
    let mut translate = |text: &str| -> Option<String> {
        let translated = lookup.get(text).cloned();
        if translated.is_some() {
            replaced += 1;
        }
        translated
    };

    match file.category {
        Category::Maps => {
            let mut names_replaced = 0usize;
            let mut translate_name = |text: &str| -> Option<String> {
                let translated = lookups.names.get(text).cloned();
                if translated.is_some() {
                    names_replaced += 1;
                }
                translated
            };
            maps::walk_map(&mut root, labels, rules, engine, &mut translate, &mut translate_name)?;
            drop(translate);
            drop(translate_name);
            replaced += names_replaced;
        }
        Category::CommonEvents => {
            entities::walk_common_events(&mut root, labels, rules, engine, &mut translate)?;
            drop(translate);
        }
        Category::Troops => {
            entities::walk_troops(&mut root, labels, rules, engine, &mut translate)?;
            drop(translate);
        }
        Category::System => {
            system::walk_system(&mut root, labels, &mut translate)?;
            drop(translate);
        }
        Category::Plugins => {
            plugins::walk_plugins(&mut root, rules, &mut translate)?;
            drop(translate);
        }
        _ => {
            entities::walk_entity_table(&mut root, labels, file.category, rules, engine, &mut translate)?;
            drop(translate);
        }
    }

    project::save_file(file, engine, &root, out_path)?;
    Ok(replaced)
}

/// Substitute translated script sources, re-deflating only the slots
/// whose text actually changed. Untouched slots keep their original
/// compressed bytes, so an untranslated archive round-trips exactly.
fn inject_scripts(root: &mut Value, lookups: &Lookups) -> Result<usize> {
    let empty = HashMap::new();
    let lookup = lookups.category(Category::Scripts).unwrap_or(&empty);
    let mut replaced = 0usize;

    let scripts = scripts::inflate_scripts(root)?;
    for script in &scripts {
        let Some(translated) = lookup.get(&script.source) else {
            continue;
        };
        if translated != &script.source {
            scripts::deflate_into_slot(root, script.index, translated)?;
            replaced += 1;
        }
    }
    Ok(replaced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::extract;
    use crate::graph::accessor;
    use crate::formats::marshal;
    use crate::graph::{HashKey, Object};
    use pretty_assertions::assert_eq;

    fn command(code: i64, params: Vec<Value>) -> Value {
        let mut ivars = indexmap::IndexMap::new();
        ivars.insert("@code".to_string(), Value::Int(code));
        ivars.insert("@parameters".to_string(), Value::Array(params));
        Value::Object(Object {
            class: "RPG::EventCommand".to_string(),
            ivars,
        })
    }

    fn sample_map() -> Value {
        let page = {
            let mut ivars = indexmap::IndexMap::new();
            ivars.insert(
                "@list".to_string(),
                Value::Array(vec![
                    command(401, vec![Value::Bytes(b"Hello,".to_vec())]),
                    command(401, vec![Value::Bytes(b"world!".to_vec())]),
                    command(
                        102,
                        vec![Value::Array(vec![
                            Value::Bytes(b"Yes".to_vec()),
                            Value::Bytes(b"No".to_vec()),
                        ])],
                    ),
                ]),
            );
            Value::Object(Object {
                class: "RPG::Event::Page".to_string(),
                ivars,
            })
        };
        let event = {
            let mut ivars = indexmap::IndexMap::new();
            ivars.insert("@pages".to_string(), Value::Array(vec![page]));
            Value::Object(Object {
                class: "RPG::Event".to_string(),
                ivars,
            })
        };
        let mut events = indexmap::IndexMap::new();
        events.insert(HashKey::Int(1), event);
        let mut ivars = indexmap::IndexMap::new();
        ivars.insert("@events".to_string(), Value::Hash(events));
        Value::Object(Object {
            class: "RPG::Map".to_string(),
            ivars,
        })
    }

    #[test]
    fn extract_then_inject_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        let text = dir.path().join("text");
        let out = dir.path().join("out");
        std::fs::create_dir_all(&data).unwrap();

        marshal::write_marshal_file(data.join("Map001.rvdata2"), &sample_map()).unwrap();

        let rules = TextRules::default();
        let report = extract::extract_project(&data, &text, &rules).unwrap();
        assert_eq!(report.processed, 1);

        let corpus = std::fs::read_to_string(text.join("maps.txt")).unwrap();
        assert_eq!(corpus, "Hello,\\#world!\nYes\nNo");

        std::fs::write(text.join("maps_trans.txt"), "Bonjour\\#le monde !\nOui\n").unwrap();

        let report = inject_project(&data, &text, &out, &rules).unwrap();
        assert_eq!(report.written, 1);
        assert_eq!(report.replaced, 2);

        let root = marshal::read_marshal_file(out.join("Map001.rvdata2")).unwrap();
        let events = accessor::get(&root, "events").unwrap();
        let Value::Hash(events) = events else { panic!() };
        let event = &events[&HashKey::Int(1)];
        let pages = accessor::get(event, "pages").unwrap().as_array().unwrap();
        let list = accessor::get(&pages[0], "list").unwrap().as_array().unwrap();

        // Run collapsed to a single command holding the translation.
        assert_eq!(list.len(), 2);
        let labels = Labels::for_engine(Engine::VxAce);
        assert_eq!(
            crate::graph::dialogue::parameter_text(&list[0], &labels, 0).unwrap(),
            "Bonjour\nle monde !"
        );
        // Translated choice replaced, untranslated one passed through.
        let params = crate::graph::dialogue::parameters(&list[1], &labels).unwrap();
        let choices = params[0].as_array().unwrap();
        assert_eq!(choices[0], Value::Bytes(b"Oui".to_vec()));
        assert_eq!(choices[1], Value::Bytes(b"No".to_vec()));
    }

    #[test]
    fn corpus_mismatch_aborts_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        let text = dir.path().join("text");
        let out = dir.path().join("out");
        std::fs::create_dir_all(&data).unwrap();

        marshal::write_marshal_file(data.join("Map001.rvdata2"), &sample_map()).unwrap();
        std::fs::create_dir_all(&text).unwrap();
        std::fs::write(text.join("maps.txt"), "a\nb").unwrap();
        std::fs::write(text.join("maps_trans.txt"), "x").unwrap();

        let err = inject_project(&data, &text, &out, &TextRules::default()).unwrap_err();
        assert!(matches!(err, Error::CorpusMismatch { .. }));
        assert!(std::fs::read_dir(&out).unwrap().next().is_none());
    }

    #[test]
    fn verify_reports_translation_counts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("items.txt"), "Potion\nEther").unwrap();
        std::fs::write(dir.path().join("items_trans.txt"), "Potion de soin\n").unwrap();

        let statuses = verify_translations(dir.path()).unwrap();
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].category, "items");
        assert_eq!(statuses[0].entries, 2);
        assert_eq!(statuses[0].translated, 1);
    }
}
