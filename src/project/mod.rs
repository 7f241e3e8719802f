//! Game project layout: engine detection, file classification, codec dispatch
//!
//! A project's `Data/` (or `data/`) directory holds one serialized file
//! per database table plus one per map. Which codec applies is decided
//! purely by extension; which walker applies is decided purely by file
//! name. Classification is a closed set - files outside it are skipped,
//! never guessed at.

use std::fmt;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::formats::{json, marshal};
use crate::graph::Value;

/// Engine generation, inferred from data-file extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    /// `.rxdata` (marshal).
    Xp,
    /// `.rvdata` (marshal).
    Vx,
    /// `.rvdata2` (marshal).
    VxAce,
    /// `.json` (MV/MZ).
    Mv,
}

impl Engine {
    /// Whether this generation stores its data as JSON.
    #[must_use]
    pub fn is_json(self) -> bool {
        matches!(self, Self::Mv)
    }

    /// The generation's data-file extension, without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Xp => "rxdata",
            Self::Vx => "rvdata",
            Self::VxAce => "rvdata2",
            Self::Mv => "json",
        }
    }

    /// Map a data-file extension to its engine generation.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "rxdata" => Some(Self::Xp),
            "rvdata" => Some(Self::Vx),
            "rvdata2" => Some(Self::VxAce),
            "json" => Some(Self::Mv),
            _ => None,
        }
    }

    /// Detect the engine by scanning `data_dir` for a known extension.
    ///
    /// # Errors
    /// Returns [`Error::UnknownExtension`] when no file in the directory
    /// carries a recognized data extension.
    pub fn detect<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        for entry in WalkDir::new(data_dir.as_ref()).max_depth(1) {
            let entry = entry?;
            let Some(ext) = entry.path().extension().and_then(|e| e.to_str()) else {
                continue;
            };
            if let Some(engine) = Self::from_extension(ext) {
                return Ok(engine);
            }
        }
        Err(Error::UnknownExtension(data_dir.as_ref().to_path_buf()))
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Xp => "XP",
            Self::Vx => "VX",
            Self::VxAce => "VX Ace",
            Self::Mv => "MV/MZ",
        };
        f.write_str(name)
    }
}

/// Which walker and corpus a data file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// `MapNNN` files; also produces the shared names corpus.
    Maps,
    Actors,
    Armors,
    Classes,
    CommonEvents,
    Enemies,
    Items,
    Skills,
    States,
    Troops,
    Weapons,
    /// `System` database file.
    System,
    /// `Scripts` archive (marshal engines only).
    Scripts,
    /// `plugins.js` (JSON engines only).
    Plugins,
}

impl Category {
    /// Corpus file stem: `{stem}.txt` / `{stem}_trans.txt`.
    #[must_use]
    pub fn corpus_stem(self) -> &'static str {
        match self {
            Self::Maps => "maps",
            Self::Actors => "actors",
            Self::Armors => "armors",
            Self::Classes => "classes",
            Self::CommonEvents => "commonevents",
            Self::Enemies => "enemies",
            Self::Items => "items",
            Self::Skills => "skills",
            Self::States => "states",
            Self::Troops => "troops",
            Self::Weapons => "weapons",
            Self::System => "system",
            Self::Scripts => "scripts",
            Self::Plugins => "plugins",
        }
    }

    /// Whether entries of this category go through the entity walker.
    #[must_use]
    pub fn is_entity_table(self) -> bool {
        matches!(
            self,
            Self::Actors
                | Self::Armors
                | Self::Classes
                | Self::Enemies
                | Self::Items
                | Self::Skills
                | Self::States
                | Self::Weapons
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.corpus_stem())
    }
}

/// Classify a data file by its stem.
///
/// `MapNNN` requires every character after `Map` to be a digit, so
/// `MapInfos` never matches. Tables with no translatable text
/// (`Tilesets`, `Animations`, `MapInfos`, `Areas`) return `None` and are
/// skipped by the batch drivers.
#[must_use]
pub fn classify(stem: &str) -> Option<Category> {
    if let Some(rest) = stem.strip_prefix("Map") {
        if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
            return Some(Category::Maps);
        }
    }
    match stem {
        "Actors" => Some(Category::Actors),
        "Armors" => Some(Category::Armors),
        "Classes" => Some(Category::Classes),
        "CommonEvents" => Some(Category::CommonEvents),
        "Enemies" => Some(Category::Enemies),
        "Items" => Some(Category::Items),
        "Skills" => Some(Category::Skills),
        "States" => Some(Category::States),
        "Troops" => Some(Category::Troops),
        "Weapons" => Some(Category::Weapons),
        "System" => Some(Category::System),
        "Scripts" | "xScripts" => Some(Category::Scripts),
        "plugins" => Some(Category::Plugins),
        _ => None,
    }
}

/// One classified data file found by [`scan`].
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub category: Category,
}

/// Find and classify every recognized data file under `data_dir`.
///
/// Files are returned sorted by path so every run visits them in the
/// same order, which keeps corpus entry order deterministic.
///
/// # Errors
/// Returns [`Error::WalkDir`] when the directory cannot be traversed.
pub fn scan<P: AsRef<Path>>(data_dir: P, engine: Engine) -> Result<Vec<SourceFile>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(data_dir.as_ref()).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        let matches_engine = match engine {
            Engine::Mv => ext == "json" || ext == "js",
            _ => ext == engine.extension(),
        };
        if !matches_engine {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if let Some(category) = classify(stem) {
            // Scripts exist only in the marshal generations, plugins
            // only in the JSON one.
            let valid = match category {
                Category::Scripts => !engine.is_json(),
                Category::Plugins => engine.is_json() && ext == "js",
                _ => ext != "js",
            };
            if valid {
                files.push(SourceFile {
                    path: path.to_path_buf(),
                    category,
                });
            }
        }
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// Load one data file into the in-memory graph, dispatching on codec.
///
/// # Errors
/// Propagates the codec's parse errors.
pub fn load_file(file: &SourceFile, engine: Engine) -> Result<Value> {
    if engine.is_json() {
        if file.category == Category::Plugins {
            json::read_plugins_file(&file.path)
        } else {
            json::read_json_file(&file.path)
        }
    } else {
        marshal::read_marshal_file(&file.path)
    }
}

/// Serialize one graph back to disk in its source codec.
///
/// # Errors
/// Propagates the codec's encode and write errors.
pub fn save_file(file: &SourceFile, engine: Engine, root: &Value, out_path: &Path) -> Result<()> {
    if engine.is_json() {
        if file.category == Category::Plugins {
            json::write_plugins_file(out_path, root)
        } else {
            json::write_json_file(out_path, root)
        }
    } else {
        marshal::write_marshal_file(out_path, root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn map_stems_require_all_digits() {
        assert_eq!(classify("Map001"), Some(Category::Maps));
        assert_eq!(classify("Map123"), Some(Category::Maps));
        assert_eq!(classify("MapInfos"), None);
        assert_eq!(classify("Map"), None);
        assert_eq!(classify("Map01a"), None);
    }

    #[test]
    fn untranslatable_tables_are_skipped() {
        assert_eq!(classify("Tilesets"), None);
        assert_eq!(classify("Animations"), None);
        assert_eq!(classify("Areas"), None);
        assert_eq!(classify("System"), Some(Category::System));
    }

    #[test]
    fn engine_detection_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Actors.rvdata2"), b"").unwrap();
        assert_eq!(Engine::detect(dir.path()).unwrap(), Engine::VxAce);

        let empty = tempfile::tempdir().unwrap();
        assert!(matches!(
            Engine::detect(empty.path()),
            Err(Error::UnknownExtension(_))
        ));
    }

    #[test]
    fn scan_classifies_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["Map002.rvdata2", "Map001.rvdata2", "Actors.rvdata2", "Tilesets.rvdata2"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let files = scan(dir.path(), Engine::VxAce).unwrap();
        let stems: Vec<_> = files
            .iter()
            .map(|f| f.path.file_stem().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(stems, vec!["Actors", "Map001", "Map002"]);
    }

    #[test]
    fn scripts_only_in_marshal_generations() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Scripts.json"), b"{}").unwrap();
        std::fs::write(dir.path().join("plugins.js"), b"var $plugins = [];").unwrap();
        let files = scan(dir.path(), Engine::Mv).unwrap();
        let categories: Vec<_> = files.iter().map(|f| f.category).collect();
        assert_eq!(categories, vec![Category::Plugins]);
    }
}
