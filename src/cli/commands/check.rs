//! CLI command for translation coverage reporting

use std::path::Path;

use crate::inject::verify_translations;

/// Report per-category translation coverage for the corpus pairs under
/// `translations`. Exits with an error on a malformed pair, so this
/// doubles as a pre-inject sanity check.
#[allow(clippy::cast_precision_loss)]
pub fn execute(translations: &Path) -> anyhow::Result<()> {
    let statuses = verify_translations(translations)?;
    if statuses.is_empty() {
        println!("No corpus files found in {}", translations.display());
        return Ok(());
    }
    for status in &statuses {
        let percent = if status.entries == 0 {
            100.0
        } else {
            status.translated as f64 / status.entries as f64 * 100.0
        };
        println!(
            "{:<14} {:>6}/{:<6} {percent:>5.1}%",
            status.category, status.translated, status.entries
        );
    }
    Ok(())
}
