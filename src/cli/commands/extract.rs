//! CLI command for corpus extraction

use std::path::Path;
use std::time::Instant;

use crate::cli::progress;
use crate::extract::extract_project;
use crate::rules::TextRules;

/// Extract every data file under `data` into corpus files under `output`.
pub fn execute(data: &Path, output: &Path, quiet: bool) -> anyhow::Result<()> {
    let started = Instant::now();
    let bar = (!quiet).then(|| progress::spinner("Extracting text..."));

    let report = extract_project(data, output, &TextRules::default())?;

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    if !quiet {
        println!("Engine: {}", report.engine);
        println!("Processed {} file(s)", report.processed);
        for (category, entries) in &report.corpora {
            println!("  {category}: {entries} entries");
        }
        for (path, message) in &report.failed {
            eprintln!("Failed {}: {message}", path.display());
        }
        progress::print_done(started.elapsed());
    }
    if report.failed.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("{} file(s) failed", report.failed.len())
    }
}
