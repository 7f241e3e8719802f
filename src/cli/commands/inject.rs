//! CLI command for translation reinsertion

use std::path::Path;
use std::time::Instant;

use crate::cli::progress;
use crate::inject::inject_project;
use crate::rules::TextRules;

/// Rebuild the data files under `data` with translations from
/// `translations`, writing into `output`.
pub fn execute(data: &Path, translations: &Path, output: &Path, quiet: bool) -> anyhow::Result<()> {
    let started = Instant::now();
    let bar = (!quiet).then(|| progress::spinner("Applying translations..."));

    let report = inject_project(data, translations, output, &TextRules::default())?;

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    if !quiet {
        println!("Engine: {}", report.engine);
        println!(
            "Wrote {} file(s), replaced {} string(s)",
            report.written, report.replaced
        );
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
