//! CLI progress display utilities

use std::time::Duration;

use indicatif::{HumanDuration, ProgressBar, ProgressStyle};

/// Spinner shown while a batch operation runs.
#[must_use]
pub fn spinner(msg: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(msg.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Print completion message: `Done in 2s`
pub fn print_done(elapsed: Duration) {
    println!("Done in {}", HumanDuration(elapsed));
}
