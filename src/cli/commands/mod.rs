pub mod check;
pub mod extract;
pub mod inject;

use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Extract translatable text from a game's data directory
    Extract {
        /// Game data directory (Data/ or data/)
        #[arg(short, long)]
        data: PathBuf,

        /// Output directory for corpus files
        #[arg(short, long)]
        output: PathBuf,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Rebuild data files with translations applied
    Inject {
        /// Game data directory (Data/ or data/)
        #[arg(short, long)]
        data: PathBuf,

        /// Directory holding the corpus pairs
        #[arg(short, long)]
        translations: PathBuf,

        /// Output directory for rebuilt data files
        #[arg(short, long)]
        output: PathBuf,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Report translation coverage of the corpus pairs
    Check {
        /// Directory holding the corpus pairs
        #[arg(short, long)]
        translations: PathBuf,
    },
}

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Extract {
                data,
                output,
                quiet,
            } => extract::execute(data, output, *quiet),
            Commands::Inject {
                data,
                translations,
                output,
                quiet,
            } => inject::execute(data, translations, output, *quiet),
            Commands::Check { translations } => check::execute(translations),
        }
    }
}
