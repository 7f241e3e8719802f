//! rmtext CLI - Command-line interface for game-text extraction tools

pub mod commands;
pub mod progress;

use clap::Parser;
use commands::Commands;

#[derive(Parser)]
#[command(name = "rmtext")]
#[command(about = "rmtext: extract and reinsert RPG Maker game text", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Run the rmtext CLI
pub fn run_cli() -> anyhow::Result<()> {
    // Setup logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    cli.command.execute()?;

    Ok(())
}
