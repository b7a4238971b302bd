//! GameText CLI - Command-line interface for game string files

pub mod commands;

use clap::Parser;
use commands::Commands;

#[derive(Parser)]
#[command(name = "gametext")]
#[command(about = "GameText: inspect and convert .str/.csf string files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Run the GameText CLI
pub fn run_cli() -> anyhow::Result<()> {
    // Setup logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    cli.command.execute()?;

    Ok(())
}
