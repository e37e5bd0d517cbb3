//! lore CLI - process topic documents and search code samples
//!
//! This is the main entry point for the lore command-line interface.
//! Command implementations live in [`commands`], one module per command.

use anyhow::Result;
use clap::Parser;
use lore_core::Config;

mod cli;
mod commands;
mod output;
mod utils;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    utils::logging::initialize_logging(&cli)?;
    let config = utils::input::load_config(cli.config.as_deref())?;

    execute_command(&cli, &config).await
}

async fn execute_command(cli: &Cli, config: &Config) -> Result<()> {
    let format = cli.command.format().resolve();

    match &cli.command {
        Commands::Process(args) => commands::process_document(args, config, format),
        Commands::Toc(args) => commands::show_toc(args, format),
        Commands::Index(args) => commands::build_index(args, format).await,
        Commands::Search(args) => commands::search(args, config, format).await,
        Commands::Patterns(args) => commands::find_patterns(args, format).await,
        Commands::Related(args) => commands::find_related(args, config, format).await,
        Commands::Vocab(args) => commands::detect_vocabulary(args, config, format),
    }
}
