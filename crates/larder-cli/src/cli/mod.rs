//! Command-line interface

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use commands::Context;

/// Parse arguments and dispatch to the selected subcommand.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let ctx = Context::from_cli(&cli);

    match cli.command {
        Commands::Report(args) => commands::report::execute(&ctx, args).await,
        Commands::Capture(args) => commands::capture::execute(&ctx, args).await,
        Commands::Config(args) => commands::config::execute(&ctx, &args),
    }
}
