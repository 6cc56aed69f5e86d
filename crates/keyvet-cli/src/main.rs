//! Keyvet CLI - Command-line keystore signing pre-flight verifier.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);
    let show_progress = !cli.quiet && !cli.json;

    match &cli.command {
        cli::Commands::Check(args) => commands::check::execute(args, &*formatter, show_progress),
        cli::Commands::StoreType(args) => commands::store_type::execute(args, &*formatter),
        cli::Commands::Aliases(args) => commands::aliases::execute(args, &*formatter),
        cli::Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            Ok(())
        }
    }
}
