//! Migra CLI - numbered, reversible SQL migrations

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod context;

use cli::{Cli, Commands};
use commands::{create, down, insert, reset, status, up, version};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    match &cli.command {
        Commands::Up => up::execute(&cli.global),
        Commands::Down => down::execute(&cli.global),
        Commands::Reset => reset::execute(&cli.global, false),
        Commands::ResetAndDrop => reset::execute(&cli.global, true),
        Commands::Version => version::execute(&cli.global),
        Commands::Create(args) => create::execute(args, &cli.global),
        Commands::Insert(args) => insert::execute(args, &cli.global),
        Commands::Status(args) => status::execute(args, &cli.global),
    }
}

/// Route library `log` output to stderr. `RUST_LOG` takes precedence over
/// `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}
