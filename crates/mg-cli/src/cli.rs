//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Migra - ordered, reversible SQL schema migrations
#[derive(Parser, Debug)]
#[command(name = "mg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override database path (DuckDB file or :memory:)
    #[arg(short, long, global = true, env = "MIGRA_DATABASE")]
    pub database: Option<String>,

    /// Override migrations directory
    #[arg(long, global = true, env = "MIGRA_DIR")]
    pub dir: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply all pending migrations
    Up,

    /// Roll back the most recently applied migration
    Down,

    /// Roll back every applied migration
    Reset,

    /// Roll back every applied migration, then drop the ledger table
    ResetAndDrop,

    /// Show the most recently applied migration
    Version,

    /// Create a new migration
    Create(CreateArgs),

    /// Insert a migration at an index, renumbering the ones after it
    Insert(InsertArgs),

    /// List migrations and whether they have been applied
    Status(StatusArgs),
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Descriptive migration name, e.g. add_users
    pub name: String,

    /// Sequence index (default: one past the highest existing index)
    pub index: Option<u32>,
}

/// Arguments for the insert command
#[derive(Args, Debug)]
pub struct InsertArgs {
    /// Descriptive migration name
    pub name: String,

    /// Sequence index the new migration takes
    pub index: u32,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Table format
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
