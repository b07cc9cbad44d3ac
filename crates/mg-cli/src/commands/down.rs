//! Down command implementation

use anyhow::{Context, Result};
use mg_engine::DownOutcome;

use crate::cli::GlobalArgs;
use crate::context::ProjectContext;

/// Execute the down command
pub fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::new(global)?;
    let db = ctx.open_database()?;
    let outcome = ctx
        .migrator(&db)
        .down()
        .context("Failed to roll back migration")?;

    match outcome {
        DownOutcome::NothingToRollBack => println!("Nothing to roll back"),
        DownOutcome::RolledBack {
            key,
            executed_sql: true,
        } => println!("Rolled back {}", key),
        DownOutcome::RolledBack {
            key,
            executed_sql: false,
        } => println!("Rolled back {} (down file is empty, ledger entry removed)", key),
    }
    Ok(())
}
