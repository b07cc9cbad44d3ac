//! Reset and reset-and-drop command implementation

use anyhow::{Context, Result};

use crate::cli::GlobalArgs;
use crate::commands::common::plural;
use crate::context::ProjectContext;

/// Execute the reset command, dropping the ledger table afterwards when
/// `drop_ledger` is set
pub fn execute(global: &GlobalArgs, drop_ledger: bool) -> Result<()> {
    let ctx = ProjectContext::new(global)?;
    let db = ctx.open_database()?;
    let migrator = ctx.migrator(&db);

    let result = if drop_ledger {
        migrator.reset_and_drop()
    } else {
        migrator.reset()
    };
    let report = result.context("Failed to reset migrations")?;

    for key in &report.rolled_back {
        println!("Rolled back {}", key);
    }
    for skipped in &report.skipped {
        println!("Skipped {}: {}", skipped.key, skipped.reason);
    }

    if report.rolled_back.is_empty() && report.skipped.is_empty() {
        println!("Nothing to roll back");
    } else {
        println!(
            "Rolled back {}",
            plural(report.rolled_back.len(), "migration")
        );
    }
    if drop_ledger {
        println!("Dropped ledger table {}", migrator.ledger_table());
    }
    Ok(())
}
