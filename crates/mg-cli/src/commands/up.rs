//! Up command implementation

use anyhow::{Context, Result};

use crate::cli::GlobalArgs;
use crate::commands::common::plural;
use crate::context::ProjectContext;

/// Execute the up command
pub fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::new(global)?;
    let db = ctx.open_database()?;
    let report = ctx
        .migrator(&db)
        .up()
        .context("Failed to apply migrations")?;

    for key in &report.applied {
        println!("Applied {}", key);
    }
    for key in &report.skipped_empty {
        println!("Skipped {} (up file is empty)", key);
    }

    if report.is_noop() {
        println!("No pending migrations");
    } else {
        println!("Applied {}", plural(report.applied.len(), "migration"));
    }
    Ok(())
}
