//! Insert command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, InsertArgs};
use crate::commands::common::print_created;
use crate::context::ProjectContext;

/// Execute the insert command
pub fn execute(args: &InsertArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::new(global)?;
    let report = mg_engine::insert(&ctx.store(), &args.name, args.index).with_context(|| {
        format!(
            "Failed to insert migration '{}' at {:03}",
            args.name, args.index
        )
    })?;

    for renamed in &report.renamed {
        println!("Renamed {} -> {}", renamed.from, renamed.to);
    }
    print_created(&report.created);
    Ok(())
}
