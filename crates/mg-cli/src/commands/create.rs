//! Create command implementation

use anyhow::{Context, Result};

use crate::cli::{CreateArgs, GlobalArgs};
use crate::commands::common::print_created;
use crate::context::ProjectContext;

/// Execute the create command
pub fn execute(args: &CreateArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::new(global)?;
    let unit = mg_engine::create(&ctx.store(), &args.name, args.index)
        .with_context(|| format!("Failed to create migration '{}'", args.name))?;

    print_created(&unit);
    Ok(())
}
