//! Version command implementation

use anyhow::{Context, Result};
use mg_engine::VersionInfo;

use crate::cli::GlobalArgs;
use crate::context::ProjectContext;

/// Execute the version command
pub fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::new(global)?;
    let db = ctx.open_database()?;
    let info = ctx
        .migrator(&db)
        .version()
        .context("Failed to read schema version")?;

    match info {
        VersionInfo::NoneApplied => println!("No migrations applied"),
        VersionInfo::Latest { key, directory } => {
            if let Some(directory) = directory {
                println!("Current version: {}", directory);
            }
            println!("Latest migration: {}", key);
        }
    }
    Ok(())
}
