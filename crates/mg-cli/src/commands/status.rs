//! Status command implementation

use anyhow::{Context, Result};
use mg_engine::StatusReport;
use serde::Serialize;

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common::{plural, print_table};
use crate::context::ProjectContext;

/// JSON document printed by `mg status --output json`
#[derive(Serialize)]
struct StatusJson<'a> {
    migrations_dir: String,
    ledger_table: &'a str,
    #[serde(flatten)]
    report: &'a StatusReport,
}

/// Execute the status command
pub fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::new(global)?;
    let db = ctx.open_database()?;
    let migrator = ctx.migrator(&db);
    let report = migrator
        .status()
        .context("Failed to read migration status")?;

    match args.output {
        StatusOutput::Json => {
            let doc = StatusJson {
                migrations_dir: ctx.migrations_dir.display().to_string(),
                ledger_table: migrator.ledger_table(),
                report: &report,
            };
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        StatusOutput::Table => print_status_table(&report),
    }
    Ok(())
}

fn print_status_table(report: &StatusReport) {
    if report.migrations.is_empty() {
        println!("No migrations found");
    } else {
        let rows: Vec<Vec<String>> = report
            .migrations
            .iter()
            .map(|m| {
                vec![
                    format!("{:03}", m.index),
                    m.directory.clone(),
                    m.state.label().to_string(),
                ]
            })
            .collect();
        print_table(&["INDEX", "MIGRATION", "STATE"], &rows);
        println!();
        println!("{} pending", plural(report.pending_count(), "migration"));
    }

    if !report.orphaned.is_empty() {
        println!();
        println!("Applied but missing on disk:");
        for key in &report.orphaned {
            println!("  {}", key);
        }
    }
}
