//! Apply pending migrations.

use crate::error::{MigrateError, MigrateResult};
use crate::report::UpReport;
use mg_core::{MigrationKey, MigrationStore};
use mg_db::{with_transaction, Ledger};

/// Apply every pending migration in ascending index order.
///
/// Each migration's SQL and its ledger record commit together in one
/// transaction. The run stops at the first failure; migrations applied
/// before it stay committed. Units with a blank up-file are skipped and
/// never recorded, so they are picked up once they have content.
pub fn up(store: &MigrationStore, ledger: &Ledger<'_>) -> MigrateResult<UpReport> {
    ledger.ensure_table()?;

    let mut report = UpReport::default();
    for unit in store.discover()? {
        let (Some(key), Some(up_path)) = (unit.key(), unit.up_path()) else {
            log::debug!("Skipping {}: no up file", unit.directory);
            continue;
        };

        if ledger.is_applied(key.as_str())? {
            report.already_applied += 1;
            continue;
        }

        let sql = store
            .read_sql(&up_path)
            .map_err(|source| MigrateError::ReadFailed {
                path: up_path.display().to_string(),
                source,
            })?;
        if sql.is_empty() {
            log::warn!("Skipping {}: up file is empty", key);
            report.skipped_empty.push(key);
            continue;
        }

        apply_one(ledger, &key, &sql)?;
        log::info!("Applied {}", key);
        report.applied.push(key);
    }

    if report.is_noop() {
        log::info!("No pending migrations");
    }
    Ok(report)
}

fn apply_one(ledger: &Ledger<'_>, key: &MigrationKey, sql: &str) -> MigrateResult<()> {
    with_transaction(ledger.database(), |tx| {
        log::debug!("Executing up script for {}", key);
        tx.execute_batch(sql)
            .map_err(|source| MigrateError::Execution {
                key: key.to_string(),
                source,
            })?;
        ledger
            .record(key.as_str())
            .map_err(|source| MigrateError::Ledger {
                key: key.to_string(),
                source,
            })
    })
}

#[cfg(test)]
#[path = "up_test.rs"]
mod tests;
