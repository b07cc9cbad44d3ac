//! Roll back applied migrations.

use crate::error::{MigrateError, MigrateResult};
use crate::report::{DownOutcome, ResetReport, SkippedRollback};
use mg_core::{MigrationKey, MigrationStore};
use mg_db::Ledger;
use std::path::{Path, PathBuf};

const BAD_KEY: &str = "ledger key is not of the form <directory>/<up-file>";

/// Roll back the most recently applied migration.
///
/// A missing down-file is fatal. A blank down-file runs no SQL but the
/// ledger entry is still removed. No explicit transaction wraps the
/// rollback.
pub fn down(store: &MigrationStore, ledger: &Ledger<'_>) -> MigrateResult<DownOutcome> {
    let Some(raw) = ledger.latest_applied()? else {
        log::warn!("Nothing to roll back");
        return Ok(DownOutcome::NothingToRollBack);
    };

    let key = MigrationKey::parse(&raw).ok_or_else(|| MigrateError::MalformedMigration {
        key: raw.clone(),
        reason: BAD_KEY.to_string(),
    })?;

    let down_path = match locate_down_script(store, &key)? {
        Ok(path) => path,
        Err(reason) => {
            return Err(MigrateError::MalformedMigration {
                key: raw,
                reason: reason.to_string(),
            })
        }
    };

    let executed_sql = roll_back_one(store, ledger, &raw, &down_path)?;
    Ok(DownOutcome::RolledBack {
        key: raw,
        executed_sql,
    })
}

/// Roll back every applied migration, newest first.
///
/// Entries whose down script cannot be located are skipped with a warning
/// and left in the ledger. Execution and ledger failures stop the run.
pub fn reset(store: &MigrationStore, ledger: &Ledger<'_>) -> MigrateResult<ResetReport> {
    let mut report = ResetReport::default();

    for raw in ledger.all_applied()? {
        let located = match MigrationKey::parse(&raw) {
            Some(key) => locate_down_script(store, &key)?,
            None => Err(BAD_KEY),
        };

        match located {
            Ok(path) => {
                roll_back_one(store, ledger, &raw, &path)?;
                report.rolled_back.push(raw);
            }
            Err(reason) => {
                log::warn!("Skipping {}: {}", raw, reason);
                report.skipped.push(SkippedRollback {
                    key: raw,
                    reason: reason.to_string(),
                });
            }
        }
    }

    if report.rolled_back.is_empty() && report.skipped.is_empty() {
        log::warn!("Nothing to roll back");
    }
    Ok(report)
}

/// Reset, then drop the ledger table.
pub fn reset_and_drop(store: &MigrationStore, ledger: &Ledger<'_>) -> MigrateResult<ResetReport> {
    let report = reset(store, ledger)?;
    ledger.drop_table()?;
    log::info!("Dropped ledger table {}", ledger.table());
    Ok(report)
}

/// Find the down script for `key`, or say why it is unavailable.
fn locate_down_script(
    store: &MigrationStore,
    key: &MigrationKey,
) -> MigrateResult<Result<PathBuf, &'static str>> {
    let located = match store.find(key.directory())? {
        None => Err("migration directory not found"),
        Some(unit) => unit.down_path().ok_or("no .down.sql file in migration directory"),
    };
    Ok(located)
}

/// Execute a down script and remove the ledger entry. Returns whether any
/// SQL ran.
fn roll_back_one(
    store: &MigrationStore,
    ledger: &Ledger<'_>,
    key: &str,
    down_path: &Path,
) -> MigrateResult<bool> {
    let sql = store
        .read_sql(down_path)
        .map_err(|source| MigrateError::ReadFailed {
            path: down_path.display().to_string(),
            source,
        })?;

    let executed = if sql.is_empty() {
        log::warn!("Down file for {} is empty, removing ledger entry only", key);
        false
    } else {
        log::debug!("Executing down script for {}", key);
        ledger
            .database()
            .execute_batch(&sql)
            .map_err(|source| MigrateError::Execution {
                key: key.to_string(),
                source,
            })?;
        true
    };

    ledger.delete(key).map_err(|source| MigrateError::Ledger {
        key: key.to_string(),
        source,
    })?;
    log::info!("Rolled back {}", key);
    Ok(executed)
}

#[cfg(test)]
#[path = "down_test.rs"]
mod tests;
