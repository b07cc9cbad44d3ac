//! Compare the migrations on disk with the ledger.

use crate::error::MigrateResult;
use crate::report::{MigrationState, StatusEntry, StatusReport};
use mg_core::{CoreError, MigrationStore};
use mg_db::Ledger;
use std::collections::HashSet;

/// List every discovered unit with its state, plus ledger keys that no
/// longer match anything on disk.
///
/// A missing migrations directory is treated as empty.
pub fn status(store: &MigrationStore, ledger: &Ledger<'_>) -> MigrateResult<StatusReport> {
    let applied = ledger.all_applied()?;
    let applied_set: HashSet<&str> = applied.iter().map(String::as_str).collect();

    let units = match store.discover() {
        Ok(units) => units,
        Err(CoreError::MigrationsDirNotFound { path }) => {
            log::debug!("Migrations directory {} does not exist", path);
            Vec::new()
        }
        Err(e) => return Err(e.into()),
    };

    let mut on_disk = HashSet::new();
    let mut migrations = Vec::with_capacity(units.len());
    for unit in units {
        let key = unit.key();
        let state = match (&key, unit.up_path()) {
            (Some(key), Some(up_path)) => {
                on_disk.insert(key.as_str().to_string());
                if applied_set.contains(key.as_str()) {
                    MigrationState::Applied
                } else if store.read_sql(&up_path)?.is_empty() {
                    MigrationState::Empty
                } else {
                    MigrationState::Pending
                }
            }
            _ => MigrationState::NoUpFile,
        };

        migrations.push(StatusEntry {
            index: unit.index,
            directory: unit.directory,
            key,
            state,
        });
    }

    let orphaned = applied
        .iter()
        .filter(|key| !on_disk.contains(key.as_str()))
        .cloned()
        .collect();

    Ok(StatusReport {
        migrations,
        orphaned,
    })
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
