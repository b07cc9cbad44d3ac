//! Scaffold new migrations.
//!
//! Neither operation touches the ledger. Inserting before a migration that
//! has already been applied changes that migration's key, so the ledger no
//! longer recognises it and Up would try to apply it again.

use crate::error::MigrateResult;
use crate::report::InsertReport;
use mg_core::{CoreError, MigrationName, MigrationStore, MigrationUnit, MAX_INDEX};

/// Create a migration at `index`, or after the last existing one.
pub fn create(
    store: &MigrationStore,
    name: &str,
    index: Option<u32>,
) -> MigrateResult<MigrationUnit> {
    let name = MigrationName::try_new(name)?;
    let index = match index {
        Some(index) => index,
        None => store.next_index()?,
    };
    Ok(store.create_unit(&name, index)?)
}

/// Shift every migration at `index` or above up by one, then create a
/// migration at `index`.
///
/// The name and index are validated before anything is renamed.
pub fn insert(store: &MigrationStore, name: &str, index: u32) -> MigrateResult<InsertReport> {
    let name = MigrationName::try_new(name)?;
    if index == 0 || index > MAX_INDEX {
        return Err(CoreError::InvalidIndex { index }.into());
    }

    let renamed = store.renumber(index)?;
    for r in &renamed {
        log::info!("Renumbered {} -> {}", r.from, r.to);
    }

    let created = store.create_unit(&name, index)?;
    Ok(InsertReport { renamed, created })
}

#[cfg(test)]
#[path = "scaffold_test.rs"]
mod tests;
