//! Report the current schema version.

use crate::error::MigrateResult;
use crate::report::VersionInfo;
use mg_core::MigrationKey;
use mg_db::Ledger;

/// The most recently applied migration, if any.
pub fn version(ledger: &Ledger<'_>) -> MigrateResult<VersionInfo> {
    Ok(match ledger.latest_applied()? {
        None => VersionInfo::NoneApplied,
        Some(key) => VersionInfo::Latest {
            directory: MigrationKey::parse(&key).map(|k| k.directory().to_string()),
            key,
        },
    })
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
