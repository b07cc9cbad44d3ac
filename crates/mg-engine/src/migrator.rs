//! Facade binding a database handle and a migrations directory.

use crate::error::MigrateResult;
use crate::report::{DownOutcome, InsertReport, ResetReport, StatusReport, UpReport, VersionInfo};
use mg_core::{MigrationStore, MigrationUnit};
use mg_db::{Database, Ledger, DEFAULT_LEDGER_TABLE};
use std::path::PathBuf;

/// Runs engine operations against one database and one migrations
/// directory.
///
/// ```no_run
/// use mg_db::DuckDbBackend;
/// use mg_engine::Migrator;
///
/// let db = DuckDbBackend::new("dev.duckdb")?;
/// let migrator = Migrator::new(&db, "migrations");
/// let report = migrator.up()?;
/// println!("applied {}", report.applied.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Migrator<'a> {
    db: &'a dyn Database,
    store: MigrationStore,
    ledger_table: String,
}

impl<'a> Migrator<'a> {
    /// Bind `db` and the migrations directory `base_dir`, using the default
    /// ledger table.
    pub fn new(db: &'a dyn Database, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            db,
            store: MigrationStore::new(base_dir),
            ledger_table: DEFAULT_LEDGER_TABLE.to_string(),
        }
    }

    /// Use `table` as the ledger table. Validated on first use.
    pub fn with_ledger_table(mut self, table: impl Into<String>) -> Self {
        self.ledger_table = table.into();
        self
    }

    /// The migrations store
    pub fn store(&self) -> &MigrationStore {
        &self.store
    }

    /// The configured ledger table name
    pub fn ledger_table(&self) -> &str {
        &self.ledger_table
    }

    fn ledger(&self) -> MigrateResult<Ledger<'_>> {
        Ok(Ledger::new(self.db, &self.ledger_table)?)
    }

    pub fn up(&self) -> MigrateResult<UpReport> {
        crate::up::up(&self.store, &self.ledger()?)
    }

    pub fn down(&self) -> MigrateResult<DownOutcome> {
        crate::down::down(&self.store, &self.ledger()?)
    }

    pub fn reset(&self) -> MigrateResult<ResetReport> {
        crate::down::reset(&self.store, &self.ledger()?)
    }

    pub fn reset_and_drop(&self) -> MigrateResult<ResetReport> {
        crate::down::reset_and_drop(&self.store, &self.ledger()?)
    }

    pub fn version(&self) -> MigrateResult<VersionInfo> {
        crate::version::version(&self.ledger()?)
    }

    pub fn status(&self) -> MigrateResult<StatusReport> {
        crate::status::status(&self.store, &self.ledger()?)
    }

    /// Create a migration at `index`, or after the last existing one.
    pub fn create(&self, name: &str, index: Option<u32>) -> MigrateResult<MigrationUnit> {
        crate::scaffold::create(&self.store, name, index)
    }

    /// Insert a migration at `index`, renumbering the ones after it.
    pub fn insert(&self, name: &str, index: u32) -> MigrateResult<InsertReport> {
        crate::scaffold::insert(&self.store, name, index)
    }
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;
