//! Database-resident record of applied migrations.
//!
//! The ledger table has one canonical shape:
//!
//! ```sql
//! CREATE TABLE schema_migrations (
//!     id         UUID PRIMARY KEY,
//!     name       VARCHAR NOT NULL UNIQUE,
//!     applied_at TIMESTAMP NOT NULL DEFAULT now()
//! );
//! ```
//!
//! `name` holds the migration key (`<directory>/<up-file>`). Rollback order
//! comes from `applied_at`, newest first, with the key descending as the
//! tie-break for rows stamped within the same clock tick.

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use mg_core::is_sql_identifier;
use uuid::Uuid;

/// Ledger table name used when none is configured.
pub const DEFAULT_LEDGER_TABLE: &str = "schema_migrations";

/// Handle to the ledger table on a borrowed database connection.
#[derive(Clone, Copy)]
pub struct Ledger<'a> {
    db: &'a dyn Database,
    table: &'a str,
}

impl<'a> Ledger<'a> {
    /// Bind a ledger to `table` on `db`.
    ///
    /// The table name is interpolated into SQL, so it must be a plain
    /// identifier.
    pub fn new(db: &'a dyn Database, table: &'a str) -> DbResult<Self> {
        if !is_sql_identifier(table) {
            return Err(DbError::InvalidIdentifier {
                name: table.to_string(),
            });
        }
        Ok(Self { db, table })
    }

    /// Bind a ledger to [`DEFAULT_LEDGER_TABLE`] on `db`.
    pub fn with_default_table(db: &'a dyn Database) -> Self {
        Self {
            db,
            table: DEFAULT_LEDGER_TABLE,
        }
    }

    /// The ledger table name
    pub fn table(&self) -> &'a str {
        self.table
    }

    /// The database this ledger lives in
    pub fn database(&self) -> &'a dyn Database {
        self.db
    }

    /// Create the ledger table if it does not exist yet.
    pub fn ensure_table(&self) -> DbResult<()> {
        self.db.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                 id         UUID PRIMARY KEY,
                 name       VARCHAR NOT NULL UNIQUE,
                 applied_at TIMESTAMP NOT NULL DEFAULT now()
             )",
            self.table
        ))
    }

    /// Whether the ledger table exists.
    pub fn table_exists(&self) -> DbResult<bool> {
        self.db.relation_exists(self.table)
    }

    /// Whether `key` has been recorded. False when the table is absent.
    pub fn is_applied(&self, key: &str) -> DbResult<bool> {
        if !self.table_exists()? {
            return Ok(false);
        }
        let found = self.db.query_optional_string(
            &format!("SELECT name FROM {} WHERE name = ?", self.table),
            &[key],
        )?;
        Ok(found.is_some())
    }

    /// Record `key` as applied with a fresh id.
    ///
    /// Runs on whatever transaction the caller has open.
    pub fn record(&self, key: &str) -> DbResult<()> {
        let id = Uuid::new_v4().to_string();
        self.db.execute_with_params(
            &format!(
                "INSERT INTO {} (id, name) VALUES (CAST(? AS UUID), ?)",
                self.table
            ),
            &[id.as_str(), key],
        )?;
        Ok(())
    }

    /// The most recently applied key, or `None` when the table is absent or
    /// empty.
    pub fn latest_applied(&self) -> DbResult<Option<String>> {
        if !self.table_exists()? {
            return Ok(None);
        }
        self.db.query_optional_string(
            &format!(
                "SELECT name FROM {} ORDER BY applied_at DESC, name DESC LIMIT 1",
                self.table
            ),
            &[],
        )
    }

    /// Every applied key, newest first. Empty when the table is absent.
    pub fn all_applied(&self) -> DbResult<Vec<String>> {
        if !self.table_exists()? {
            return Ok(Vec::new());
        }
        self.db.query_strings(
            &format!(
                "SELECT name FROM {} ORDER BY applied_at DESC, name DESC",
                self.table
            ),
            &[],
        )
    }

    /// Remove the record for `key`. Removing an unknown key is a no-op.
    pub fn delete(&self, key: &str) -> DbResult<()> {
        let removed = self.db.execute_with_params(
            &format!("DELETE FROM {} WHERE name = ?", self.table),
            &[key],
        )?;
        if removed == 0 {
            log::debug!("No ledger entry for {} to delete", key);
        }
        Ok(())
    }

    /// Drop the ledger table if it exists.
    pub fn drop_table(&self) -> DbResult<()> {
        self.db.execute_batch(&format!("DROP TABLE IF EXISTS {}", self.table))
    }
}

impl std::fmt::Debug for Ledger<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("table", &self.table)
            .field("db_type", &self.db.db_type())
            .finish()
    }
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
