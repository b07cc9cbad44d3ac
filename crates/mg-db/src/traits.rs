//! Database trait definition

use crate::error::DbResult;

/// Database abstraction trait for Migra
///
/// Every call is blocking. Implementations must be Send + Sync so a handle
/// can be shared behind a reference.
pub trait Database: Send + Sync {
    /// Execute one or more SQL statements with no parameters
    fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Execute a single statement with positional `?` string parameters,
    /// returning the number of affected rows
    fn execute_with_params(&self, sql: &str, params: &[&str]) -> DbResult<usize>;

    /// Run a query and return the first column of every row as a string
    fn query_strings(&self, sql: &str, params: &[&str]) -> DbResult<Vec<String>>;

    /// Run a query and return the first column of the first row, if any
    fn query_optional_string(&self, sql: &str, params: &[&str]) -> DbResult<Option<String>> {
        Ok(self.query_strings(sql, params)?.into_iter().next())
    }

    /// Check if a table or view exists
    fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Open an explicit transaction
    fn begin(&self) -> DbResult<()>;

    /// Commit the open transaction
    fn commit(&self) -> DbResult<()>;

    /// Roll back the open transaction
    fn rollback(&self) -> DbResult<()>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
