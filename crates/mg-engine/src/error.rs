//! Error types for mg-engine

use mg_core::CoreError;
use mg_db::DbError;
use thiserror::Error;

/// Errors raised while applying, rolling back, or scaffolding migrations.
///
/// Informational outcomes such as "nothing to roll back" are not errors;
/// they are reported through the operation's return value.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// M001: Migration SQL failed to execute
    #[error("[M001] Migration '{key}' failed: {source}")]
    Execution { key: String, source: DbError },

    /// M002: Ledger could not be updated for a migration
    #[error("[M002] Failed to update ledger for '{key}': {source}")]
    Ledger { key: String, source: DbError },

    /// M003: Migration is missing a required file or has a bad ledger key
    #[error("[M003] Malformed migration '{key}': {reason}")]
    MalformedMigration { key: String, reason: String },

    /// M004: Migration script could not be read
    #[error("[M004] Failed to read migration script {path}: {source}")]
    ReadFailed { path: String, source: CoreError },

    /// M005: Core error propagation
    #[error("[M005] {0}")]
    Core(#[from] CoreError),

    /// M006: Database error propagation
    #[error("[M006] {0}")]
    Db(#[from] DbError),
}

/// Result type alias for MigrateError
pub type MigrateResult<T> = Result<T, MigrateError>;
