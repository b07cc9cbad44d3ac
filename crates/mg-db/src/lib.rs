//! mg-db - Database layer for Migra
//!
//! This crate provides the synchronous `Database` trait, a DuckDB
//! implementation, a transaction helper, and the [`Ledger`] table that
//! records which migrations have been applied.

pub mod duckdb;
pub mod error;
pub mod ledger;
pub mod traits;
pub mod transaction;

pub use crate::duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use ledger::{Ledger, DEFAULT_LEDGER_TABLE};
pub use traits::Database;
pub use transaction::with_transaction;
