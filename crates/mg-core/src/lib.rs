//! mg-core - Core library for Migra
//!
//! This crate provides configuration parsing, migration naming rules, the
//! sequence-prefix parser, and the [`MigrationStore`] that discovers,
//! creates, and renumbers migration directories on disk.

pub mod config;
pub mod error;
pub mod migration;
pub mod prefix;
pub mod store;

pub use config::{is_sql_identifier, Config, DatabaseConfig};
pub use error::{CoreError, CoreResult};
pub use migration::{MigrationKey, MigrationName, MigrationUnit, DOWN_SUFFIX, UP_SUFFIX};
pub use prefix::{format_dir_name, parse_prefix, SequencePrefix, MAX_INDEX};
pub use store::{MigrationStore, Renamed, TIMESTAMP_FORMAT};
