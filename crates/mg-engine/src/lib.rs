//! mg-engine - Migration engine for Migra
//!
//! Every operation is a free function over a [`MigrationStore`] and a
//! [`Ledger`], and [`Migrator`] binds both to one database handle and
//! migrations directory. The engine keeps no state between calls.
//!
//! [`MigrationStore`]: mg_core::MigrationStore
//! [`Ledger`]: mg_db::Ledger

pub mod down;
pub mod error;
pub mod migrator;
pub mod report;
pub mod scaffold;
pub mod status;
pub mod up;
pub mod version;

#[cfg(test)]
mod test_support;

pub use down::{down, reset, reset_and_drop};
pub use error::{MigrateError, MigrateResult};
pub use migrator::Migrator;
pub use report::{
    DownOutcome, InsertReport, MigrationState, ResetReport, SkippedRollback, StatusEntry,
    StatusReport, UpReport, VersionInfo,
};
pub use scaffold::{create, insert};
pub use status::status;
pub use up::up;
pub use version::version;
