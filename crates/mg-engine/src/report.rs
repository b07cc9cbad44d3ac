//! Structured results returned by engine operations.

use mg_core::{MigrationKey, MigrationUnit, Renamed};
use serde::Serialize;

/// Result of an Up run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpReport {
    /// Keys applied and recorded in this run, in apply order
    pub applied: Vec<MigrationKey>,
    /// Keys whose up-file was blank; they stay pending
    pub skipped_empty: Vec<MigrationKey>,
    /// Number of units already present in the ledger
    pub already_applied: usize,
}

impl UpReport {
    /// True when the run changed nothing.
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Result of a Down run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownOutcome {
    /// The ledger is absent or empty
    NothingToRollBack,
    /// The most recent migration was rolled back
    RolledBack {
        key: String,
        /// False when the down-file was blank and only the ledger entry was
        /// removed
        executed_sql: bool,
    },
}

/// A ledger entry Reset left in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRollback {
    pub key: String,
    pub reason: String,
}

/// Result of a Reset (or ResetAndDrop) run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetReport {
    /// Keys rolled back, newest first
    pub rolled_back: Vec<String>,
    /// Keys skipped because their down script could not be located
    pub skipped: Vec<SkippedRollback>,
}

/// Result of a Version query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionInfo {
    NoneApplied,
    Latest {
        key: String,
        /// Directory part of the key, when the key is well formed
        directory: Option<String>,
    },
}

/// Result of an Insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertReport {
    /// Directories shifted to make room, highest index first
    pub renamed: Vec<Renamed>,
    /// The newly scaffolded unit
    pub created: MigrationUnit,
}

/// Where a discovered unit stands relative to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationState {
    Applied,
    Pending,
    /// Up-file is blank after trimming; Up will skip it
    Empty,
    /// No `.up.sql` in the directory
    NoUpFile,
}

impl MigrationState {
    /// Label used in table output
    pub fn label(self) -> &'static str {
        match self {
            MigrationState::Applied => "applied",
            MigrationState::Pending => "pending",
            MigrationState::Empty => "empty",
            MigrationState::NoUpFile => "no up file",
        }
    }
}

/// One discovered unit in a status listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    pub index: u32,
    pub directory: String,
    pub key: Option<MigrationKey>,
    pub state: MigrationState,
}

/// Result of a Status query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    /// Discovered units in apply order
    pub migrations: Vec<StatusEntry>,
    /// Ledger keys with no matching unit on disk, newest first
    pub orphaned: Vec<String>,
}

impl StatusReport {
    /// Number of units Up would apply now
    pub fn pending_count(&self) -> usize {
        self.migrations
            .iter()
            .filter(|m| m.state == MigrationState::Pending)
            .count()
    }
}
