//! Migration identity types: names, ledger keys, and on-disk units.

use crate::error::{CoreError, CoreResult};
use serde::Serialize;
use std::fmt;
use std::ops::Deref;
use std::path::PathBuf;

/// File suffix of the forward script in a migration directory.
pub const UP_SUFFIX: &str = ".up.sql";

/// File suffix of the reverse script in a migration directory.
pub const DOWN_SUFFIX: &str = ".down.sql";

/// Validated descriptive name of a migration (`add_users` in `001_add_users`).
///
/// The name becomes both a directory component and part of the SQL file
/// names, so it may not contain path separators or control characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MigrationName(String);

impl MigrationName {
    /// Validate and wrap a migration name.
    pub fn try_new(name: impl Into<String>) -> CoreResult<Self> {
        let name = name.into();
        let reason = if name.trim().is_empty() {
            Some("name must not be empty")
        } else if name.contains(|c: char| c == '/' || c == '\\') {
            Some("name must not contain path separators")
        } else if name.chars().any(char::is_control) {
            Some("name must not contain control characters")
        } else if name == "." || name == ".." {
            Some("name must not be a relative path component")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(CoreError::InvalidMigrationName {
                name,
                reason: reason.to_string(),
            }),
            None => Ok(Self(name)),
        }
    }

    /// Return the underlying name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MigrationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MigrationName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for MigrationName {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

/// Ledger identity of a migration: `<directory>/<up-file>`.
///
/// Keys are always `/`-separated regardless of host OS so that a ledger
/// written on one platform is readable on another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MigrationKey(String);

impl MigrationKey {
    /// Build a key from a directory name and its up-file name.
    pub fn new(directory: &str, up_file: &str) -> Self {
        Self(format!("{directory}/{up_file}"))
    }

    /// Parse a key read back from the ledger.
    ///
    /// Accepts `\` as the separator too, for ledgers written with a native
    /// Windows path. Returns `None` unless both halves are non-empty.
    pub fn parse(raw: &str) -> Option<Self> {
        let (directory, file) = raw.split_once(|c: char| c == '/' || c == '\\')?;
        if directory.is_empty() || file.is_empty() {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    /// Directory component of the key (`001_init`).
    pub fn directory(&self) -> &str {
        self.0
            .split_once(|c: char| c == '/' || c == '\\')
            .map_or(self.0.as_str(), |(directory, _)| directory)
    }

    /// Return the key as stored in the ledger.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MigrationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MigrationKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A discovered `NNN_name` migration directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationUnit {
    /// Parsed sequence index
    pub index: u32,

    /// Directory name, e.g. `001_init`
    pub directory: String,

    /// Absolute (or root-relative) path to the directory
    pub path: PathBuf,

    /// File name of the `.up.sql` script, if present
    pub up_file: Option<String>,

    /// File name of the `.down.sql` script, if present
    pub down_file: Option<String>,
}

impl MigrationUnit {
    /// Ledger key, available only when the unit has an up-file.
    pub fn key(&self) -> Option<MigrationKey> {
        self.up_file
            .as_deref()
            .map(|up| MigrationKey::new(&self.directory, up))
    }

    /// Full path to the up-file.
    pub fn up_path(&self) -> Option<PathBuf> {
        self.up_file.as_ref().map(|f| self.path.join(f))
    }

    /// Full path to the down-file.
    pub fn down_path(&self) -> Option<PathBuf> {
        self.down_file.as_ref().map(|f| self.path.join(f))
    }

    /// Ordering string: the ledger key, or the bare directory when there is
    /// no up-file.
    pub(crate) fn sort_key(&self) -> String {
        match &self.up_file {
            Some(up) => format!("{}/{}", self.directory, up),
            None => self.directory.clone(),
        }
    }
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
