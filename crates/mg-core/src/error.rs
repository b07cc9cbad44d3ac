//! Error types for mg-core

use thiserror::Error;

/// Core error type for Migra
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config {path}: {source}")]
    ConfigParseError {
        path: String,
        source: serde_yaml::Error,
    },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Migrations directory missing
    #[error("[E004] Migrations directory not found: {path}")]
    MigrationsDirNotFound { path: String },

    /// E005: Migration name cannot be used as a directory/file component
    #[error("[E005] Invalid migration name '{name}': {reason}")]
    InvalidMigrationName { name: String, reason: String },

    /// E006: Sequence index outside the three-digit range
    #[error("[E006] Invalid migration index {index}: must be between 1 and 999")]
    InvalidIndex { index: u32 },

    /// E007: Renumbering would push a prefix past three digits
    #[error("[E007] Cannot renumber '{directory}': index {index} does not fit in three digits")]
    SequenceOverflow { directory: String, index: u32 },

    /// E008: Scaffold target already present on disk
    #[error("[E008] Migration already exists: {path}")]
    AlreadyExists { path: String },

    /// E009: Another migration already uses the requested prefix
    #[error("[E009] Migration index {index:03} is already used by '{existing}'")]
    DuplicateIndex { index: u32, existing: String },

    /// E010: IO error with file path context
    #[error("[E010] IO error on '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Wrap an IO error with the path that produced it.
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        CoreError::IoWithPath {
            path: path.display().to_string(),
            source,
        }
    }
}
