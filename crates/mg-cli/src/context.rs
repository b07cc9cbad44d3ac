//! Runtime context for CLI commands

use anyhow::{Context, Result};
use mg_core::{Config, MigrationStore};
use mg_db::DuckDbBackend;
use mg_engine::Migrator;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

const MEMORY_DB: &str = ":memory:";

/// Resolved project settings: config file merged with command-line
/// overrides.
#[derive(Debug)]
pub struct ProjectContext {
    /// Loaded (or default) configuration
    pub config: Config,

    /// Migrations directory
    pub migrations_dir: PathBuf,

    /// Database path, or `:memory:`
    pub database_path: String,
}

impl ProjectContext {
    /// Resolve configuration from global arguments.
    ///
    /// `--config` must point at an existing file. Otherwise `migra.yml` in
    /// the project directory is used when present. Relative paths resolve
    /// against the project directory.
    pub fn new(args: &GlobalArgs) -> Result<Self> {
        let project_dir = Path::new(&args.project_dir);

        let config = match &args.config {
            Some(config_path) => Config::load(Path::new(config_path))
                .context("Failed to load configuration file")?,
            None => Config::load_or_default(project_dir)
                .context("Failed to load project configuration")?,
        };

        let migrations_dir = match &args.dir {
            Some(dir) => project_dir.join(dir),
            None => config.migrations_dir_absolute(project_dir),
        };

        let database_path = resolve_database_path(
            project_dir,
            args.database.as_deref().unwrap_or(&config.database.path),
        );

        log::debug!(
            "Using migrations in {} and database {}",
            migrations_dir.display(),
            database_path
        );

        Ok(Self {
            config,
            migrations_dir,
            database_path,
        })
    }

    /// The on-disk migration store
    pub fn store(&self) -> MigrationStore {
        MigrationStore::new(&self.migrations_dir)
    }

    /// Open the configured database
    pub fn open_database(&self) -> Result<DuckDbBackend> {
        DuckDbBackend::new(&self.database_path)
            .with_context(|| format!("Failed to connect to database {}", self.database_path))
    }

    /// A migrator bound to `db` with the configured ledger table
    pub fn migrator<'a>(&self, db: &'a DuckDbBackend) -> Migrator<'a> {
        Migrator::new(db, &self.migrations_dir).with_ledger_table(&self.config.ledger_table)
    }
}

fn resolve_database_path(project_dir: &Path, path: &str) -> String {
    if path == MEMORY_DB || Path::new(path).is_absolute() {
        path.to_string()
    } else {
        project_dir.join(path).display().to_string()
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
