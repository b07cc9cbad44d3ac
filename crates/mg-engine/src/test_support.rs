//! Shared fixtures for engine unit tests.

use mg_db::{Database, DbError, DbResult, DuckDbBackend};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Write `<root>/<directory>/` with an up/down pair named after the
/// directory.
pub fn write_migration(root: &Path, directory: &str, up_sql: &str, down_sql: &str) {
    let dir = root.join(directory);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(up_file(directory)), up_sql).unwrap();
    fs::write(dir.join(down_file(directory)), down_sql).unwrap();
}

pub fn up_file(directory: &str) -> String {
    format!("20240101000000_{}.up.sql", &directory[4..])
}

pub fn down_file(directory: &str) -> String {
    format!("20240101000000_{}.down.sql", &directory[4..])
}

/// Ledger key for a directory written by [`write_migration`].
pub fn key_for(directory: &str) -> String {
    format!("{directory}/{}", up_file(directory))
}

/// Insert a ledger row with an explicit timestamp.
pub fn record_at(db: &dyn Database, key: &str, applied_at: &str) {
    db.execute_with_params(
        "INSERT INTO schema_migrations (id, name, applied_at) \
         VALUES (gen_random_uuid(), ?, CAST(? AS TIMESTAMP))",
        &[key, applied_at],
    )
    .unwrap();
}

/// Whether a table exists, for asserting on migration side effects.
pub fn table_exists(db: &dyn Database, name: &str) -> bool {
    db.relation_exists(name).unwrap()
}

/// DuckDB wrapper that counts transaction calls and can fail writes to
/// the ledger table.
pub struct RecordingDb {
    inner: DuckDbBackend,
    fail_ledger_insert: bool,
    pub begins: AtomicUsize,
    pub commits: AtomicUsize,
    pub rollbacks: AtomicUsize,
}

impl RecordingDb {
    pub fn new() -> Self {
        Self {
            inner: DuckDbBackend::in_memory().unwrap(),
            fail_ledger_insert: false,
            begins: AtomicUsize::new(0),
            commits: AtomicUsize::new(0),
            rollbacks: AtomicUsize::new(0),
        }
    }

    pub fn failing_ledger_insert() -> Self {
        Self {
            fail_ledger_insert: true,
            ..Self::new()
        }
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

impl Database for RecordingDb {
    fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.inner.execute_batch(sql)
    }

    fn execute_with_params(&self, sql: &str, params: &[&str]) -> DbResult<usize> {
        if self.fail_ledger_insert && sql.starts_with("INSERT INTO schema_migrations") {
            return Err(DbError::ExecutionError("injected ledger failure".to_string()));
        }
        self.inner.execute_with_params(sql, params)
    }

    fn query_strings(&self, sql: &str, params: &[&str]) -> DbResult<Vec<String>> {
        self.inner.query_strings(sql, params)
    }

    fn relation_exists(&self, name: &str) -> DbResult<bool> {
        self.inner.relation_exists(name)
    }

    fn begin(&self) -> DbResult<()> {
        self.begins.fetch_add(1, Ordering::SeqCst);
        self.inner.begin()
    }

    fn commit(&self) -> DbResult<()> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        self.inner.commit()
    }

    fn rollback(&self) -> DbResult<()> {
        self.rollbacks.fetch_add(1, Ordering::SeqCst);
        self.inner.rollback()
    }

    fn db_type(&self) -> &'static str {
        "recording"
    }
}
