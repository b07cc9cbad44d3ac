use super::*;
use crate::test_support::{down_file, key_for, record_at, table_exists, write_migration};
use crate::up::up;
use mg_db::{Database, DuckDbBackend};
use std::fs;
use tempfile::tempdir;

fn applied_db(root: &Path) -> DuckDbBackend {
    let db = DuckDbBackend::in_memory().unwrap();
    up(&MigrationStore::new(root), &Ledger::with_default_table(&db)).unwrap();
    db
}

// ── Down ───────────────────────────────────────────────────────────────

#[test]
fn test_down_nothing_applied() {
    let dir = tempdir().unwrap();
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::with_default_table(&db);

    let outcome = down(&MigrationStore::new(dir.path()), &ledger).unwrap();
    assert_eq!(outcome, DownOutcome::NothingToRollBack);
    assert!(!ledger.table_exists().unwrap());
}

#[test]
fn test_down_empty_ledger_table() {
    let dir = tempdir().unwrap();
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::with_default_table(&db);
    ledger.ensure_table().unwrap();

    let outcome = down(&MigrationStore::new(dir.path()), &ledger).unwrap();
    assert_eq!(outcome, DownOutcome::NothingToRollBack);
}

#[test]
fn test_down_removes_exactly_one_entry() {
    let dir = tempdir().unwrap();
    write_migration(dir.path(), "001_a", "CREATE TABLE a (id INT);", "DROP TABLE a;");
    write_migration(dir.path(), "002_b", "CREATE TABLE b (id INT);", "DROP TABLE b;");
    let db = applied_db(dir.path());
    let ledger = Ledger::with_default_table(&db);
    let store = MigrationStore::new(dir.path());

    let outcome = down(&store, &ledger).unwrap();

    assert_eq!(
        outcome,
        DownOutcome::RolledBack {
            key: key_for("002_b"),
            executed_sql: true
        }
    );
    assert!(!table_exists(&db, "b"));
    assert!(table_exists(&db, "a"));
    assert_eq!(ledger.all_applied().unwrap(), vec![key_for("001_a")]);
}

#[test]
fn test_down_follows_applied_at_not_index() {
    let dir = tempdir().unwrap();
    write_migration(dir.path(), "001_a", "", "CREATE TABLE undone_a (id INT);");
    write_migration(dir.path(), "002_b", "", "CREATE TABLE undone_b (id INT);");
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::with_default_table(&db);
    ledger.ensure_table().unwrap();
    record_at(&db, &key_for("002_b"), "2024-01-01 09:00:00");
    record_at(&db, &key_for("001_a"), "2024-01-01 10:00:00");

    down(&MigrationStore::new(dir.path()), &ledger).unwrap();

    assert!(table_exists(&db, "undone_a"));
    assert!(!table_exists(&db, "undone_b"));
}

#[test]
fn test_down_empty_file_still_deletes_record() {
    let dir = tempdir().unwrap();
    write_migration(dir.path(), "001_a", "CREATE TABLE a (id INT);", "   ");
    let db = applied_db(dir.path());
    let ledger = Ledger::with_default_table(&db);

    let outcome = down(&MigrationStore::new(dir.path()), &ledger).unwrap();

    assert_eq!(
        outcome,
        DownOutcome::RolledBack {
            key: key_for("001_a"),
            executed_sql: false
        }
    );
    assert!(table_exists(&db, "a"));
    assert!(ledger.all_applied().unwrap().is_empty());
}

#[test]
fn test_down_missing_down_file_is_fatal() {
    let dir = tempdir().unwrap();
    write_migration(dir.path(), "001_a", "CREATE TABLE a (id INT);", "DROP TABLE a;");
    let db = applied_db(dir.path());
    let ledger = Ledger::with_default_table(&db);
    fs::remove_file(dir.path().join("001_a").join(down_file("001_a"))).unwrap();

    let err = down(&MigrationStore::new(dir.path()), &ledger).unwrap_err();

    assert!(matches!(
        err,
        MigrateError::MalformedMigration { ref key, .. } if *key == key_for("001_a")
    ));
    assert_eq!(ledger.all_applied().unwrap(), vec![key_for("001_a")]);
}

#[test]
fn test_down_missing_directory_is_fatal() {
    let dir = tempdir().unwrap();
    write_migration(dir.path(), "001_a", "CREATE TABLE a (id INT);", "DROP TABLE a;");
    let db = applied_db(dir.path());
    let ledger = Ledger::with_default_table(&db);
    fs::remove_dir_all(dir.path().join("001_a")).unwrap();

    let err = down(&MigrationStore::new(dir.path()), &ledger).unwrap_err();
    assert!(matches!(err, MigrateError::MalformedMigration { .. }));
}

#[test]
fn test_down_unparseable_key_is_fatal() {
    let dir = tempdir().unwrap();
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::with_default_table(&db);
    ledger.ensure_table().unwrap();
    ledger.record("no_separator_here").unwrap();

    let err = down(&MigrationStore::new(dir.path()), &ledger).unwrap_err();
    assert!(matches!(
        err,
        MigrateError::MalformedMigration { ref key, .. } if key == "no_separator_here"
    ));
}

#[test]
fn test_down_accepts_backslash_keys() {
    let dir = tempdir().unwrap();
    write_migration(dir.path(), "001_a", "", "CREATE TABLE undone (id INT);");
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::with_default_table(&db);
    ledger.ensure_table().unwrap();
    let windows_key = key_for("001_a").replace('/', "\\");
    ledger.record(&windows_key).unwrap();

    down(&MigrationStore::new(dir.path()), &ledger).unwrap();

    assert!(table_exists(&db, "undone"));
    assert!(ledger.all_applied().unwrap().is_empty());
}

#[test]
fn test_down_execution_failure_keeps_record() {
    let dir = tempdir().unwrap();
    write_migration(dir.path(), "001_a", "CREATE TABLE a (id INT);", "DROP TABLE does_not_exist;");
    let db = applied_db(dir.path());
    let ledger = Ledger::with_default_table(&db);

    let err = down(&MigrationStore::new(dir.path()), &ledger).unwrap_err();

    assert!(matches!(err, MigrateError::Execution { .. }));
    assert_eq!(ledger.all_applied().unwrap(), vec![key_for("001_a")]);
}

// ── Reset ──────────────────────────────────────────────────────────────

#[test]
fn test_reset_reverses_in_applied_order() {
    let dir = tempdir().unwrap();
    // Each down script records its turn
    write_migration(dir.path(), "001_a", "", "INSERT INTO turns VALUES ('a');");
    write_migration(dir.path(), "002_b", "", "INSERT INTO turns VALUES ('b');");
    write_migration(dir.path(), "003_c", "", "INSERT INTO turns VALUES ('c');");
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch(
        "CREATE SEQUENCE turn_seq;
         CREATE TABLE turns (name VARCHAR, seq INTEGER DEFAULT nextval('turn_seq'));",
    )
    .unwrap();
    let ledger = Ledger::with_default_table(&db);
    ledger.ensure_table().unwrap();
    record_at(&db, &key_for("002_b"), "2024-01-01 08:00:00");
    record_at(&db, &key_for("003_c"), "2024-01-01 09:00:00");
    record_at(&db, &key_for("001_a"), "2024-01-01 10:00:00");

    let report = reset(&MigrationStore::new(dir.path()), &ledger).unwrap();

    assert_eq!(
        report.rolled_back,
        vec![key_for("001_a"), key_for("003_c"), key_for("002_b")]
    );
    assert!(report.skipped.is_empty());
    let turns = db
        .query_strings("SELECT name FROM turns ORDER BY seq", &[])
        .unwrap();
    assert_eq!(turns, vec!["a", "c", "b"]);
    assert!(ledger.all_applied().unwrap().is_empty());
}

#[test]
fn test_reset_skips_missing_down_and_continues() {
    let dir = tempdir().unwrap();
    write_migration(dir.path(), "001_a", "CREATE TABLE a (id INT);", "DROP TABLE a;");
    write_migration(dir.path(), "002_b", "CREATE TABLE b (id INT);", "DROP TABLE b;");
    let db = applied_db(dir.path());
    let ledger = Ledger::with_default_table(&db);
    fs::remove_file(dir.path().join("002_b").join(down_file("002_b"))).unwrap();

    let report = reset(&MigrationStore::new(dir.path()), &ledger).unwrap();

    assert_eq!(report.rolled_back, vec![key_for("001_a")]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].key, key_for("002_b"));
    assert!(!table_exists(&db, "a"));
    assert!(table_exists(&db, "b"));
    assert_eq!(ledger.all_applied().unwrap(), vec![key_for("002_b")]);
}

#[test]
fn test_reset_skips_missing_directory_and_bad_key() {
    let dir = tempdir().unwrap();
    write_migration(dir.path(), "001_a", "", "CREATE TABLE undone (id INT);");
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::with_default_table(&db);
    ledger.ensure_table().unwrap();
    record_at(&db, &key_for("001_a"), "2024-01-01 08:00:00");
    record_at(&db, "009_gone/x.up.sql", "2024-01-01 09:00:00");
    record_at(&db, "garbage", "2024-01-01 10:00:00");

    let report = reset(&MigrationStore::new(dir.path()), &ledger).unwrap();

    let skipped: Vec<&str> = report.skipped.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(skipped, vec!["garbage", "009_gone/x.up.sql"]);
    assert_eq!(report.rolled_back, vec![key_for("001_a")]);
    assert!(table_exists(&db, "undone"));
}

#[test]
fn test_reset_stops_on_execution_failure() {
    let dir = tempdir().unwrap();
    write_migration(dir.path(), "001_a", "CREATE TABLE a (id INT);", "DROP TABLE a;");
    write_migration(dir.path(), "002_b", "CREATE TABLE b (id INT);", "DROP TABLE nope;");
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::with_default_table(&db);
    up(&MigrationStore::new(dir.path()), &ledger).unwrap();
    // Make 002_b unambiguously the newest entry
    let newest = key_for("002_b");
    db.execute_with_params(
        "UPDATE schema_migrations SET applied_at = TIMESTAMP '2100-01-01 00:00:00' WHERE name = ?",
        &[newest.as_str()],
    )
    .unwrap();

    let err = reset(&MigrationStore::new(dir.path()), &ledger).unwrap_err();

    assert!(matches!(err, MigrateError::Execution { ref key, .. } if *key == key_for("002_b")));
    // 001_a was never reached
    assert!(table_exists(&db, "a"));
    assert_eq!(ledger.all_applied().unwrap().len(), 2);
}

#[test]
fn test_reset_absent_table() {
    let dir = tempdir().unwrap();
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::with_default_table(&db);

    let report = reset(&MigrationStore::new(dir.path()), &ledger).unwrap();
    assert_eq!(report, ResetReport::default());
}

#[test]
fn test_reset_and_drop_removes_table() {
    let dir = tempdir().unwrap();
    write_migration(dir.path(), "001_a", "CREATE TABLE a (id INT);", "DROP TABLE a;");
    let db = applied_db(dir.path());
    let ledger = Ledger::with_default_table(&db);

    let report = reset_and_drop(&MigrationStore::new(dir.path()), &ledger).unwrap();

    assert_eq!(report.rolled_back, vec![key_for("001_a")]);
    assert!(!table_exists(&db, "a"));
    assert!(!ledger.table_exists().unwrap());
}

#[test]
fn test_reset_and_drop_drops_even_with_skips() {
    let dir = tempdir().unwrap();
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::with_default_table(&db);
    ledger.ensure_table().unwrap();
    ledger.record("001_gone/x.up.sql").unwrap();

    let report = reset_and_drop(&MigrationStore::new(dir.path()), &ledger).unwrap();

    assert_eq!(report.skipped.len(), 1);
    assert!(!ledger.table_exists().unwrap());
}
