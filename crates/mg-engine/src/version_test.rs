use super::*;
use crate::test_support::record_at;
use mg_db::DuckDbBackend;

#[test]
fn test_version_absent_table() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::with_default_table(&db);
    assert_eq!(version(&ledger).unwrap(), VersionInfo::NoneApplied);
}

#[test]
fn test_version_empty_table() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::with_default_table(&db);
    ledger.ensure_table().unwrap();
    assert_eq!(version(&ledger).unwrap(), VersionInfo::NoneApplied);
}

#[test]
fn test_version_latest_by_applied_at() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::with_default_table(&db);
    ledger.ensure_table().unwrap();
    record_at(&db, "002_seed/2_seed.up.sql", "2024-01-01 08:00:00");
    record_at(&db, "001_init/1_init.up.sql", "2024-01-01 09:00:00");

    assert_eq!(
        version(&ledger).unwrap(),
        VersionInfo::Latest {
            key: "001_init/1_init.up.sql".to_string(),
            directory: Some("001_init".to_string()),
        }
    );
}

#[test]
fn test_version_unparseable_key_has_no_directory() {
    let db = DuckDbBackend::in_memory().unwrap();
    let ledger = Ledger::with_default_table(&db);
    ledger.ensure_table().unwrap();
    ledger.record("legacy").unwrap();

    assert_eq!(
        version(&ledger).unwrap(),
        VersionInfo::Latest {
            key: "legacy".to_string(),
            directory: None,
        }
    );
}
