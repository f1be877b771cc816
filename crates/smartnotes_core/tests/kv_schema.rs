use rusqlite::{Connection, ErrorCode};
use smartnotes_core::db::schema::{stored_version, SCHEMA_VERSION};
use smartnotes_core::db::{open_db, open_db_in_memory, DbError};
use smartnotes_core::{KeyValueStore, SqliteKvStore};

#[test]
fn fresh_database_has_kv_entries_columns() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(stored_version(&conn).unwrap(), SCHEMA_VERSION);

    let mut stmt = conn.prepare("PRAGMA table_info(kv_entries);").unwrap();
    let columns: Vec<(String, bool)> = stmt
        .query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, i64>(5)? == 1)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        columns,
        vec![
            ("key".to_string(), true),
            ("value".to_string(), false),
            ("updated_at".to_string(), false),
        ]
    );
}

#[test]
fn plain_insert_of_existing_key_violates_primary_key() {
    let conn = open_db_in_memory().unwrap();
    let mut store = SqliteKvStore::new(&conn);
    store.set("sn-notes", "[]").unwrap();

    let err = conn
        .execute(
            "INSERT INTO kv_entries (key, value) VALUES ('sn-notes', '[1]');",
            [],
        )
        .unwrap_err();
    assert_eq!(err.sqlite_error_code(), Some(ErrorCode::ConstraintViolation));
    assert_eq!(store.get("sn-notes").unwrap().as_deref(), Some("[]"));
}

#[test]
fn updated_at_defaults_to_epoch_millis() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO kv_entries (key, value) VALUES ('sn-darkMode', 'true');",
        [],
    )
    .unwrap();

    let updated_at: i64 = conn
        .query_row(
            "SELECT updated_at FROM kv_entries WHERE key = 'sn-darkMode';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    // 2020-01-01T00:00:00Z in milliseconds.
    assert!(updated_at > 1_577_836_800_000);
}

#[test]
fn reopening_existing_database_keeps_rows_and_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let mut store = SqliteKvStore::new(&conn);
        store.set("sn-categories", r#"["General","Work"]"#).unwrap();
        store.set("sn-todos", "[]").unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(stored_version(&conn).unwrap(), SCHEMA_VERSION);
    let store = SqliteKvStore::new(&conn);
    assert_eq!(store.keys().unwrap(), vec!["sn-categories", "sn-todos"]);
    assert_eq!(
        store.get("sn-categories").unwrap().as_deref(),
        Some(r#"["General","Work"]"#)
    );
}

#[test]
fn database_from_newer_build_is_refused_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("newer.sqlite3");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(&format!("PRAGMA user_version = {};", SCHEMA_VERSION + 1))
            .unwrap();
    }

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::SchemaTooNew { found, supported }
            if found == SCHEMA_VERSION + 1 && supported == SCHEMA_VERSION
    ));
    assert_eq!(err.code(), "schema_too_new");
    assert!(err.to_string().contains("smartnotes"));

    let conn = Connection::open(&path).unwrap();
    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE name = 'kv_entries';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tables, 0);
}
