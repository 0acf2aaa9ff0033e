use contactbook_core::db::migrations::latest_version;
use contactbook_core::db::{open_db, open_db_in_memory, DbError};
use contactbook_core::{
    ContactDraft, ContactService, PhoneDraft, PhoneType, SqliteContactRepository,
};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "contacts");
    assert_table_exists(&conn, "phones");
}

#[test]
fn opened_connections_enforce_foreign_keys() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn cascade_delete_removes_phone_rows_at_schema_level() {
    let conn = open_db_in_memory().unwrap();
    conn.execute("INSERT INTO contacts (title) VALUES ('Jane');", [])
        .unwrap();
    let contact_id = conn.last_insert_rowid();
    conn.execute(
        "INSERT INTO phones (contact_id, phone, type) VALUES (?1, '11999998888', 'personal');",
        [contact_id],
    )
    .unwrap();

    conn.execute("DELETE FROM contacts WHERE id = ?1;", [contact_id])
        .unwrap();

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM phones;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 0);
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contactbook.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "contacts");
}

#[test]
fn data_survives_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contactbook.db");

    {
        let mut conn = open_db(&path).unwrap();
        let repo = SqliteContactRepository::try_new(&mut conn).unwrap();
        let mut service = ContactService::new(repo);
        service
            .save_contact(&ContactDraft {
                title: "Jane".to_string(),
                phones: vec![PhoneDraft {
                    number: "11999998888".to_string(),
                    kind: Some(PhoneType::Personal),
                }],
            })
            .unwrap();
    }

    let mut conn = open_db(&path).unwrap();
    let repo = SqliteContactRepository::try_new(&mut conn).unwrap();
    let service = ContactService::new(repo);
    let contacts = service.list_contacts().unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].title, "Jane");
    assert_eq!(contacts[0].phones[0].number, "11999998888");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
