//! Database migration system for recordbook.
//!
//! The base tables come from [`SCHEMA_STATEMENTS`]; anything added after
//! the first release goes into [`MIGRATIONS`] as a numbered step. The applied
//! version is kept in the `metadata` table.

use rusqlite::{Connection, OptionalExtension, Transaction};
use tracing::info;

use crate::error::{Error, Result};

use super::schema::SCHEMA_STATEMENTS;

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

/// Ordered migration steps. Entry `n` (zero based) upgrades to version `n + 1`.
///
/// Version 1 is the base schema, so its step has no SQL of its own.
const MIGRATIONS: &[&str] = &[""];

/// The schema version this build writes.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const CURRENT_VERSION: i32 = MIGRATIONS.len() as i32;

/// Create the schema if needed and bring it up to [`CURRENT_VERSION`].
///
/// Safe to call on every startup.
///
/// # Errors
///
/// Returns an error if schema creation fails, the stored version is
/// unreadable, or the database is newer than this build.
pub fn initialize_schema(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;
    for statement in SCHEMA_STATEMENTS {
        tx.execute(statement, [])?;
    }

    let version = schema_version(&tx)?;
    if version > CURRENT_VERSION {
        return Err(Error::DatabaseMigration {
            message: format!(
                "database schema version {version} is newer than supported version {CURRENT_VERSION}"
            ),
        });
    }
    for target in (version + 1)..=CURRENT_VERSION {
        apply(&tx, target)?;
    }

    tx.commit()?;
    if version < CURRENT_VERSION {
        info!(from = version, to = CURRENT_VERSION, "Migrated database schema");
    }
    Ok(())
}

/// Read the applied schema version. A fresh database reports 0.
fn schema_version(conn: &Connection) -> Result<i32> {
    let stored: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match stored {
        None => Ok(0),
        Some(value) => value.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {value}"),
        }),
    }
}

fn apply(tx: &Transaction<'_>, target: i32) -> Result<()> {
    let step = usize::try_from(target - 1)
        .ok()
        .and_then(|idx| MIGRATIONS.get(idx))
        .ok_or_else(|| Error::DatabaseMigration {
            message: format!("unknown migration version: {target}"),
        })?;

    if !step.is_empty() {
        tx.execute_batch(step)?;
    }
    tx.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, target.to_string()),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_db() -> Connection {
        Connection::open_in_memory().expect("failed to create in-memory database")
    }

    fn table_exists(conn: &Connection, name: &str) -> bool {
        let count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                [name],
                |row| row.get(0),
            )
            .unwrap();
        count == 1
    }

    #[test]
    fn test_initialize_schema_creates_tables() {
        let mut conn = create_test_db();
        initialize_schema(&mut conn).expect("failed to initialize schema");

        assert!(table_exists(&conn, "records"));
        assert!(table_exists(&conn, "metadata"));
    }

    #[test]
    fn test_initialize_schema_sets_version() {
        let mut conn = create_test_db();
        initialize_schema(&mut conn).unwrap();

        assert_eq!(schema_version(&conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn test_initialize_schema_idempotent() {
        let mut conn = create_test_db();
        initialize_schema(&mut conn).expect("first init failed");
        initialize_schema(&mut conn).expect("second init failed");

        assert_eq!(schema_version(&conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn test_schema_version_fresh_db() {
        let conn = create_test_db();
        conn.execute(
            "CREATE TABLE metadata (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )
        .unwrap();

        assert_eq!(schema_version(&conn).unwrap(), 0);
    }

    #[test]
    fn test_created_at_index_exists() {
        let mut conn = create_test_db();
        initialize_schema(&mut conn).unwrap();

        let indexes: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='index' AND tbl_name='records'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(indexes.iter().any(|n| n == "idx_records_created_at"));
    }

    #[test]
    fn test_corrupt_schema_version_is_rejected() {
        let mut conn = create_test_db();
        initialize_schema(&mut conn).unwrap();
        conn.execute(
            "UPDATE metadata SET value = 'banana' WHERE key = ?1",
            [VERSION_KEY],
        )
        .unwrap();

        let err = initialize_schema(&mut conn).unwrap_err();
        assert!(err.to_string().contains("invalid schema version"));
    }

    #[test]
    fn test_newer_schema_is_rejected() {
        let mut conn = create_test_db();
        initialize_schema(&mut conn).unwrap();
        conn.execute(
            "UPDATE metadata SET value = ?1 WHERE key = ?2",
            ((CURRENT_VERSION + 1).to_string(), VERSION_KEY),
        )
        .unwrap();

        let err = initialize_schema(&mut conn).unwrap_err();
        assert!(err.to_string().contains("newer than supported"));
    }

    #[test]
    fn test_apply_unknown_version() {
        let mut conn = create_test_db();
        initialize_schema(&mut conn).unwrap();

        let tx = conn.transaction().unwrap();
        let err = apply(&tx, 999).unwrap_err();
        assert!(err.to_string().contains("unknown migration version"));
    }
}
