//! Storage layer for recordbook.
//!
//! This module provides the `SQLite`-backed [`RecordStore`]. The store keeps
//! only the database path; each operation opens its own connection and drops
//! it before returning, so no connection outlives a single call.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{SubsecRound, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::{format_timestamp, parse_timestamp, NewRecord, Record};

/// Default time a connection waits on a locked database file.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Persistent store of [`Record`]s.
///
/// Cheap to clone; clones share nothing but the path to the database file.
#[derive(Debug, Clone)]
pub struct RecordStore {
    /// Path to the database file.
    path: PathBuf,
    /// How long a connection waits for a competing writer.
    busy_timeout: Duration,
}

impl RecordStore {
    /// Open or create a record database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist
    /// and brings the schema up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_timeout(path, DEFAULT_BUSY_TIMEOUT)
    }

    /// Like [`RecordStore::open`] with an explicit busy timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open_with_timeout(path: impl AsRef<Path>, busy_timeout: Duration) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let store = Self { path, busy_timeout };
        let mut conn = store.connect()?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&mut conn)?;

        info!("Record store ready at {}", store.path.display());
        Ok(store)
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a fresh connection for one operation.
    fn connect(&self) -> Result<Connection> {
        debug!("Opening connection to {}", self.path.display());
        let conn = Connection::open(&self.path).map_err(|source| Error::DatabaseOpen {
            path: self.path.clone(),
            source,
        })?;
        conn.busy_timeout(self.busy_timeout)?;
        Ok(conn)
    }

    /// Insert a new record, stamping it with the current time.
    ///
    /// The input is expected to have been validated already.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails or yields no generated id.
    pub fn create(&self, input: &NewRecord) -> Result<Record> {
        let conn = self.connect()?;
        let created_at = Utc::now().trunc_subsecs(6);

        let id: Option<i64> = conn
            .query_row(
                r"
                INSERT INTO records (name, value, created_at)
                VALUES (?1, ?2, ?3)
                RETURNING id
                ",
                params![input.name, input.value, format_timestamp(created_at)],
                |row| row.get(0),
            )
            .optional()?;
        let id = id.ok_or(Error::MissingGeneratedId { table: "records" })?;

        debug!("Inserted record with id {}", id);
        Ok(Record {
            id,
            name: input.name.clone(),
            value: input.value.clone(),
            created_at,
        })
    }

    /// List every record, newest first.
    ///
    /// Records sharing a timestamp are ordered by descending id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_all(&self) -> Result<Vec<Record>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            r"
            SELECT id, name, value, created_at
            FROM records ORDER BY created_at DESC, id DESC
            ",
        )?;

        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!("Listed {} records", records.len());
        Ok(records)
    }

    /// Get a record by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails. A missing id is
    /// `Ok(None)`.
    pub fn get(&self, id: i64) -> Result<Option<Record>> {
        let conn = self.connect()?;
        let record = conn
            .query_row(
                "SELECT id, name, value, created_at FROM records WHERE id = ?1",
                [id],
                Self::row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    /// Count stored records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Convert a database row to a Record.
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<Record> {
        let created_at_text: String = row.get(3)?;
        let created_at = parse_timestamp(&created_at_text)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

        Ok(Record {
            id: row.get(0)?,
            name: row.get(1)?,
            value: row.get(2)?,
            created_at,
        })
    }
}
