//! `SQLite` schema definitions for recordbook.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the records table.
pub const CREATE_RECORDS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    value TEXT NOT NULL,
    created_at TEXT NOT NULL
)
";

/// SQL statement to create an index on `created_at` for newest-first listing.
pub const CREATE_CREATED_AT_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_records_created_at ON records(created_at DESC)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_RECORDS_TABLE,
    CREATE_CREATED_AT_INDEX,
    CREATE_METADATA_TABLE,
];
