//! Error types for recordbook.
//!
//! This module defines the error type shared by the store, the configuration
//! layer and the HTTP server. The server maps these onto status codes in
//! [`crate::server::ApiError`].

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for recordbook operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// An insert completed without handing back the generated id.
    #[error("insert into {table} did not return a generated id")]
    MissingGeneratedId {
        /// Table the insert targeted.
        table: &'static str,
    },

    // === Validation Errors ===
    /// A caller-supplied record field failed validation.
    #[error("{field} must not be blank")]
    BlankField {
        /// Name of the offending field.
        field: &'static str,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Server Errors ===
    /// The HTTP listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    ServerBind {
        /// Address we tried to listen on.
        addr: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// A specialized Result type for recordbook operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a blank-field validation error.
    #[must_use]
    pub fn blank_field(field: &'static str) -> Self {
        Self::BlankField { field }
    }

    /// Check if this error was caused by caller input rather than a fault.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::BlankField { .. })
    }
}
