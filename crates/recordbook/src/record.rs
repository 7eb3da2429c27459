//! Core record types for recordbook.
//!
//! A [`Record`] is an immutable name/value pair stamped by the store with an
//! id and a creation time. [`NewRecord`] is what callers hand to the store.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;

use crate::error::{Error, Result};

/// A persisted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Identifier assigned by the store. Never reused.
    pub id: i64,
    /// Caller-supplied name.
    pub name: String,
    /// Caller-supplied value.
    pub value: String,
    /// When the store created this record.
    pub created_at: DateTime<Utc>,
}

impl Record {
    /// Render the creation time in the persisted text format.
    #[must_use]
    pub fn created_at_text(&self) -> String {
        format_timestamp(self.created_at)
    }
}

/// Input for creating a record.
///
/// Deserialises from a `{ "name": .., "value": .. }` body. Missing fields
/// come through as empty strings and are rejected by [`NewRecord::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewRecord {
    /// Record name.
    pub name: String,
    /// Record value.
    pub value: String,
}

impl NewRecord {
    /// Create a new record input.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Check that both fields contain something other than whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BlankField`] naming the first blank field.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::blank_field("name"));
        }
        if self.value.trim().is_empty() {
            return Err(Error::blank_field("value"));
        }
        Ok(())
    }
}

/// Format a timestamp as RFC 3339 with fixed microsecond precision.
///
/// Fixed width keeps lexicographic order identical to chronological order,
/// which the store relies on for `ORDER BY created_at`.
#[must_use]
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a timestamp written by [`format_timestamp`].
///
/// # Errors
///
/// Returns an error if the text is not valid RFC 3339.
pub fn parse_timestamp(text: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text).map(|dt| dt.with_timezone(&Utc))
}
