//! `recordbook` - A minimal name/value record keeping service
//!
//! This library provides the `SQLite` record store, the JSON and HTML
//! renderings of records, and the axum router that serves them.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod server;
pub mod storage;
pub mod view;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::{NewRecord, Record};
pub use server::{router, serve, ApiError, AppState};
pub use storage::RecordStore;
pub use view::RecordJson;
