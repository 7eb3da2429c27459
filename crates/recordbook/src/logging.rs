//! Tracing setup for recordbook.
//!
//! The binary logs through one `fmt` subscriber. Without `RUST_LOG`, both the
//! crate and `tower_http` request spans log at the level picked by `-v`/`-q`.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How much the binary logs, as chosen on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// `-q`: errors only.
    Quiet,
    /// No flag: startup, shutdown and server faults.
    #[default]
    Normal,
    /// `-v`: per-request spans and store calls.
    Verbose,
    /// `-vv` and up.
    Trace,
}

impl Verbosity {
    /// Most detailed level that gets through.
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Directive used when `RUST_LOG` is unset.
    #[must_use]
    pub fn default_directive(&self) -> String {
        let level = self.to_level_filter();
        format!("recordbook={level},tower_http={level}")
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `verbosity`. A second call is a no-op.
///
/// ```no_run
/// use recordbook::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Verbose);
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.default_directive()));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}

/// Warnings and errors only, captured per test.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
