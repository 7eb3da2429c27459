//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Address to listen on (overrides `server.bind`)
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Database file (overrides `storage.database_path`)
    #[arg(short, long, value_name = "FILE")]
    pub database: Option<PathBuf>,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_command_debug() {
        let cmd = ServeCommand {
            bind: Some("0.0.0.0:80".to_string()),
            database: None,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("0.0.0.0:80"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
