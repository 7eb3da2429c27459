//! Command-line interface for recordbook.
//!
//! This module provides the CLI structure for the `recordbook` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::logging::Verbosity;

pub use commands::{ConfigCommand, ServeCommand};

/// recordbook - keep named values, served over HTTP
///
/// Runs a small web service that stores name/value records in `SQLite` and
/// exposes them through a JSON API and an HTML page.
#[derive(Debug, Parser)]
#[command(name = "recordbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP service
    Serve(ServeCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}

impl ServeCommand {
    /// Apply command-line overrides on top of loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(bind) = &self.bind {
            config.server.bind.clone_from(bind);
        }
        if let Some(database) = &self.database {
            config.storage.database_path = Some(database.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli_with(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Config(ConfigCommand::Path),
        }
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "recordbook");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(cli_with(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli_with(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli_with(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli_with(3, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["recordbook", "serve"]).unwrap();
        match cli.command {
            Command::Serve(cmd) => {
                assert!(cmd.bind.is_none());
                assert!(cmd.database.is_none());
            }
            Command::Config(_) => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_serve_with_overrides() {
        let cli = Cli::try_parse_from([
            "recordbook",
            "-v",
            "serve",
            "--bind",
            "0.0.0.0:9000",
            "--database",
            "/tmp/records.db",
        ])
        .unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Verbose);

        let Command::Serve(cmd) = cli.command else {
            panic!("expected serve");
        };
        let mut config = Config::default();
        cmd.apply(&mut config);
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.database_path(), PathBuf::from("/tmp/records.db"));
    }

    #[test]
    fn test_parse_config_show_json() {
        let cli = Cli::try_parse_from(["recordbook", "config", "show", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Show { json: true })
        ));
    }

    #[test]
    fn test_parse_global_config_flag() {
        let cli =
            Cli::try_parse_from(["recordbook", "config", "path", "--config", "/etc/rb.toml"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/rb.toml")));
    }

    #[test]
    fn test_parse_unknown_command_fails() {
        assert!(Cli::try_parse_from(["recordbook", "daemon"]).is_err());
    }
}
