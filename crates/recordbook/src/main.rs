//! `recordbook` - CLI for the record keeping service
//!
//! `recordbook serve` runs the HTTP API and page; `recordbook config` inspects
//! the configuration it would use.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use recordbook::cli::{Cli, Command, ConfigCommand, ServeCommand};
use recordbook::{init_logging, server, Config, RecordStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    match cli.command {
        Command::Serve(serve_cmd) => handle_serve(cli.config, &serve_cmd).await,
        Command::Config(config_cmd) => handle_config(cli.config, config_cmd),
    }
}

async fn handle_serve(config_path: Option<PathBuf>, cmd: &ServeCommand) -> anyhow::Result<()> {
    let mut config = Config::load_from(config_path)?;
    cmd.apply(&mut config);
    config.validate()?;

    let database_path = config.database_path();
    let busy_timeout = config.busy_timeout();
    let (store, records) = tokio::task::spawn_blocking(move || {
        let store = RecordStore::open_with_timeout(&database_path, busy_timeout)?;
        let records = store.count()?;
        Ok::<_, recordbook::Error>((store, records))
    })
    .await
    .context("store initialisation task failed")??;

    info!(records, "Opened record store at {}", store.path().display());

    server::serve(store, config.bind_addr()?).await?;
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Server]");
                println!("  Bind address:       {}", config.server.bind);
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Busy timeout (ms):  {}", config.storage.busy_timeout_ms);
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::validate_file(&path)
                .with_context(|| format!("configuration at {} is invalid", path.display()))?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
