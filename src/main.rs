//! icloud-sync: configuration resolver for an iCloud backup tool
//!
//! Loads the YAML configuration, resolves every setting against its default,
//! and creates the root, drive and photos download directories.

mod cli;
mod config;
mod domain;
mod service;

use std::process;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands, Format};
use config::{ConfigDefaults, ConfigService, ConfigTree};
use domain::logger::{self, LogOptions};
use service::ReportService;

/// Exit code when no configuration file is available.
const EXIT_NO_CONFIG: i32 = 1;

fn main() -> Result<()> {
    let cli = Cli::parse();

    logger::init(LogOptions {
        level: LogOptions::level_for(cli.debug, cli.quiet),
        log_dir: cli.log_dir.as_deref(),
    })?;

    // Execute command
    match cli.command {
        Commands::Show { format } => {
            let tree = load_or_exit(&cli)?;
            ReportService::new(ConfigDefaults::default(), format).show(&tree)?;
        }
        Commands::Check => {
            let tree = load_or_exit(&cli)?;
            ReportService::new(ConfigDefaults::default(), Format::default()).check(&tree)?;
            if !cli.quiet {
                eprintln!("Configuration is valid.");
            }
        }
        Commands::Init { ref path, force } => {
            let config_path = path.clone().unwrap_or_else(ConfigService::default_path);
            ConfigService::generate_at(&config_path, force)?;
            if !cli.quiet {
                eprintln!("Configuration file created at: {}", config_path.display());
            }
        }
        Commands::Version => {
            println!("icloud-sync {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

/// Load the configuration, exiting when the file does not exist.
fn load_or_exit(cli: &Cli) -> Result<ConfigTree> {
    match ConfigService::load(cli.config.as_deref())? {
        Some(tree) => Ok(tree),
        None => process::exit(EXIT_NO_CONFIG),
    }
}
