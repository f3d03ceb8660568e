//! CLI argument parsing and command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Configuration resolver for an iCloud Drive and Photos backup tool
#[derive(Parser)]
#[command(
    name = "icloud-sync",
    version,
    about = "Configuration resolver for an iCloud Drive and Photos backup tool",
    long_about = "Loads the YAML configuration of the iCloud backup tool, fills in defaults, \
                  validates every setting and prepares the download directories."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file (default: ./config/config.yaml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Also write logs to daily-rotated files in this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,
}

/// Output format for resolved settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Pretty-printed JSON (default)
    #[default]
    Json,
    /// YAML
    Yaml,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Resolve every setting and print the result (alias: resolve)
    #[command(alias = "resolve")]
    Show {
        /// Output format
        #[arg(long, short = 'f', default_value = "json")]
        format: Format,
    },
    /// Validate configuration file
    Check,
    /// Generate default configuration file
    Init {
        /// Path where to create the configuration file
        #[arg(long, short = 'p')]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Display version information
    Version,
}
