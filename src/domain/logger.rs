//! Logging system with console output and optional daily-rotated log files.

use anyhow::Result;
use std::fs;
use std::io::IsTerminal;
use std::path::Path;
use time::macros::format_description;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Prefix of rotated log file names.
const LOG_FILE_PREFIX: &str = "icloud-sync";

/// Logging options taken from the command line.
#[derive(Debug, Clone, Copy)]
pub struct LogOptions<'a> {
    /// Lowest level shown unless `RUST_LOG` says otherwise
    pub level: LevelFilter,

    /// Also write logs to daily-rotated files in this directory
    pub log_dir: Option<&'a Path>,
}

impl LogOptions<'_> {
    /// Map `--debug` / `--quiet` onto a level filter.
    pub fn level_for(debug: bool, quiet: bool) -> LevelFilter {
        if debug {
            LevelFilter::DEBUG
        } else if quiet {
            LevelFilter::ERROR
        } else {
            LevelFilter::INFO
        }
    }
}

/// Initialize the logging system.
pub fn init(options: LogOptions<'_>) -> Result<()> {
    // Use local timezone for timestamps
    let time_format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let local_offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    let timer = OffsetTime::new(local_offset, time_format);

    let file_layer = match options.log_dir {
        Some(log_dir) => {
            if !log_dir.exists() {
                fs::create_dir_all(log_dir)?;
            }
            cleanup_old_logs(log_dir)?;

            let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_timer(timer.clone()),
            )
        }
        None => None,
    };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .with_timer(timer);

    let filter = EnvFilter::builder()
        .with_default_directive(options.level.into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    Ok(())
}

/// Clean up log files older than 2 days.
pub fn cleanup_old_logs(log_path: &Path) -> Result<()> {
    use std::time::{Duration, SystemTime};

    let two_days = Duration::from_secs(2 * 24 * 60 * 60);
    let cutoff = SystemTime::now() - two_days;

    if !log_path.exists() {
        return Ok(());
    }

    for entry in fs::read_dir(log_path)? {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let filename = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => continue,
        };

        if !filename.starts_with(LOG_FILE_PREFIX) {
            continue;
        }

        if let Ok(metadata) = entry.metadata() {
            if let Ok(modified) = metadata.modified() {
                if modified < cutoff {
                    let _ = fs::remove_file(&path);
                }
            }
        }
    }

    Ok(())
}
