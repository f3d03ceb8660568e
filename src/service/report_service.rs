//! Settings report service.

use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::Format;
use crate::config::{self, ConfigDefaults, ConfigTree, ResolvedSettings, Settings};
use crate::service::adapter::FormatAdapter;

/// Service resolving a loaded configuration and reporting on it.
pub struct ReportService {
    defaults: ConfigDefaults,
    adapter: FormatAdapter,
}

impl ReportService {
    /// Create a new ReportService rendering in the specified format.
    pub fn new(defaults: ConfigDefaults, format: Format) -> Self {
        Self {
            defaults,
            adapter: FormatAdapter::new(format),
        }
    }

    /// Resolve every setting, creating destination directories.
    pub fn resolve(&self, tree: &ConfigTree) -> Result<ResolvedSettings> {
        let settings = Settings::with_defaults(tree, self.defaults.clone());
        let resolved = settings
            .resolve_all()
            .context("Failed to resolve configuration")?;
        debug!("Resolved settings: {:?}", resolved);
        Ok(resolved)
    }

    /// Resolve and print the settings to stdout.
    pub fn show(&self, tree: &ConfigTree) -> Result<()> {
        let resolved = self.resolve(tree)?;
        let output = self.adapter.render(&resolved)?;

        let stdout = io::stdout();
        let mut stdout = stdout.lock();
        writeln!(stdout, "{}", output)?;
        Ok(())
    }

    /// Resolve and validate the settings.
    pub fn check(&self, tree: &ConfigTree) -> Result<ResolvedSettings> {
        let resolved = self.resolve(tree)?;
        config::validate(&resolved)?;
        if !resolved.smtp.is_configured() {
            info!("SMTP is not configured. Notifications are disabled.");
        }
        Ok(resolved)
    }
}
