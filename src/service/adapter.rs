//! Output adapters for resolved settings.
//!
//! Renders a serializable snapshot as:
//! - JSON (default)
//! - YAML

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::Format;

/// Adapter for rendering internal types in the requested format.
pub struct FormatAdapter {
    format: Format,
}

impl FormatAdapter {
    /// Create a new adapter for the specified format.
    pub fn new(format: Format) -> Self {
        Self { format }
    }

    /// Render `value` based on the format.
    pub fn render<T: Serialize>(&self, value: &T) -> Result<String> {
        match self.format {
            Format::Json => {
                serde_json::to_string_pretty(value).context("Failed to render JSON output")
            }
            Format::Yaml => serde_yaml::to_string(value)
                .map(|yaml| yaml.trim_end().to_string())
                .context("Failed to render YAML output"),
        }
    }
}
