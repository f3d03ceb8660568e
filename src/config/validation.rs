//! Value conversion and validation helpers.

use anyhow::{bail, Result};
use serde_yaml::Value;
use tracing::warn;

use super::types::{FileSize, ResolvedSettings};
use crate::domain::ConfigError;

/// Short human-readable rendering of a node for diagnostics.
pub fn describe_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{}'", s),
        Value::Sequence(_) => "a sequence".to_string(),
        Value::Mapping(_) => "a mapping".to_string(),
        Value::Tagged(tagged) => format!("a value tagged {}", tagged.tag),
    }
}

/// Read a scalar as text. Numbers and booleans are accepted since YAML
/// happily types `password: 123456` as an integer.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Read a number of seconds. Fractional values are rounded to the
/// nearest second; negative and non-finite values are rejected.
pub fn to_seconds(value: &Value) -> Option<u64> {
    if let Some(secs) = value.as_u64() {
        return Some(secs);
    }
    value
        .as_f64()
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(|secs| secs.round() as u64)
}

/// Keep the valid file size tags in order, dropping the rest.
///
/// Builds a new list in a single pass. Falls back to `[original]` when
/// nothing valid remains.
pub fn filter_file_sizes(entries: &[Value], location: &str) -> Vec<FileSize> {
    let mut sizes = Vec::with_capacity(entries.len());

    for entry in entries {
        let parsed = match entry {
            Value::String(tag) => tag.parse::<FileSize>(),
            other => Err(ConfigError::InvalidFileSize {
                value: describe_value(other),
                valid: FileSize::valid_list(),
            }),
        };

        match parsed {
            Ok(size) => sizes.push(size),
            Err(e) => warn!("Skipping entry in {}: {}.", location, e),
        }
    }

    if sizes.is_empty() {
        warn!("No valid file size in {}. Downloading original size photos ...", location);
        sizes.push(FileSize::Original);
    }

    sizes
}

/// Collect album names, dropping entries that are not scalars.
pub fn album_names(entries: &[Value], location: &str) -> Vec<String> {
    entries
        .iter()
        .filter_map(|entry| match entry {
            Value::String(_) | Value::Number(_) => scalar_to_string(entry),
            other => {
                warn!(
                    "Skipping album entry {} in {}: expected a name.",
                    describe_value(other),
                    location
                );
                None
            }
        })
        .collect()
}

/// Validate a resolved configuration for running a sync.
pub fn validate(settings: &ResolvedSettings) -> Result<()> {
    if settings.username.is_none() {
        return Err(ConfigError::MissingUsername.into());
    }

    if settings.smtp.email.is_some() && settings.smtp.host.is_none() {
        bail!("app > smtp > host is required when app > smtp > email is set");
    }

    Ok(())
}
