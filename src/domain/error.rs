//! Error types for icloud-sync.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value exists at the path but has the wrong shape
    #[error("{path} has an unexpected value {found}; expected {expected}")]
    UnexpectedShape {
        path: String,
        found: String,
        expected: &'static str,
    },

    /// A required value is present but empty
    #[error("{path} is empty")]
    EmptyValue { path: String },

    /// Unknown photo file size tag
    #[error("Invalid file size '{value}'. Valid file sizes are {valid}")]
    InvalidFileSize { value: String, valid: String },

    /// Username is not configured
    #[error("username is missing or empty in app > credentials > username")]
    MissingUsername,

    /// Destination directory could not be created or resolved
    #[error("Failed to prepare directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid YAML
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
