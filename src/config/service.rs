//! Configuration service for loading and generating config files.

use anyhow::{bail, Context, Result};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use super::tree::{get_value_mut, path_to_string, ConfigTree};
use crate::domain::ConfigError;

/// Default configuration file location, relative to the working directory.
pub const DEFAULT_CONFIG_FILE_PATH: &str = "./config/config.yaml";

const CREDENTIALS_PATH: &[&str] = &["app", "credentials"];

/// Configuration service.
pub struct ConfigService;

impl ConfigService {
    /// Get the default configuration file path.
    pub fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_FILE_PATH)
    }

    /// Load configuration from file.
    ///
    /// If `path` is `None`, uses the default path.
    /// A missing file is reported and yields `Ok(None)`; read and parse
    /// failures are errors.
    pub fn load(path: Option<&Path>) -> Result<Option<ConfigTree>> {
        let path = path.map(PathBuf::from).unwrap_or_else(Self::default_path);

        if !path.is_file() {
            error!("Config file not found at {}.", path.display());
            return Ok(None);
        }

        info!("Loading config from {} ...", path.display());
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        let mut tree = Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        Self::normalize_username(&mut tree);

        Ok(Some(tree))
    }

    /// Parse a YAML document. An empty document parses to `null`.
    pub fn parse(content: &str) -> Result<ConfigTree, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_yaml::from_str(content)
    }

    /// Trim the username in place; a null username becomes an empty string.
    ///
    /// Skipped when `app > credentials` is missing or not a mapping.
    pub fn normalize_username(tree: &mut ConfigTree) {
        let Some(credentials) = get_value_mut(tree, CREDENTIALS_PATH).and_then(Value::as_mapping_mut)
        else {
            debug!(
                "{} not found, skipping username normalization",
                path_to_string(CREDENTIALS_PATH)
            );
            return;
        };

        let normalized = match credentials.get("username") {
            Some(Value::String(name)) => name.trim().to_string(),
            Some(Value::Null) => String::new(),
            _ => return,
        };
        credentials.insert(Value::from("username"), Value::String(normalized));
    }

    /// Generate default configuration file at the specified path.
    ///
    /// Refuses to replace an existing file unless `force` is set.
    pub fn generate_at(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            bail!(
                "Config file already exists: {} (use --force to overwrite)",
                path.display()
            );
        }

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, Self::default_config_content())
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Generate default configuration content with comments.
    fn default_config_content() -> &'static str {
        r#"# icloud-sync configuration file

app:
  credentials:
    # iCloud (Apple ID) username, required
    username: ""
  # Log every resolved setting in detail (default: false)
  verbose: false
  # Seconds between two sync runs (default: 1800)
  sync_interval: 1800
  # Root directory for all downloads (default: ./icloud)
  root: "./icloud"
  # Mail notifications, e.g. when the session needs re-authentication
  # smtp:
  #   email: "user@example.com"
  #   password: "app-specific-password"
  #   host: "smtp.example.com"
  #   port: 587
  #   no_tls: false

drive:
  # Relative to app.root (default: drive)
  destination: "drive"
  # Delete local files that no longer exist in iCloud Drive (default: false)
  remove_obsolete: false

photos:
  # Relative to app.root (default: photos)
  destination: "photos"
  # Delete local photos that no longer exist in iCloud Photos (default: false)
  remove_obsolete: false
  filters:
    # Albums to download; leave empty to download every album
    # albums:
    #   - "Favorites"
    # Any of: original, medium, thumb (default: original)
    file_sizes:
      - "original"
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tree::get_value;
    use crate::config::Settings;

    #[test]
    fn test_missing_file_yields_none() {
        let temp = tempfile::tempdir().unwrap();
        let loaded = ConfigService::load(Some(&temp.path().join("absent.yaml"))).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_directory_is_not_a_config_file() {
        let temp = tempfile::tempdir().unwrap();
        assert!(ConfigService::load(Some(temp.path())).unwrap().is_none());
    }

    #[test]
    fn test_load_trims_username() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "app:\n  credentials:\n    username: '  bob  '\n").unwrap();

        let tree = ConfigService::load(Some(&path)).unwrap().unwrap();

        assert_eq!(
            get_value(&tree, &["app", "credentials", "username"]).and_then(Value::as_str),
            Some("bob")
        );
    }

    #[test]
    fn test_null_username_normalized_to_empty() {
        let mut tree = ConfigService::parse("app:\n  credentials:\n    username:\n").unwrap();
        ConfigService::normalize_username(&mut tree);

        assert_eq!(
            get_value(&tree, &["app", "credentials", "username"]).and_then(Value::as_str),
            Some("")
        );
        assert_eq!(Settings::new(&tree).username(), None);
    }

    #[test]
    fn test_normalization_without_credentials_is_skipped() {
        let mut tree = ConfigService::parse("app:\n  verbose: true\n").unwrap();
        let before = tree.clone();
        ConfigService::normalize_username(&mut tree);
        assert_eq!(tree, before);

        let mut empty = ConfigService::parse("").unwrap();
        ConfigService::normalize_username(&mut empty);
        assert_eq!(empty, Value::Null);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "app: [unclosed\n").unwrap();

        let err = ConfigService::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_generated_template_parses() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("nested").join("config.yaml");

        ConfigService::generate_at(&path, false).unwrap();
        let tree = ConfigService::load(Some(&path)).unwrap().unwrap();

        let settings = Settings::new(&tree);
        assert_eq!(settings.sync_interval(), 1800);
        assert_eq!(settings.username(), None);
    }

    #[test]
    fn test_generate_refuses_to_overwrite() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "keep: me\n").unwrap();

        assert!(ConfigService::generate_at(&path, false).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep: me\n");

        ConfigService::generate_at(&path, true).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("sync_interval"));
    }
}
