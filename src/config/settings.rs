//! Typed accessors resolving each setting against its default.
//!
//! Every accessor follows the same shape: look up a fixed key path, fall back
//! to the default (with a diagnostic) when the path is absent or holds a value
//! of the wrong shape, then post-process. Accessors never fail, except the
//! destination accessors which may hit an I/O error creating directories.

use std::path::PathBuf;

use serde_yaml::Value;
use tracing::{error, info, warn};

use super::tree::{get_value, path_exists, path_to_string, ConfigTree};
use super::types::{
    ConfigDefaults, DriveSettings, FileSize, PhotosFilter, PhotosSettings, ResolvedSettings,
    SmtpSettings,
};
use super::validation::{
    album_names, describe_value, filter_file_sizes, scalar_to_string, to_seconds,
};
use crate::domain::destination::prepare_directory;
use crate::domain::ConfigError;

const USERNAME_PATH: &[&str] = &["app", "credentials", "username"];
const VERBOSE_PATH: &[&str] = &["app", "verbose"];
const SYNC_INTERVAL_PATH: &[&str] = &["app", "sync_interval"];
const ROOT_PATH: &[&str] = &["app", "root"];
const SMTP_EMAIL_PATH: &[&str] = &["app", "smtp", "email"];
const SMTP_PASSWORD_PATH: &[&str] = &["app", "smtp", "password"];
const SMTP_HOST_PATH: &[&str] = &["app", "smtp", "host"];
const SMTP_PORT_PATH: &[&str] = &["app", "smtp", "port"];
const SMTP_NO_TLS_PATH: &[&str] = &["app", "smtp", "no_tls"];
const DRIVE_DESTINATION_PATH: &[&str] = &["drive", "destination"];
const DRIVE_REMOVE_OBSOLETE_PATH: &[&str] = &["drive", "remove_obsolete"];
const PHOTOS_DESTINATION_PATH: &[&str] = &["photos", "destination"];
const PHOTOS_REMOVE_OBSOLETE_PATH: &[&str] = &["photos", "remove_obsolete"];
const PHOTOS_FILTERS_PATH: &[&str] = &["photos", "filters"];
const PHOTOS_ALBUMS_PATH: &[&str] = &["photos", "filters", "albums"];
const PHOTOS_FILE_SIZES_PATH: &[&str] = &["photos", "filters", "file_sizes"];

/// Diagnostic severity for an absent setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Silent,
}

impl Severity {
    fn emit(self, message: &str) {
        match self {
            Severity::Error => error!("{}", message),
            Severity::Warning => warn!("{}", message),
            Severity::Info => info!("{}", message),
            Severity::Silent => {}
        }
    }
}

/// How a setting's value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Read from the document
    Found,
    /// Present but unusable, default used
    Invalid,
    /// Absent, default used
    Missing,
}

/// A resolved value together with its resolution outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub resolution: Resolution,
}

impl<T> Resolved<T> {
    fn found(value: T) -> Self {
        Self {
            value,
            resolution: Resolution::Found,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        self.resolution != Resolution::Found
    }
}

/// Where to look and how to report.
struct Lookup<'a> {
    path: &'a [&'a str],
    expected: &'static str,
    missing: Severity,
    fallback: &'a str,
}

/// Accessors over a loaded configuration tree.
pub struct Settings<'a> {
    tree: &'a ConfigTree,
    defaults: ConfigDefaults,
}

impl<'a> Settings<'a> {
    /// Resolve settings against the built-in defaults.
    #[cfg(test)]
    pub fn new(tree: &'a ConfigTree) -> Self {
        Self::with_defaults(tree, ConfigDefaults::default())
    }

    pub fn with_defaults(tree: &'a ConfigTree, defaults: ConfigDefaults) -> Self {
        Self { tree, defaults }
    }

    fn resolve<T>(
        &self,
        lookup: Lookup<'_>,
        default: T,
        convert: impl FnOnce(&Value) -> Option<T>,
    ) -> Resolved<T> {
        let location = path_to_string(lookup.path);

        let Some(value) = get_value(self.tree, lookup.path) else {
            lookup.missing.emit(&with_fallback(
                format!("{} is not found.", location),
                lookup.fallback,
            ));
            return Resolved {
                value: default,
                resolution: Resolution::Missing,
            };
        };

        match convert(value) {
            Some(converted) => Resolved::found(converted),
            None => {
                let err = ConfigError::UnexpectedShape {
                    path: location,
                    found: describe_value(value),
                    expected: lookup.expected,
                };
                error!("{}", with_fallback(format!("{}.", err), lookup.fallback));
                Resolved {
                    value: default,
                    resolution: Resolution::Invalid,
                }
            }
        }
    }

    fn resolve_flag(&self, path: &[&str], missing: Severity, fallback: &str) -> Resolved<bool> {
        let lookup = Lookup {
            path,
            expected: "a boolean",
            missing,
            fallback,
        };
        self.resolve(lookup, false, |value| match value {
            Value::Bool(flag) => Some(*flag),
            Value::Null => Some(false),
            _ => None,
        })
    }

    fn resolve_text(&self, path: &[&str], missing: Severity) -> Resolved<Option<String>> {
        let lookup = Lookup {
            path,
            expected: "a string",
            missing,
            fallback: "",
        };
        self.resolve(lookup, None, |value| match value {
            Value::Null => Some(None),
            other => scalar_to_string(other).map(Some),
        })
    }

    /// Apple ID used to sign in. `None` when missing or blank.
    pub fn username(&self) -> Option<String> {
        self.resolve_username().value
    }

    fn resolve_username(&self) -> Resolved<Option<String>> {
        let lookup = Lookup {
            path: USERNAME_PATH,
            expected: "a string",
            missing: Severity::Error,
            fallback: "Please set the username.",
        };
        let resolved = self.resolve(lookup, None, |value| match value {
            Value::Null => Some(Some(String::new())),
            Value::String(name) => Some(Some(name.trim().to_string())),
            _ => None,
        });

        match resolved.value {
            Some(name) if name.is_empty() => {
                error!(
                    "{}",
                    ConfigError::EmptyValue {
                        path: path_to_string(USERNAME_PATH),
                    }
                );
                Resolved {
                    value: None,
                    resolution: Resolution::Invalid,
                }
            }
            _ => resolved,
        }
    }

    pub fn verbose(&self) -> bool {
        let resolved = self.resolve_flag(
            VERBOSE_PATH,
            Severity::Warning,
            "Disabling verbose mode.",
        );
        if !resolved.is_defaulted() {
            info!(
                "{} verbose ...",
                if resolved.value { "Enabled" } else { "Disabled" }
            );
        }
        resolved.value
    }

    /// Seconds between two sync runs.
    pub fn sync_interval(&self) -> u64 {
        let default = self.defaults.sync_interval_secs;
        let fallback = format!("Using default sync_interval: {} seconds ...", default);
        let lookup = Lookup {
            path: SYNC_INTERVAL_PATH,
            expected: "a non-negative number of seconds",
            missing: Severity::Warning,
            fallback: &fallback,
        };
        let resolved = self.resolve(lookup, default, to_seconds);
        if !resolved.is_defaulted() {
            info!("Syncing every {} seconds.", resolved.value);
        }
        resolved.value
    }

    /// Absolute root directory for all downloads, created if missing.
    pub fn root_destination(&self) -> Result<PathBuf, ConfigError> {
        info!("Checking root destination ...");
        let default = self.defaults.root_destination.clone();
        let fallback = format!("Using default root destination: {}.", default.display());
        let lookup = Lookup {
            path: ROOT_PATH,
            expected: "a path",
            missing: Severity::Warning,
            fallback: &fallback,
        };
        let root = self.resolve(lookup, default, to_path).value;
        prepare_directory(&root)
    }

    /// Resolve a destination relative to the root destination and create it.
    fn nested_destination(
        &self,
        path: &[&str],
        default: PathBuf,
        label: &str,
    ) -> Result<PathBuf, ConfigError> {
        info!("Checking {} destination ...", label);
        let fallback = format!("Using default {} destination: {}.", label, default.display());
        let lookup = Lookup {
            path,
            expected: "a path",
            missing: Severity::Warning,
            fallback: &fallback,
        };
        let relative = self.resolve(lookup, default, to_path).value;
        let root = self.root_destination()?;
        prepare_directory(&root.join(relative))
    }

    pub fn smtp_email(&self) -> Option<String> {
        self.resolve_text(SMTP_EMAIL_PATH, Severity::Silent).value
    }

    pub fn smtp_password(&self) -> Option<String> {
        self.resolve_text(SMTP_PASSWORD_PATH, Severity::Warning).value
    }

    pub fn smtp_host(&self) -> Option<String> {
        self.resolve_text(SMTP_HOST_PATH, Severity::Warning).value
    }

    pub fn smtp_port(&self) -> Option<u16> {
        let lookup = Lookup {
            path: SMTP_PORT_PATH,
            expected: "a port number between 0 and 65535",
            missing: Severity::Warning,
            fallback: "",
        };
        self.resolve(lookup, None, |value| match value {
            Value::Null => Some(None),
            Value::Number(n) => n.as_u64().and_then(|port| u16::try_from(port).ok()).map(Some),
            Value::String(s) => s.trim().parse::<u16>().ok().map(Some),
            _ => None,
        })
        .value
    }

    pub fn smtp_no_tls(&self) -> bool {
        self.resolve_flag(SMTP_NO_TLS_PATH, Severity::Warning, "").value
    }

    /// All mail notification settings at once.
    pub fn smtp(&self) -> SmtpSettings {
        SmtpSettings {
            email: self.smtp_email(),
            password: self.smtp_password(),
            host: self.smtp_host(),
            port: self.smtp_port(),
            no_tls: self.smtp_no_tls(),
        }
    }

    pub fn drive_destination(&self) -> Result<PathBuf, ConfigError> {
        self.nested_destination(
            DRIVE_DESTINATION_PATH,
            self.defaults.drive_destination.clone(),
            "drive",
        )
    }

    pub fn drive_remove_obsolete(&self) -> bool {
        let resolved = self.resolve_flag(
            DRIVE_REMOVE_OBSOLETE_PATH,
            Severity::Warning,
            "Not removing the obsolete files and folders.",
        );
        if !resolved.is_defaulted() {
            info!(
                "{} obsolete files and folders ...",
                if resolved.value { "Removing" } else { "Not removing" }
            );
        }
        resolved.value
    }

    pub fn photos_destination(&self) -> Result<PathBuf, ConfigError> {
        self.nested_destination(
            PHOTOS_DESTINATION_PATH,
            self.defaults.photos_destination.clone(),
            "photos",
        )
    }

    pub fn photos_remove_obsolete(&self) -> bool {
        let resolved = self.resolve_flag(
            PHOTOS_REMOVE_OBSOLETE_PATH,
            Severity::Warning,
            "Not removing the obsolete photos.",
        );
        if !resolved.is_defaulted() {
            info!(
                "{} obsolete photos ...",
                if resolved.value { "Removing" } else { "Not removing" }
            );
        }
        resolved.value
    }

    /// Albums and renditions to download.
    pub fn photos_filters(&self) -> PhotosFilter {
        if !path_exists(Some(self.tree), PHOTOS_FILTERS_PATH) {
            info!(
                "{} not found. Downloading all albums with original size ...",
                path_to_string(PHOTOS_FILTERS_PATH)
            );
            return PhotosFilter::default();
        }

        PhotosFilter {
            albums: self.photo_albums(),
            file_sizes: self.photo_file_sizes(),
        }
    }

    fn photo_albums(&self) -> Option<Vec<String>> {
        let location = path_to_string(PHOTOS_ALBUMS_PATH);
        let lookup = Lookup {
            path: PHOTOS_ALBUMS_PATH,
            expected: "a sequence of album names",
            missing: Severity::Info,
            fallback: "Downloading all albums ...",
        };
        let resolved = self.resolve(lookup, None, |value| match value {
            Value::Null | Value::Bool(false) => Some(None),
            Value::String(s) if s.is_empty() => Some(None),
            Value::Sequence(entries) => Some(Some(album_names(entries, &location))),
            _ => None,
        });

        let albums = resolved.value.filter(|names| !names.is_empty());
        if albums.is_none() && resolved.resolution == Resolution::Found {
            info!("{} is empty. Downloading all albums ...", location);
        }
        albums
    }

    fn photo_file_sizes(&self) -> Vec<FileSize> {
        let location = path_to_string(PHOTOS_FILE_SIZES_PATH);
        let lookup = Lookup {
            path: PHOTOS_FILE_SIZES_PATH,
            expected: "a sequence of file sizes",
            missing: Severity::Info,
            fallback: "Downloading original size photos ...",
        };
        self.resolve(lookup, vec![FileSize::Original], |value| match value {
            Value::Null => Some(vec![FileSize::Original]),
            Value::Sequence(entries) => Some(filter_file_sizes(entries, &location)),
            _ => None,
        })
        .value
    }

    /// Resolve every setting, creating destination directories on the way.
    pub fn resolve_all(&self) -> Result<ResolvedSettings, ConfigError> {
        Ok(ResolvedSettings {
            username: self.username(),
            verbose: self.verbose(),
            sync_interval: self.sync_interval(),
            root_destination: self.root_destination()?,
            smtp: self.smtp(),
            drive: DriveSettings {
                destination: self.drive_destination()?,
                remove_obsolete: self.drive_remove_obsolete(),
            },
            photos: PhotosSettings {
                destination: self.photos_destination()?,
                remove_obsolete: self.photos_remove_obsolete(),
                filters: self.photos_filters(),
            },
        })
    }
}

/// Append the fallback sentence when there is one.
fn with_fallback(message: String, fallback: &str) -> String {
    if fallback.is_empty() {
        message
    } else {
        format!("{} {}", message, fallback)
    }
}

fn to_path(value: &Value) -> Option<PathBuf> {
    value.as_str().filter(|s| !s.is_empty()).map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::validation;
    use std::path::Path;

    fn tree(yaml: &str) -> ConfigTree {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn defaults_under(dir: &Path) -> ConfigDefaults {
        ConfigDefaults {
            root_destination: dir.join("icloud"),
            ..ConfigDefaults::default()
        }
    }

    #[test]
    fn test_empty_document_yields_defaults() {
        let t = tree("{}");
        let settings = Settings::new(&t);

        assert_eq!(settings.username(), None);
        assert!(!settings.verbose());
        assert_eq!(settings.sync_interval(), 1800);
        assert_eq!(settings.smtp(), SmtpSettings::default());
        assert!(!settings.drive_remove_obsolete());
        assert!(!settings.photos_remove_obsolete());
        assert_eq!(settings.photos_filters(), PhotosFilter::default());
    }

    #[test]
    fn test_null_document_yields_defaults() {
        let t = Value::Null;
        let settings = Settings::new(&t);

        assert_eq!(settings.username(), None);
        assert_eq!(settings.sync_interval(), 1800);
        assert_eq!(settings.photos_filters(), PhotosFilter::default());
    }

    #[test]
    fn test_username_trimmed() {
        let t = tree("app:\n  credentials:\n    username: '  bob  '\n");
        assert_eq!(Settings::new(&t).username(), Some("bob".to_string()));
    }

    #[test]
    fn test_blank_username_is_absent() {
        let t = tree("app:\n  credentials:\n    username: '   '\n");
        let resolved = Settings::new(&t).resolve_username();
        assert_eq!(resolved.value, None);
        assert_eq!(resolved.resolution, Resolution::Invalid);

        let t = tree("app:\n  credentials:\n    username: ''\n");
        assert_eq!(Settings::new(&t).username(), None);
    }

    #[test]
    fn test_missing_username_is_reported_missing() {
        let t = tree("app:\n  credentials: {}\n");
        let resolved = Settings::new(&t).resolve_username();
        assert_eq!(resolved.value, None);
        assert_eq!(resolved.resolution, Resolution::Missing);
    }

    #[test]
    fn test_scalar_settings_are_read() {
        let t = tree(
            "app:\n  verbose: true\n  sync_interval: 600\n  smtp:\n    email: me@example.com\n    password: secret\n    host: smtp.example.com\n    port: 587\n    no_tls: true\ndrive:\n  remove_obsolete: true\nphotos:\n  remove_obsolete: true\n",
        );
        let settings = Settings::new(&t);

        assert!(settings.verbose());
        assert_eq!(settings.sync_interval(), 600);
        assert_eq!(settings.smtp_email().as_deref(), Some("me@example.com"));
        assert_eq!(settings.smtp_password().as_deref(), Some("secret"));
        assert_eq!(settings.smtp_host().as_deref(), Some("smtp.example.com"));
        assert_eq!(settings.smtp_port(), Some(587));
        assert!(settings.smtp_no_tls());
        assert!(settings.smtp().is_configured());
        assert!(settings.drive_remove_obsolete());
        assert!(settings.photos_remove_obsolete());
    }

    #[test]
    fn test_wrong_shapes_fall_back_to_defaults() {
        let t = tree(
            "app:\n  verbose: maybe\n  sync_interval: -5\n  smtp:\n    port: 70000\n    no_tls: [x]\n",
        );
        let settings = Settings::new(&t);

        assert!(!settings.verbose());
        assert_eq!(settings.sync_interval(), 1800);
        assert_eq!(settings.smtp_port(), None);
        assert!(!settings.smtp_no_tls());
    }

    #[test]
    fn test_invalid_value_is_tagged_invalid() {
        let t = tree("app:\n  sync_interval: soon\n");
        let settings = Settings::new(&t);
        let lookup = Lookup {
            path: SYNC_INTERVAL_PATH,
            expected: "a number",
            missing: Severity::Warning,
            fallback: "",
        };
        let resolved = settings.resolve(lookup, 5, Value::as_u64);
        assert_eq!(resolved.value, 5);
        assert_eq!(resolved.resolution, Resolution::Invalid);
    }

    #[test]
    fn test_fractional_sync_interval_is_accepted() {
        let t = tree("app:\n  sync_interval: 60.0\n");
        assert_eq!(Settings::new(&t).sync_interval(), 60);

        let t = tree("app:\n  sync_interval: 89.6\n");
        assert_eq!(Settings::new(&t).sync_interval(), 90);

        let t = tree("app:\n  sync_interval: -1.5\n");
        assert_eq!(Settings::new(&t).sync_interval(), 1800);

        let t = tree("app:\n  sync_interval: .nan\n");
        assert_eq!(Settings::new(&t).sync_interval(), 1800);
    }

    #[test]
    fn test_fallback_sentence_is_optional() {
        assert_eq!(
            with_fallback("app > smtp > host is not found.".to_string(), ""),
            "app > smtp > host is not found."
        );
        assert_eq!(
            with_fallback("app > verbose is not found.".to_string(), "Disabling verbose mode."),
            "app > verbose is not found. Disabling verbose mode."
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_drive_directory_stays_under_root() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("root");
        let elsewhere = temp.path().join("elsewhere");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::create_dir_all(&elsewhere).unwrap();
        std::os::unix::fs::symlink(&elsewhere, root.join("drive")).unwrap();
        let t = tree(&format!("app:\n  root: {}\n", root.display()));
        let settings = Settings::new(&t);

        let drive = settings.drive_destination().unwrap();

        assert_eq!(drive, settings.root_destination().unwrap().join("drive"));
        assert_eq!(drive, root.join("drive"));
        assert!(drive.is_dir());
    }

    #[test]
    fn test_smtp_port_accepts_quoted_number() {
        let t = tree("app:\n  smtp:\n    port: '465'\n");
        assert_eq!(Settings::new(&t).smtp_port(), Some(465));
    }

    #[test]
    fn test_custom_defaults_are_used() {
        let t = tree("{}");
        let defaults = ConfigDefaults {
            sync_interval_secs: 42,
            ..ConfigDefaults::default()
        };
        assert_eq!(Settings::with_defaults(&t, defaults).sync_interval(), 42);
    }

    #[test]
    fn test_root_destination_default_is_created() {
        let temp = tempfile::tempdir().unwrap();
        let t = tree("{}");
        let settings = Settings::with_defaults(&t, defaults_under(temp.path()));

        let root = settings.root_destination().unwrap();

        assert!(root.is_absolute());
        assert!(root.is_dir());
        assert!(root.ends_with("icloud"));
    }

    #[test]
    fn test_destinations_nest_under_root() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("backup");
        let t = tree(&format!(
            "app:\n  root: {}\ndrive:\n  destination: my-drive\n",
            root.display()
        ));
        let settings = Settings::new(&t);

        let resolved_root = settings.root_destination().unwrap();
        let drive = settings.drive_destination().unwrap();
        let photos = settings.photos_destination().unwrap();

        assert_eq!(drive, resolved_root.join("my-drive"));
        assert_eq!(photos, resolved_root.join("photos"));
        assert!(drive.is_dir());
        assert!(photos.is_dir());
    }

    #[test]
    fn test_destination_accessors_are_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let t = tree("{}");
        let settings = Settings::with_defaults(&t, defaults_under(temp.path()));

        let first = settings.drive_destination().unwrap();
        let second = settings.drive_destination().unwrap();

        assert_eq!(first, second);
        assert!(second.is_dir());
    }

    #[test]
    fn test_photos_filters_file_sizes() {
        let t = tree("photos:\n  filters:\n    file_sizes: [original, bogus, medium]\n");
        let filter = Settings::new(&t).photos_filters();
        assert_eq!(filter.albums, None);
        assert_eq!(filter.file_sizes, vec![FileSize::Original, FileSize::Medium]);

        let t = tree("photos:\n  filters:\n    file_sizes: [bogus]\n");
        assert_eq!(
            Settings::new(&t).photos_filters().file_sizes,
            vec![FileSize::Original]
        );
    }

    #[test]
    fn test_photos_filters_albums() {
        let t = tree("photos:\n  filters:\n    albums: []\n");
        assert_eq!(Settings::new(&t).photos_filters().albums, None);

        let t = tree("photos:\n  filters:\n    albums:\n");
        assert_eq!(Settings::new(&t).photos_filters().albums, None);

        let t = tree("photos:\n  filters:\n    albums: [Favorites, Trips]\n    file_sizes: [thumb]\n");
        let filter = Settings::new(&t).photos_filters();
        assert_eq!(
            filter.albums,
            Some(vec!["Favorites".to_string(), "Trips".to_string()])
        );
        assert_eq!(filter.file_sizes, vec![FileSize::Thumb]);
    }

    #[test]
    fn test_photos_filters_wrong_shapes() {
        let t = tree("photos:\n  filters:\n    albums: {name: x}\n    file_sizes: medium\n");
        assert_eq!(Settings::new(&t).photos_filters(), PhotosFilter::default());

        let t = tree("photos:\n  filters: everything\n");
        assert_eq!(Settings::new(&t).photos_filters(), PhotosFilter::default());
    }

    #[test]
    fn test_resolve_all_and_validate() {
        let temp = tempfile::tempdir().unwrap();
        let t = tree(&format!(
            "app:\n  root: {}\n  credentials:\n    username: alice@example.com\n",
            temp.path().join("root").display()
        ));

        let resolved = Settings::new(&t).resolve_all().unwrap();

        assert_eq!(resolved.username.as_deref(), Some("alice@example.com"));
        assert_eq!(resolved.drive.destination, resolved.root_destination.join("drive"));
        assert_eq!(resolved.photos.destination, resolved.root_destination.join("photos"));
        assert!(validation::validate(&resolved).is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_username_and_partial_smtp() {
        let temp = tempfile::tempdir().unwrap();
        let t = tree("{}");
        let settings = Settings::with_defaults(&t, defaults_under(temp.path()));
        let mut resolved = settings.resolve_all().unwrap();

        assert!(validation::validate(&resolved).is_err());

        resolved.username = Some("alice".to_string());
        resolved.smtp.email = Some("alice@example.com".to_string());
        let err = validation::validate(&resolved).unwrap_err();
        assert!(err.to_string().contains("host"));
    }
}
