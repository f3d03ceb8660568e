//! Configuration data types.

use serde::{Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::ConfigError;

/// Default sync interval in seconds.
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 1800;

/// Default root destination, relative to the working directory.
pub const DEFAULT_ROOT_DESTINATION: &str = "./icloud";

/// Default drive destination, relative to the root destination.
pub const DEFAULT_DRIVE_DESTINATION: &str = "drive";

/// Default photos destination, relative to the root destination.
pub const DEFAULT_PHOTOS_DESTINATION: &str = "photos";

/// Values used when a setting is absent or invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDefaults {
    pub sync_interval_secs: u64,
    pub root_destination: PathBuf,
    pub drive_destination: PathBuf,
    pub photos_destination: PathBuf,
}

impl Default for ConfigDefaults {
    fn default() -> Self {
        Self {
            sync_interval_secs: DEFAULT_SYNC_INTERVAL_SECS,
            root_destination: PathBuf::from(DEFAULT_ROOT_DESTINATION),
            drive_destination: PathBuf::from(DEFAULT_DRIVE_DESTINATION),
            photos_destination: PathBuf::from(DEFAULT_PHOTOS_DESTINATION),
        }
    }
}

/// Photo rendition to download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileSize {
    Original,
    Medium,
    Thumb,
}

impl FileSize {
    pub const ALL: [FileSize; 3] = [FileSize::Original, FileSize::Medium, FileSize::Thumb];

    pub fn as_str(self) -> &'static str {
        match self {
            FileSize::Original => "original",
            FileSize::Medium => "medium",
            FileSize::Thumb => "thumb",
        }
    }

    /// Comma-separated list of accepted tags.
    pub fn valid_list() -> String {
        Self::ALL
            .iter()
            .map(|size| size.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileSize {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|size| size.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidFileSize {
                value: s.to_string(),
                valid: Self::valid_list(),
            })
    }
}

/// Album and file size selection for photo downloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotosFilter {
    /// Albums to download; `None` means every album
    pub albums: Option<Vec<String>>,

    /// Renditions to download; never empty
    pub file_sizes: Vec<FileSize>,
}

impl Default for PhotosFilter {
    fn default() -> Self {
        Self {
            albums: None,
            file_sizes: vec![FileSize::Original],
        }
    }
}

/// Mail notification settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SmtpSettings {
    pub email: Option<String>,

    #[serde(serialize_with = "mask_secret")]
    pub password: Option<String>,

    pub host: Option<String>,
    pub port: Option<u16>,
    pub no_tls: bool,
}

impl SmtpSettings {
    /// Notifications can only be sent with both a sender address and a server.
    pub fn is_configured(&self) -> bool {
        self.email.is_some() && self.host.is_some()
    }
}

/// Snapshot of every resolved setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSettings {
    pub username: Option<String>,
    pub verbose: bool,
    pub sync_interval: u64,
    pub root_destination: PathBuf,
    pub smtp: SmtpSettings,
    pub drive: DriveSettings,
    pub photos: PhotosSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriveSettings {
    pub destination: PathBuf,
    pub remove_obsolete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotosSettings {
    pub destination: PathBuf,
    pub remove_obsolete: bool,
    pub filters: PhotosFilter,
}

fn mask_secret<S: Serializer>(secret: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    match secret {
        Some(_) => serializer.serialize_some("********"),
        None => serializer.serialize_none(),
    }
}
