//! Destination directory preparation.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use path_clean::PathClean;
use tracing::debug;

use super::ConfigError;

/// Make `path` absolute against the working directory and normalize it
/// lexically. Symlinks are kept as written.
pub fn absolute_path(path: &Path) -> io::Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()?.join(path)
    };
    Ok(joined.clean())
}

/// Create `path` (and its parents) if missing and return it as an absolute path.
///
/// An existing directory is not an error, so repeated calls are harmless.
pub fn prepare_directory(path: &Path) -> Result<PathBuf, ConfigError> {
    let into_error = |source| ConfigError::Directory {
        path: path.to_path_buf(),
        source,
    };

    let absolute = absolute_path(path).map_err(into_error)?;
    fs::create_dir_all(&absolute).map_err(into_error)?;

    debug!("Prepared directory {}", absolute.display());
    Ok(absolute)
}
