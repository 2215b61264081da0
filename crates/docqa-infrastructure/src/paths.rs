//! Unified path management for docqa files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/docqa/             # Config directory
//! └── config.toml              # Client configuration
//!
//! ~/.local/share/docqa/        # Data directory
//! ├── store.json               # Key-value store (registry mirror)
//! └── logs/                    # Client logs
//!     └── docqa.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "docqa";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Platform-appropriate locations (XDG on Linux) for docqa files.
pub struct DocqaPaths;

impl DocqaPaths {
    /// Returns the docqa configuration directory (e.g. `~/.config/docqa/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the docqa data directory (e.g. `~/.local/share/docqa/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path of the key-value store holding the registry mirror.
    pub fn store_file() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("store.json"))
    }

    pub fn log_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("logs"))
    }
}
