//! Configuration service implementation.
//!
//! Loads the client configuration from `~/.config/docqa/config.toml`
//! (or an explicit path).

use crate::paths::DocqaPaths;
use docqa_core::config::ClientConfig;
use docqa_core::error::{DocqaError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Loads [`ClientConfig`] from a TOML file.
///
/// A missing file means "all defaults"; a file that exists but does not
/// parse is reported, since silently ignoring a typo in a URL is worse.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses the default config file location.
    pub fn new() -> Result<Self> {
        let path = DocqaPaths::config_file().map_err(|e| DocqaError::config(e.to_string()))?;
        Ok(Self { path })
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<ClientConfig> {
        if !self.path.exists() {
            tracing::debug!(
                "[ConfigService] No config at {}, using defaults",
                self.path.display()
            );
            return Ok(ClientConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let config = toml::from_str(&content).inspect_err(|e| {
            tracing::warn!(
                "[ConfigService] Failed to parse {}: {}",
                self.path.display(),
                e
            );
        })?;
        Ok(config)
    }
}
