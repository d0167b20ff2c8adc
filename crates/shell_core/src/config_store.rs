use std::path::{Path, PathBuf};

use shared::domain::Configuration;
use thiserror::Error;
use tracing::{debug, error, warn};

pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("i/o error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed configuration in '{}': {source}", .path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode configuration: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Persists the shell [`Configuration`] as a small JSON file.
///
/// Neither `load` nor `save` reports failure to the caller: an unreadable record is
/// treated as "unconfigured" and a failed write is only logged.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(CONFIG_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Configuration {
        match self.try_load().await {
            Ok(Some(config)) => config,
            Ok(None) => {
                debug!(path = %self.path.display(), "no stored configuration");
                Configuration::default()
            }
            Err(err) => {
                warn!(%err, "failed to load configuration; treating shell as unconfigured");
                Configuration::default()
            }
        }
    }

    pub async fn save(&self, config: &Configuration) {
        match self.try_save(config).await {
            Ok(()) => debug!(path = %self.path.display(), "configuration saved"),
            Err(err) => error!(%err, "failed to save configuration"),
        }
    }

    async fn try_load(&self) -> Result<Option<Configuration>, ConfigError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| ConfigError::Malformed {
                path: self.path.clone(),
                source,
            })
    }

    async fn try_save(&self, config: &Configuration) -> Result<(), ConfigError> {
        let encoded = serde_json::to_string_pretty(config)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| ConfigError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        // Write beside the target and rename so readers never observe a partial record.
        let staging = self.staging_path();
        tokio::fs::write(&staging, encoded)
            .await
            .map_err(|source| ConfigError::Io {
                path: staging.clone(),
                source,
            })?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|source| ConfigError::Io {
                path: self.path.clone(),
                source,
            })
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| CONFIG_FILE_NAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
#[path = "tests/config_store_tests.rs"]
mod tests;
