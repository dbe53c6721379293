//! Application settings persisted as JSON in the user's home directory.

use crate::i18n::Language;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default number of versions kept per campaign.
pub const DEFAULT_RETENTION: usize = 3;

/// Errors from loading or saving the app config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// User settings: display language, last opened campaign, history depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub language: Language,
    pub last_project: Option<PathBuf>,
    pub retention: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            last_project: None,
            retention: DEFAULT_RETENTION,
        }
    }
}

impl AppConfig {
    /// `~/.campaign/config.json`, if a home directory can be determined.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".campaign").join("config.json"))
    }

    /// Load the config at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the config to `path` (temp file, then rename).
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, path)?;
        tracing::debug!(path = %path.display(), "config saved");
        Ok(())
    }

    /// The last opened campaign, only if it still has a `project.json`.
    pub fn last_project(&self) -> Option<&Path> {
        self.last_project
            .as_deref()
            .filter(|p| p.is_dir() && p.join("project.json").is_file())
    }

    pub fn set_last_project(&mut self, root: &Path) {
        let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
        self.last_project = Some(root);
    }
}
