//! Configuration loading and management.

use crate::content::DEFAULT_GENERATED_ID_LENGTH;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Project-level config file, relative to the working directory.
pub const PROJECT_CONFIG_FILE: &str = ".taskdoc/config.yaml";

/// Server configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub ids: IdsConfig,
}

/// Server-specific configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from(".taskdoc/taskdoc.db")
}

/// Identifier generation for checklist items that arrive without an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdsConfig {
    /// Length of generated node ids (base-36 characters).
    #[serde(default = "default_generated_id_length")]
    pub generated_id_length: usize,
}

impl Default for IdsConfig {
    fn default() -> Self {
        Self {
            generated_id_length: default_generated_id_length(),
        }
    }
}

fn default_generated_id_length() -> usize {
    DEFAULT_GENERATED_ID_LENGTH
}

impl Config {
    /// Load configuration from file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Resolve configuration.
    ///
    /// An explicit path must load. Otherwise the project file, then the user
    /// file (`~/.taskdoc/config.yaml`), then defaults. Environment overrides
    /// apply last.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => Self::discover(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn discover() -> Self {
        let user_file = dirs::home_dir().map(|home| home.join(".taskdoc").join("config.yaml"));
        let candidates = std::iter::once(PathBuf::from(PROJECT_CONFIG_FILE)).chain(user_file);

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load(&path) {
                Ok(config) => {
                    debug!(path = %path.display(), "Loaded config");
                    return config;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable config");
                }
            }
        }

        Self::default()
    }

    /// Apply `TASKDOC_DB_PATH` and `TASKDOC_ID_LENGTH` from `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db_path) = lookup("TASKDOC_DB_PATH") {
            self.server.db_path = PathBuf::from(db_path);
        }

        if let Some(len) = lookup("TASKDOC_ID_LENGTH")
            && let Ok(len) = len.parse::<usize>()
            && len > 0
        {
            self.ids.generated_id_length = len;
        }
    }

    /// Ensure the database directory exists.
    pub fn ensure_db_dir(&self) -> Result<()> {
        if let Some(parent) = self.server.db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}
