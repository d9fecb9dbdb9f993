//! Engine Configuration
//!
//! Loaded from a TOML file at startup.

use std::path::{Path, PathBuf};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::quest::TargetMatch;

pub const DEFAULT_CONFIG_PATH: &str = "quest-engine.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory containing `quests/`
    pub data_dir: PathBuf,
    /// Default tracing directive, extended by `RUST_LOG`
    pub log_filter: String,
    pub target_match: TargetMatch,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            log_filter: "quest_engine=info".to_string(),
            target_match: TargetMatch::default(),
        }
    }
}

impl EngineConfig {
    /// Load from a TOML file, using defaults if the file does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            warn!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
