use crate::error::ConfigError;
use crate::flowchart::{DEFAULT_LEGACY_KEYS, GridLayout};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Runtime settings, usually loaded from a YAML file. Every field has a default.
///
/// ```yaml
/// layout:
///   columns: 4
///   cell_width: 220
/// legacy_keys: [raw_content, rawContent, flow]
/// store_path: data/store.bin
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: GridLayout,
    pub legacy_keys: Vec<String>,
    pub store_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: GridLayout::default(),
            legacy_keys: DEFAULT_LEGACY_KEYS.iter().map(|k| k.to_string()).collect(),
            store_path: None,
        }
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml(&content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }
}
