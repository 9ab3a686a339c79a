// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Factory configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// An error raised while loading a [`FactoryConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read configuration file '{path}'")]
    Io {
        /// The file that was read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration text is not valid TOML for this structure.
    #[error("Failed to parse factory configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Represents the structure of a factory configuration file.
///
/// ```toml
/// max_resources = 256
/// base_path = "build/default/data"
/// ```
///
/// Missing keys fall back to [`FactoryConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    /// The maximum number of resources that may be resident at once.
    pub max_resources: usize,
    /// The path every requested name is resolved against.
    pub base_path: String,
}

impl Default for FactoryConfig {
    /// A factory of 1024 resources resolving names against the current
    /// directory.
    fn default() -> Self {
        Self {
            max_resources: 1024,
            base_path: ".".to_string(),
        }
    }
}

impl FactoryConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded factory configuration from '{}'", path.display());
        Self::from_toml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = FactoryConfig::from_toml(
            r#"
            max_resources = 16
            base_path = "build/default/src/gamesys/test/"
            "#,
        )
        .unwrap();
        assert_eq!(config.max_resources, 16);
        assert_eq!(config.base_path, "build/default/src/gamesys/test/");
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config = FactoryConfig::from_toml("max_resources = 8").unwrap();
        assert_eq!(config.max_resources, 8);
        assert_eq!(config.base_path, FactoryConfig::default().base_path);
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let result = FactoryConfig::from_toml("max_resources = \"many\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Kiln.toml");
        std::fs::write(&path, "base_path = \"assets\"").unwrap();

        let config = FactoryConfig::from_file(&path).unwrap();
        assert_eq!(config.base_path, "assets");
        assert_eq!(config.max_resources, 1024);

        let missing = FactoryConfig::from_file(dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
