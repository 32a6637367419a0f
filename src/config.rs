//! Configuration loading and management
//!
//! Handles parsing of `.taskdeck.toml` from the working directory. Every
//! field has a default, so a missing file is a valid configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::task::{SortKey, SortOrder};

/// Config file name looked up in the working directory
pub const CONFIG_FILE: &str = ".taskdeck.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data directory override (flag/env take precedence)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Listing defaults
    #[serde(default)]
    pub list: ListConfig,
}

/// Default sort for `task list` when the caller does not specify one
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListConfig {
    #[serde(default)]
    pub sort_by: SortKey,

    #[serde(default)]
    pub order: SortOrder,
}

impl Config {
    /// Load configuration from `dir/.taskdeck.toml`, defaulting when absent.
    pub fn load(dir: &Path) -> Result<Config> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Config::default());
        }
        let contents = fs::read_to_string(&path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Resolve the data directory.
    ///
    /// Precedence: explicit override (`--data-dir` / `TASKDECK_DATA_DIR`) >
    /// config `data_dir` > platform data directory.
    pub fn resolve_data_dir(&self, override_dir: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = override_dir {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = self.data_dir.as_ref() {
            return Ok(dir.clone());
        }
        let dirs = directories::ProjectDirs::from("", "", "taskdeck").ok_or_else(|| {
            Error::InvalidConfig(
                "cannot determine a platform data directory; set data_dir or --data-dir"
                    .to_string(),
            )
        })?;
        Ok(dirs.data_dir().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(temp.path()).unwrap();
        assert!(config.data_dir.is_none());
        assert_eq!(config.list.sort_by, SortKey::CreatedAt);
        assert_eq!(config.list.order, SortOrder::Asc);
    }

    #[test]
    fn file_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE),
            "data_dir = \"/srv/taskdeck\"\n\n[list]\nsort_by = \"priority\"\norder = \"desc\"\n",
        )
        .unwrap();

        let config = Config::load(temp.path()).unwrap();
        assert_eq!(config.data_dir.as_deref(), Some(Path::new("/srv/taskdeck")));
        assert_eq!(config.list.sort_by, SortKey::Priority);
        assert_eq!(config.list.order, SortOrder::Desc);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "list = \"nope").unwrap();
        assert!(Config::load(temp.path()).is_err());
    }

    #[test]
    fn data_dir_precedence() {
        let config = Config {
            data_dir: Some(PathBuf::from("/from/config")),
            ..Config::default()
        };

        let resolved = config
            .resolve_data_dir(Some(Path::new("/from/flag")))
            .unwrap();
        assert_eq!(resolved, PathBuf::from("/from/flag"));

        let resolved = config.resolve_data_dir(None).unwrap();
        assert_eq!(resolved, PathBuf::from("/from/config"));
    }
}
