//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::store::DEFAULT_STORE_FILE;

/// irt configuration, merged from defaults, the global file and the environment
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Store file to use when `--store` is not given
    pub store: Option<PathBuf>,

    /// Owner recorded by `irt add` when `--owner` is not given
    pub default_owner: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // Global user config (~/.config/irt/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // Environment
        if let Ok(owner) = std::env::var("IRT_OWNER") {
            if !owner.trim().is_empty() {
                config.default_owner = Some(owner);
            }
        }

        config
    }

    /// Parse one config file; unreadable files are skipped with a warning
    pub fn read_file(path: &Path) -> Option<Config> {
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config file");
                None
            }
        }
    }

    /// Path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "irt").map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.store.is_some() {
            self.store = other.store;
        }
        if other.default_owner.is_some() {
            self.default_owner = other.default_owner;
        }
    }

    /// Resolve the store path: explicit flag/env, then config, then the default
    pub fn store_path(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.store.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_store_path_precedence() {
        let config = Config {
            store: Some(PathBuf::from("/srv/ir/incidents.yaml")),
            default_owner: None,
        };
        assert_eq!(
            config.store_path(Some(Path::new("mine.yaml"))),
            PathBuf::from("mine.yaml")
        );
        assert_eq!(config.store_path(None), PathBuf::from("/srv/ir/incidents.yaml"));
        assert_eq!(
            Config::default().store_path(None),
            PathBuf::from(DEFAULT_STORE_FILE)
        );
    }

    #[test]
    fn test_read_file_and_merge() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "store: /tmp/ir.yaml\ndefault_owner: SOC Tier 1\n").unwrap();

        let file = Config::read_file(&path).unwrap();
        let mut config = Config {
            store: Some(PathBuf::from("old.yaml")),
            default_owner: None,
        };
        config.merge(file);

        assert_eq!(config.store, Some(PathBuf::from("/tmp/ir.yaml")));
        assert_eq!(config.default_owner.as_deref(), Some("SOC Tier 1"));
    }

    #[test]
    fn test_invalid_file_is_skipped() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "store: [unterminated\n").unwrap();
        assert!(Config::read_file(&path).is_none());
        assert!(Config::read_file(&tmp.path().join("absent.yaml")).is_none());
    }
}
