use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{Bang, BangTable};
use crate::error::{BangError, BangResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub bangs: Vec<Bang>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Command used to open URLs instead of the platform default
    pub browser: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Preferences file; `~` is expanded
    pub path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8008,
        }
    }
}

fn app_dir(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(|| {
        // ~ is not expanded by PathBuf, so use dirs::home_dir
        dirs::home_dir()
            .map(|h| h.join(".config"))
            .unwrap_or_else(|| PathBuf::from("/tmp"))
    })
    .join("bangs")
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> PathBuf {
        app_dir(dirs::config_dir()).join("config.toml")
    }

    /// Load config from the default path, or return defaults if not found
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`, or return defaults if missing or unreadable
    pub fn load_from(path: &Path) -> Self {
        let mut config = if path.exists() {
            match Self::read(path) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to load config {}: {}", path.display(), e);
                    Self::default()
                }
            }
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Self::default()
        };

        config.validate();
        config
    }

    fn read(path: &Path) -> BangResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Drop custom bangs that would never resolve
    fn validate(&mut self) {
        self.bangs.retain(|bang| match bang.validate() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Ignoring custom bang from config: {}", e);
                false
            }
        });

        if self.server.host.trim().is_empty() {
            self.server.host = ServerConfig::default().host;
        }
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> BangResult<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                BangError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| BangError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| BangError::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Where the preference store lives
    pub fn storage_path(&self) -> PathBuf {
        match &self.storage.path {
            Some(path) => PathBuf::from(shellexpand::tilde(path).as_ref()),
            None => app_dir(dirs::data_dir()).join("preferences.json"),
        }
    }

    /// Built-in bangs merged with the ones defined here
    pub fn bang_table(&self) -> BangTable {
        BangTable::with_custom(&self.bangs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("config.toml"));
        assert_eq!(config, Config::default());
        assert_eq!(config.server.port, 8008);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(config.bangs.is_empty());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str("[general]\nbrowser = \"firefox\"\n").unwrap();
        assert_eq!(config.general.browser.as_deref(), Some("firefox"));
        assert_eq!(config.server, ServerConfig::default());
        assert!(config.bangs.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[general]
browser = "firefox"

[server]
port = 9000

[storage]
path = "/var/lib/bangs/prefs.json"

[[bangs]]
tag = "rs"
url = "https://docs.rs/{{{s}}}"
description = "docs.rs"

[[bangs]]
tag = "bad"
url = "https://example.com/"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.general.browser.as_deref(), Some("firefox"));
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(
            config.storage_path(),
            PathBuf::from("/var/lib/bangs/prefs.json")
        );
        assert_eq!(config.bangs.len(), 1);
        assert_eq!(config.bangs[0].description.as_deref(), Some("docs.rs"));

        let table = config.bang_table();
        assert_eq!(table.resolve("!rs serde", None), "https://docs.rs/serde");
    }

    #[test]
    fn test_invalid_toml_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[server\nport = ").unwrap();

        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dir").join("config.toml");

        let mut config = Config::default();
        config.bangs.push(Bang::new("crates", "https://crates.io/search?q={{{s}}}"));
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_storage_path_expands_tilde() {
        let config = Config {
            storage: StorageConfig {
                path: Some("~/prefs.json".to_string()),
            },
            ..Config::default()
        };
        let path = config.storage_path();
        assert!(path.ends_with("prefs.json"));
        assert!(!path.to_string_lossy().starts_with('~'));
    }
}
