//! Configuration management for the Omnify client.
//!
//! Loads configuration from ${OMNIFY_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable overriding the configured API base URL.
pub const API_URL_ENV: &str = "OMNIFY_API_URL";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the Omnify API, including any path prefix.
    pub base_url: String,
}

impl Config {
    const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

    /// Loads configuration from the default config path.
    ///
    /// `OMNIFY_API_URL` wins over both the file and the default.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&paths::config_path())?;

        if let Ok(env_url) = std::env::var(API_URL_ENV) {
            let trimmed = env_url.trim();
            if !trimmed.is_empty() {
                config.base_url = trimmed.trim_end_matches('/').to_string();
            }
        }

        Ok(config)
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, default_config_template())
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Saves only the base_url field to the config file.
    ///
    /// Creates the file with the default template if it doesn't exist.
    /// Preserves existing fields and comments using toml_edit.
    pub fn save_base_url(url: &str) -> Result<()> {
        Self::save_base_url_to(&paths::config_path(), url)
    }

    /// Saves only the base_url field to a specific config file path.
    pub fn save_base_url_to(path: &Path, url: &str) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        let contents = if path.exists() {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?
        } else {
            default_config_template().to_string()
        };

        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        doc["base_url"] = value(url.trim_end_matches('/'));

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, doc.to_string())
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Default config.toml contents for freshly initialized files.
fn default_config_template() -> &'static str {
    "# Omnify client configuration\n\
     \n\
     # Base URL of the Omnify API, including any path prefix.\n\
     base_url = \"http://localhost:8080/api\"\n"
}

pub mod paths {
    //! Path resolution for Omnify configuration and data directories.
    //!
    //! OMNIFY_HOME resolution order:
    //! 1. OMNIFY_HOME environment variable (if set)
    //! 2. ~/.config/omnify (default)

    use std::path::PathBuf;

    /// Returns the Omnify home directory.
    ///
    /// Checks OMNIFY_HOME env var first, falls back to ~/.config/omnify
    pub fn omnify_home() -> PathBuf {
        if let Ok(home) = std::env::var("OMNIFY_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("omnify"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        omnify_home().join("config.toml")
    }

    /// Returns the path to the persisted session file.
    pub fn session_path() -> PathBuf {
        omnify_home().join("session.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: defaults apply when the file is missing.
    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/api");
    }

    /// Test: file values are picked up.
    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "base_url = \"https://omnify.example/api\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.base_url, "https://omnify.example/api");
    }

    /// Test: save_base_url creates the file from the template and keeps
    /// comments on subsequent edits.
    #[test]
    fn test_save_base_url_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        Config::save_base_url_to(&path, "https://first.example/api/").unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("# Omnify client configuration"));
        assert!(contents.contains("https://first.example/api"));

        Config::save_base_url_to(&path, "https://second.example/api").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.base_url, "https://second.example/api");
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("# Omnify client configuration"));
    }

    /// Test: init refuses to clobber an existing file.
    #[test]
    fn test_init_refuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        Config::init(&path).unwrap();
        assert!(path.exists());
        assert!(Config::init(&path).is_err());
    }

    /// Test: a malformed config file is an error, not a silent default.
    #[test]
    fn test_load_malformed_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "base_url = [not toml").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
