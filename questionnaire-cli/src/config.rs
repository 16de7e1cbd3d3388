use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Where and how to reach the API, after flags were applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Remote {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("questionnaire-cli");

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {config_dir:?}"))?;
            info!("Created config directory: {config_dir:?}");
        }

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Read the config at `path`, or the defaults if there is no file.
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from: {path:?}");
        if !path.exists() {
            debug!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path:?}"))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {path:?}"))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
        fs::write(path, content).with_context(|| format!("Failed to write config file: {path:?}"))?;
        info!("Config saved to {path:?}");
        Ok(())
    }

    /// Combine file values with command-line or environment overrides.
    pub fn remote(&self, api_url: Option<String>, token: Option<String>) -> Result<Remote> {
        let base_url = api_url.or_else(|| self.base_url.clone()).context(
            "No API URL configured: pass --api-url, set QUESTIONNAIRE_API_URL or add base_url to config.toml",
        )?;
        Ok(Remote {
            base_url,
            token: token.or_else(|| self.token.clone()),
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_partial_file_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "base_url = \"https://surveys.example.org/api\"\n").unwrap();

        let mut config = Config::load_from(&path).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("https://surveys.example.org/api"));
        assert_eq!(config.timeout_secs, 30);

        config.timeout_secs = 5;
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_secs = \"soon\"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let config = Config {
            base_url: Some("https://file.example.org".into()),
            token: Some("from-file".into()),
            timeout_secs: 10,
        };
        let remote = config
            .remote(Some("https://flag.example.org".into()), None)
            .unwrap();
        assert_eq!(remote.base_url, "https://flag.example.org");
        assert_eq!(remote.token.as_deref(), Some("from-file"));
        assert_eq!(remote.timeout, Duration::from_secs(10));

        assert!(Config::default().remote(None, None).is_err());
    }
}
