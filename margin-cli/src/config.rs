//! User configuration stored in `~/.margin/config.json`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use margin_core::HistoryConfig;

pub const CONFIG_FILE: &str = "config.json";

/// Persisted settings. Every field falls back to its default when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub history: HistoryConfig,
    /// `EnvFilter` directive used when `RUST_LOG` is not set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Config {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid configuration")
    }

    /// Read the config file from `dir`. A missing file is not an error.
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&json)
            .with_context(|| format!("Failed to parse {}", path.display()))
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.history.capacity, margin_core::DEFAULT_CAPACITY);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(r#"{"history": {"capacity": 200}, "log_filter": "warn"}"#).unwrap();
        assert_eq!(config.history.capacity, 200);
        assert_eq!(config.log_filter.as_deref(), Some("warn"));
    }

    #[test]
    fn test_malformed_config_is_error() {
        assert!(Config::parse(r#"{"history": {"capacity": "many"}}"#).is_err());
        assert!(Config::parse("not json").is_err());
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = std::env::temp_dir().join(format!("margin-config-test-{}", std::process::id()));
        assert!(Config::load(&dir).unwrap().is_none());
    }
}
