use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

use crate::validate::AmountLimits;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FeedConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            base_url: "https://interview.switcheo.com".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct IconsConfig {
    pub base_url: String,
}

impl Default for IconsConfig {
    fn default() -> Self {
        IconsConfig {
            base_url: "https://raw.githubusercontent.com/Switcheo/token-icons/main/tokens"
                .to_string(),
        }
    }
}

fn default_currencies() -> Vec<String> {
    [
        "ETH", "USDC", "ATOM", "OSMO", "USD", "LUNA", "USDT", "BTC", "BLUR", "BUSD", "GMX",
        "STEVMOS",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_input_currency() -> String {
    "USDC".to_string()
}

fn default_output_currency() -> String {
    "ETH".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub icons: IconsConfig,
    #[serde(default)]
    pub limits: AmountLimits,
    /// Currencies shown by the `rates` view.
    #[serde(default = "default_currencies")]
    pub currencies: Vec<String>,
    #[serde(default = "default_input_currency")]
    pub default_input: String,
    #[serde(default = "default_output_currency")]
    pub default_output: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            feed: FeedConfig::default(),
            icons: IconsConfig::default(),
            limits: AmountLimits::default(),
            currencies: default_currencies(),
            default_input: default_input_currency(),
            default_output: default_output_currency(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config file found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "swapdesk")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
feed:
  base_url: "http://example.com/feed"
  timeout_secs: 5
limits:
  max_amount: 500000.0
  max_decimals: 4
currencies: ["ETH", "USDC"]
default_input: "ETH"
default_output: "USDC"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.feed.base_url, "http://example.com/feed");
        assert_eq!(config.feed.timeout_secs, 5);
        assert_eq!(config.limits.max_amount, 500000.0);
        assert_eq!(config.limits.max_decimals, 4);
        assert_eq!(config.currencies, vec!["ETH", "USDC"]);
        assert_eq!(config.default_input, "ETH");
        assert_eq!(config.default_output, "USDC");
        // Icons fall back to defaults when omitted.
        assert!(config.icons.base_url.contains("token-icons"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config.feed.base_url, "https://interview.switcheo.com");
        assert_eq!(config.feed.timeout_secs, 10);
        assert_eq!(config.limits.max_amount, 1_000_000_000.0);
        assert_eq!(config.limits.max_decimals, 6);
        assert_eq!(config.default_input, "USDC");
        assert_eq!(config.default_output, "ETH");
        assert_eq!(config.currencies.len(), 12);
    }
}
