//! Runtime configuration
//!
//! Loaded from a TOML file (path from `EPG_CONFIG_FILE`, defaulting to
//! `config.toml`); every field has a serde default so a missing or partial
//! file still yields a usable configuration.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub providers: ProviderSettings,
}

/// Settings applied to the shared HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Per-provider credentials and knobs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub twmod: TwmodSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TwmodSettings {
    /// Bearer credential sent with every twmod request
    #[serde(default)]
    pub token: Option<String>,
}

fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_file =
            std::env::var("EPG_CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_from_file(&config_file)
    }

    pub fn load_from_file(config_file: &str) -> Result<Self> {
        if std::path::Path::new(config_file).exists() {
            let contents = std::fs::read_to_string(config_file)?;
            Ok(toml::from_str(&contents)?)
        } else {
            info!("Config file {} not found, using defaults", config_file);
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.http.connect_timeout_secs, 30);
        assert!(config.http.user_agent.starts_with("epg-aggregator/"));
        assert_eq!(config.providers.twmod.token, None);
    }

    #[test]
    fn partial_config_overrides_only_named_fields() {
        let config: Config = toml::from_str(
            r#"
            [http]
            connect_timeout_secs = 10

            [providers.twmod]
            token = "sekrit"
            "#,
        )
        .unwrap();
        assert_eq!(config.http.connect_timeout_secs, 10);
        assert!(config.http.user_agent.starts_with("epg-aggregator/"));
        assert_eq!(config.providers.twmod.token.as_deref(), Some("sekrit"));
    }
}
