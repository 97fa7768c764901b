use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use crate::api::{ApiClient, ApiClientBuilder};

pub const ENV_BASE_URL: &str = "API_BASE_URL";
pub const ENV_TIMEOUT: &str = "API_TIMEOUT_SECS";
pub const ENV_LOG: &str = "HOMESERVE_LOG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            timeout_seconds: 600, // 10 minutes, uploads included
            user_agent: format!("homeserve/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `API_BASE_URL`, `API_TIMEOUT_SECS` and `HOMESERVE_LOG` from
    /// the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = base_url.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_TIMEOUT) {
            match raw.trim().parse::<u64>() {
                Ok(seconds) if seconds > 0 => self.api.timeout_seconds = seconds,
                _ => warn!(value = %raw, "ignoring invalid {}", ENV_TIMEOUT),
            }
        }

        if let Some(level) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            self.logging.level = level.trim().to_string();
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Client builder preloaded with these settings.
    pub fn client_builder(&self) -> ApiClientBuilder {
        ApiClient::builder(self.base_url.clone())
            .timeout(self.timeout())
            .user_agent(self.user_agent.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_overrides_replace_defaults() {
        let mut config = ClientConfig::new();
        config.apply_overrides(env(&[
            (ENV_BASE_URL, "https://api.example.vn/api"),
            (ENV_TIMEOUT, "30"),
            (ENV_LOG, "debug"),
        ]));

        assert_eq!(config.api.base_url, "https://api.example.vn/api");
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_invalid_timeout_is_ignored() {
        let mut config = ClientConfig::new();
        config.apply_overrides(env(&[(ENV_TIMEOUT, "soon"), (ENV_BASE_URL, "  ")]));

        assert_eq!(config.api, ApiSettings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [logging]
            level = "warn"
            json = true
            "#,
        )
        .unwrap();

        assert_eq!(config.api, ApiSettings::default());
        assert!(config.logging.json);
    }

    #[test]
    fn test_client_builder_uses_settings() {
        let client = ApiSettings::default().client_builder().build().unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000/api");
    }
}
