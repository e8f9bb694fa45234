use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use notifeed_core::NotifeedError;

const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_POLL_INTERVAL_MS: u64 = 30_000;

/// Configuration for one subscription client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    /// Base URL of the notification service.
    pub base_url: Url,

    /// Application whose notifications this client observes.
    pub target_app: String,

    /// Delay between polling cycles, in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            target_app: String::new(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: Url, target_app: impl Into<String>) -> Self {
        Self {
            base_url,
            target_app: target_app.into(),
            ..Self::default()
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn validate(&self) -> Result<(), NotifeedError> {
        if self.target_app.is_empty() {
            return Err(NotifeedError::InvalidConfig(
                "targetApp must not be empty".into(),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(NotifeedError::InvalidConfig(
                "pollIntervalMs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.poll_interval(), Duration::from_secs(30));
        assert!(config.target_app.is_empty());
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::new(
            Url::parse("https://notify.example.com").unwrap(),
            "dashboard",
        )
        .with_poll_interval(Duration::from_secs(5));

        assert_eq!(config.target_app, "dashboard");
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let no_app = ClientConfig::default();
        assert!(no_app.validate().is_err());

        let zero_interval = ClientConfig::new(
            Url::parse("https://notify.example.com").unwrap(),
            "dashboard",
        )
        .with_poll_interval(Duration::ZERO);
        assert!(zero_interval.validate().is_err());
    }

    #[test]
    fn test_config_deserializes_camel_case() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"baseUrl": "https://notify.example.com", "targetApp": "ops", "pollIntervalMs": 1000}"#,
        )
        .unwrap();
        assert_eq!(config.target_app, "ops");
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }
}
