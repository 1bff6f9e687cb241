//! Configuration for the Poller
//!
//! Defines the monitored URL, cadence, fetch timeout and civil timezone.

use crate::PollerError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tagwatch_domain::DedupMode;
use tagwatch_extractor::{TagExtractor, DEFAULT_TIMEZONE};

/// Configuration for the Poller service
///
/// # Examples
///
/// ```
/// use tagwatch_poller::PollerConfig;
///
/// let config = PollerConfig::default();
/// assert_eq!(config.poll_interval_seconds, 30);
/// assert_eq!(config.fetch_timeout_seconds, 10);
/// assert_eq!(config.timezone, "America/Sao_Paulo");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Page fetched every cycle
    pub monitored_url: String,

    /// Sleep between cycles (in seconds)
    /// Default: 30
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,

    /// Upper bound on one fetch (in seconds)
    /// Default: 10
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_seconds: u64,

    /// IANA zone used to stamp extracted records
    /// Default: America/Sao_Paulo
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Tag lookup used for deduplication
    /// Default: exact
    #[serde(default)]
    pub dedup_mode: DedupMode,
}

fn default_poll_interval() -> u64 {
    30
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            monitored_url: "http://192.168.18.40/".to_string(),
            poll_interval_seconds: default_poll_interval(),
            fetch_timeout_seconds: default_fetch_timeout(),
            timezone: default_timezone(),
            dedup_mode: DedupMode::default(),
        }
    }
}

impl PollerConfig {
    /// Configuration monitoring `url` with default cadence and timezone
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            monitored_url: url.into(),
            ..Default::default()
        }
    }

    /// Check the configuration before starting the Poller
    pub fn validate(&self) -> Result<(), PollerError> {
        if self.monitored_url.trim().is_empty() {
            return Err(PollerError::Config("monitored_url must not be empty".to_string()));
        }
        if self.fetch_timeout_seconds == 0 {
            return Err(PollerError::Config("fetch_timeout_seconds must be positive".to_string()));
        }
        self.extractor()?;
        Ok(())
    }

    /// Get poll interval as Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    /// Get fetch timeout as Duration
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds)
    }

    /// Build the extractor for the configured timezone
    pub fn extractor(&self) -> Result<TagExtractor, PollerError> {
        Ok(TagExtractor::from_timezone_name(&self.timezone)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PollerConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_secs(30));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
        assert_eq!(config.dedup_mode, DedupMode::Exact);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml_with_defaults() {
        let config: PollerConfig = toml::from_str(r#"monitored_url = "http://example.test/""#).unwrap();
        assert_eq!(config.monitored_url, "http://example.test/");
        assert_eq!(config.poll_interval_seconds, 30);
        assert_eq!(config.timezone, "America/Sao_Paulo");
    }

    #[test]
    fn test_parse_toml_full() {
        let toml = r#"
            monitored_url = "http://10.0.0.5/status"
            poll_interval_seconds = 5
            fetch_timeout_seconds = 2
            timezone = "Europe/Lisbon"
            dedup_mode = "substring"
        "#;
        let config: PollerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.poll_interval_seconds, 5);
        assert_eq!(config.fetch_timeout_seconds, 2);
        assert_eq!(config.dedup_mode, DedupMode::Substring);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let empty_url = PollerConfig::for_url("  ");
        assert!(matches!(empty_url.validate(), Err(PollerError::Config(_))));

        let zero_timeout = PollerConfig {
            fetch_timeout_seconds: 0,
            ..Default::default()
        };
        assert!(matches!(zero_timeout.validate(), Err(PollerError::Config(_))));

        let bad_zone = PollerConfig {
            timezone: "Nowhere/City".to_string(),
            ..Default::default()
        };
        assert!(matches!(bad_zone.validate(), Err(PollerError::Extractor(_))));
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = PollerConfig::for_url("http://example.test/");
        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: PollerConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }
}
