//! Provider configuration.
//!
//! The provider block is handed over as JSON and deserialised into
//! [`ProviderConfig`]; every field has a default, so an empty block is valid.
//! Problems are reported as attribute-scoped diagnostics, all at once.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::schema::{AttributePath, Diagnostics};

/// Overrides `base_url` when set.
pub const BASE_URL_ENV: &str = "LEASEWEB_BASE_URL";

/// Default installation timeout in seconds.
pub const DEFAULT_INSTALLATION_TIMEOUT_SECONDS: i64 = 3600;

/// Default delay between installation job polls in seconds.
pub const DEFAULT_INSTALLATION_POLL_INTERVAL_SECONDS: i64 = 30;

/// Longest accepted installation timeout in seconds: one week.
pub const MAX_INSTALLATION_TIMEOUT_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Settings of the provider block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    /// API endpoint; the client's own default when unset.
    pub base_url: Option<String>,
    /// How long to wait for a dedicated server installation.
    pub installation_timeout_seconds: i64,
    /// Delay between two polls of an installation job.
    pub installation_poll_interval_seconds: i64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            installation_timeout_seconds: DEFAULT_INSTALLATION_TIMEOUT_SECONDS,
            installation_poll_interval_seconds: DEFAULT_INSTALLATION_POLL_INTERVAL_SECONDS,
        }
    }
}

impl ProviderConfig {
    /// Read the provider block. `null` stands for an empty block.
    pub fn from_value(value: serde_json::Value) -> Result<Self, Diagnostics> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value).map_err(|e| {
            let mut diagnostics = Diagnostics::new();
            diagnostics.add_error("Invalid Provider Configuration", e.to_string());
            diagnostics
        })
    }

    /// Apply the environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_base_url_override(std::env::var(BASE_URL_ENV).ok())
    }

    /// Replace `base_url` with `value` when it is a non-empty string.
    pub fn with_base_url_override(mut self, value: Option<String>) -> Self {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            self.base_url = Some(value);
        }
        self
    }

    /// Every problem with the settings.
    pub fn validate(&self) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();

        if let Some(base_url) = &self.base_url {
            if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
                diagnostics.add_attribute_error(
                    AttributePath::root("base_url"),
                    "Invalid Base URL",
                    format!("base_url must start with http:// or https://, got: {base_url:?}"),
                );
            }
        }

        let timeout = self.installation_timeout_seconds;
        if timeout <= 0 {
            diagnostics.add_attribute_error(
                AttributePath::root("installation_timeout_seconds"),
                "Invalid Installation Timeout",
                format!("installation_timeout_seconds must be greater than 0, got: {timeout}"),
            );
        } else if timeout > MAX_INSTALLATION_TIMEOUT_SECONDS {
            diagnostics.add_attribute_error(
                AttributePath::root("installation_timeout_seconds"),
                "Invalid Installation Timeout",
                format!(
                    "installation_timeout_seconds must not exceed {MAX_INSTALLATION_TIMEOUT_SECONDS}, got: {timeout}"
                ),
            );
        }

        let interval = self.installation_poll_interval_seconds;
        if interval <= 0 {
            diagnostics.add_attribute_error(
                AttributePath::root("installation_poll_interval_seconds"),
                "Invalid Installation Poll Interval",
                format!("installation_poll_interval_seconds must be greater than 0, got: {interval}"),
            );
        } else if timeout > 0 && interval > timeout {
            diagnostics.add_attribute_error(
                AttributePath::root("installation_poll_interval_seconds"),
                "Invalid Installation Poll Interval",
                format!(
                    "installation_poll_interval_seconds ({interval}) must not exceed installation_timeout_seconds ({timeout})"
                ),
            );
        }

        diagnostics
    }

    /// The installation timeout as a duration.
    pub fn installation_timeout(&self) -> Duration {
        seconds(self.installation_timeout_seconds)
    }

    /// The installation poll interval as a duration.
    pub fn installation_poll_interval(&self) -> Duration {
        seconds(self.installation_poll_interval_seconds)
    }
}

fn seconds(value: i64) -> Duration {
    Duration::from_secs(u64::try_from(value).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn test_empty_block_uses_defaults() {
        let config = ProviderConfig::from_value(serde_json::Value::Null).unwrap();
        assert_eq!(config, ProviderConfig::default());
        assert_eq!(config.installation_timeout(), Duration::from_secs(3600));
        assert_eq!(config.installation_poll_interval(), Duration::from_secs(30));
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_partial_block_keeps_other_defaults() {
        let config =
            ProviderConfig::from_value(json!({"installation_timeout_seconds": 600})).unwrap();
        assert_eq!(config.installation_timeout_seconds, 600);
        assert_eq!(config.installation_poll_interval_seconds, 30);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let diagnostics = ProviderConfig::from_value(json!({"token": "x"})).unwrap_err();
        assert!(diagnostics.has_error());
    }

    #[test_case("https://api.leaseweb.com", true)]
    #[test_case("http://localhost:8080", true)]
    #[test_case("ftp://api.leaseweb.com", false)]
    #[test_case("api.leaseweb.com", false)]
    fn test_base_url_scheme(base_url: &str, valid: bool) {
        let config = ProviderConfig {
            base_url: Some(base_url.to_string()),
            ..Default::default()
        };
        assert_eq!(config.validate().is_empty(), valid);
    }

    #[test_case(0, 30, "installation_timeout_seconds")]
    #[test_case(i64::MAX, 30, "installation_timeout_seconds")]
    #[test_case(MAX_INSTALLATION_TIMEOUT_SECONDS + 1, 30, "installation_timeout_seconds")]
    #[test_case(60, 0, "installation_poll_interval_seconds")]
    #[test_case(60, 61, "installation_poll_interval_seconds")]
    fn test_invalid_durations(timeout: i64, interval: i64, attribute: &str) {
        let config = ProviderConfig {
            installation_timeout_seconds: timeout,
            installation_poll_interval_seconds: interval,
            ..Default::default()
        };
        let diagnostics = config.validate();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics
                .first_error()
                .and_then(|d| d.attribute.as_ref())
                .map(ToString::to_string)
                .as_deref(),
            Some(attribute)
        );
    }

    #[test]
    fn test_longest_timeout_is_accepted() {
        let config = ProviderConfig {
            installation_timeout_seconds: MAX_INSTALLATION_TIMEOUT_SECONDS,
            ..Default::default()
        };
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_base_url_override() {
        let config = ProviderConfig::default()
            .with_base_url_override(Some("https://example.test".to_string()));
        assert_eq!(config.base_url.as_deref(), Some("https://example.test"));

        let config = config.with_base_url_override(Some(" ".to_string()));
        assert_eq!(config.base_url.as_deref(), Some("https://example.test"));
    }
}
