//! Client configuration.
//!
//! The base URL of the UI API server is an explicit value handed to the
//! transport at construction time. There is no process-wide setting.

use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use crate::errors::{ConfigError, ConfigResult};

/// Environment variable holding the server base URL.
pub const BASE_URL_ENV: &str = "UIAPI_BASE_URL";

/// Environment variable holding the request timeout in seconds.
pub const TIMEOUT_ENV: &str = "UIAPI_TIMEOUT_SECONDS";

/// Configuration for a UI API client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the API server, without a trailing slash.
    #[serde(deserialize_with = "deserialize_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// Retries for transient transport failures (5xx, 429, timeouts).
    pub max_transport_retries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 300,
            max_transport_retries: 0,
        }
    }
}

impl ClientConfig {
    /// Default server address.
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000";

    /// Create a config pointing at the given server.
    ///
    /// Trailing slashes are stripped so endpoint paths can be appended
    /// directly.
    pub fn new(base_url: impl AsRef<str>) -> ConfigResult<Self> {
        let base_url = normalize_base_url(base_url.as_ref())?;
        Ok(Self {
            base_url,
            ..Default::default()
        })
    }

    /// Build a config from `UIAPI_BASE_URL` and `UIAPI_TIMEOUT_SECONDS`,
    /// falling back to defaults for unset variables.
    pub fn from_env() -> ConfigResult<Self> {
        let mut config = match std::env::var(BASE_URL_ENV) {
            Ok(url) => Self::new(url)?,
            Err(_) => Self::default(),
        };

        if let Ok(raw) = std::env::var(TIMEOUT_ENV) {
            config.timeout_seconds = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid_env(TIMEOUT_ENV, raw.clone()))?;
        }

        Ok(config)
    }

    /// Set the request timeout.
    #[must_use]
    pub fn timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Set the number of transport-level retries.
    #[must_use]
    pub fn max_transport_retries(mut self, retries: u32) -> Self {
        self.max_transport_retries = retries;
        self
    }

    /// Join an endpoint path onto the base URL.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

fn deserialize_base_url<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    normalize_base_url(&raw).map_err(serde::de::Error::custom)
}

fn normalize_base_url(raw: &str) -> ConfigResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|source| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout_seconds, 300);
        assert_eq!(config.max_transport_retries, 0);
    }

    #[rstest]
    #[case::trailing_slash("http://homeserver:7878/", "http://homeserver:7878")]
    #[case::many_slashes("http://homeserver:7878///", "http://homeserver:7878")]
    #[case::whitespace("  https://api.example.com  ", "https://api.example.com")]
    #[case::with_prefix("http://host/proxy/", "http://host/proxy")]
    fn test_base_url_normalized(#[case] raw: &str, #[case] expected: &str) {
        let config = ClientConfig::new(raw).unwrap();
        assert_eq!(config.base_url, expected);
        assert_eq!(
            config.endpoint_url("/uia/chat/completions"),
            format!("{expected}/uia/chat/completions")
        );
    }

    #[test]
    fn test_invalid_url_rejected() {
        assert!(matches!(
            ClientConfig::new("not a url"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_unsupported_scheme_rejected() {
        assert!(matches!(
            ClientConfig::new("ftp://example.com"),
            Err(ConfigError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_builder_methods() {
        let config = ClientConfig::default()
            .timeout_seconds(30)
            .max_transport_retries(2);
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.max_transport_retries, 2);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url": "https://api.example.com"}"#).unwrap();
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.timeout_seconds, 300);
    }

    #[test]
    fn test_deserialize_normalizes_base_url() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url": "http://homeserver:7878/"}"#).unwrap();
        assert_eq!(config.base_url, "http://homeserver:7878");
        assert_eq!(
            config.endpoint_url("/uia/chat/completions"),
            "http://homeserver:7878/uia/chat/completions"
        );
    }

    #[test]
    fn test_deserialize_rejects_bad_base_url() {
        let result = serde_json::from_str::<ClientConfig>(r#"{"base_url": "ftp://example.com"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_endpoint_url_tolerates_hand_set_slash() {
        let config = ClientConfig {
            base_url: "http://localhost:8000/".into(),
            ..Default::default()
        };
        assert_eq!(
            config.endpoint_url("/uia/images/generations"),
            "http://localhost:8000/uia/images/generations"
        );
    }
}
