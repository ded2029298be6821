//! Error types for uiapi configuration.

use thiserror::Error;

/// Errors raised while building a client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The base URL could not be parsed.
    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// The parse failure.
        #[source]
        source: url::ParseError,
    },

    /// The base URL uses a scheme other than http or https.
    #[error("Unsupported URL scheme '{0}', expected http or https")]
    UnsupportedScheme(String),

    /// An environment variable held a value of the wrong shape.
    #[error("Invalid value for {name}: {value}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
}

impl ConfigError {
    /// Create an invalid environment value error.
    pub fn invalid_env(name: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidEnv {
            name,
            value: value.into(),
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_env_display() {
        let err = ConfigError::invalid_env("UIAPI_TIMEOUT_SECONDS", "soon");
        assert!(err.to_string().contains("UIAPI_TIMEOUT_SECONDS"));
        assert!(err.to_string().contains("soon"));
    }

    #[test]
    fn test_unsupported_scheme_display() {
        let err = ConfigError::UnsupportedScheme("ftp".into());
        assert!(err.to_string().contains("ftp"));
    }
}
