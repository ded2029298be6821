//! Error types for the client facade.

use thiserror::Error;
use uiapi_core::ConfigError;
use uiapi_transport::TransportError;

/// Error building a [`GptClient`](crate::GptClient).
#[derive(Debug, Error)]
pub enum ClientError {
    /// Bad configuration value.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP client could not be created.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Terminal failure of a coercion call.
#[derive(Debug, Error)]
pub enum CoerceError {
    /// The exchange with the backend failed; the call is aborted.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The schema itself is malformed, so no response could ever pass.
    #[error("Invalid schema: {message}")]
    SchemaDefect {
        /// Compiler message.
        message: String,
    },

    /// Every attempt failed (strict mode only).
    #[error("Validation failed after {attempts} attempts: {}", .errors.join("; "))]
    Exhausted {
        /// Attempts made.
        attempts: u32,
        /// Errors from the last attempt.
        errors: Vec<String>,
    },

    /// The call was set up incorrectly.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The validated value did not fit the requested Rust type.
    #[error("Failed to deserialize validated value: {0}")]
    Deserialize(#[source] serde_json::Error),
}

impl CoerceError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a schema defect error.
    pub fn schema_defect(message: impl Into<String>) -> Self {
        Self::SchemaDefect {
            message: message.into(),
        }
    }

    /// Whether all attempts were used up.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }

    /// Errors from the last attempt, if this is an exhaustion.
    pub fn errors(&self) -> &[String] {
        match self {
            Self::Exhausted { errors, .. } => errors,
            _ => &[],
        }
    }

    /// Attempts made, if this is an exhaustion.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            Self::Exhausted { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }
}
