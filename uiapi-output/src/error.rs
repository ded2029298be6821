//! Error types for output extraction and validation.

use thiserror::Error;

/// Feedback recorded when no JSON could be pulled out of a response.
pub const NO_JSON_FOUND: &str = "Could not extract valid JSON from response";

/// Feedback recorded when the backend returned no article at all.
pub const NO_RESPONSE: &str = "No response received";

/// Prefix marking a validation error as a defect in the schema itself.
pub const INVALID_SCHEMA_PREFIX: &str = "Invalid schema";

/// The caller-supplied schema is not a valid JSON Schema.
///
/// Retrying a request cannot fix this, so callers usually surface it as a
/// configuration error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid schema: {message}")]
pub struct SchemaError {
    /// What the schema compiler rejected.
    pub message: String,
}

impl SchemaError {
    /// Create a schema error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_prefix() {
        let err = SchemaError::new("\"blob\" is not valid under any of the given schemas");
        assert!(err.to_string().starts_with(INVALID_SCHEMA_PREFIX));
        assert!(err.to_string().contains("blob"));
    }
}
