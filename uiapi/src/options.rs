//! Options for a coercion call.

use uiapi_core::ContinuationToken;

use crate::error::CoerceError;

/// How a coercion call behaves.
///
/// # Example
///
/// ```rust
/// use uiapi::CoerceOptions;
///
/// let options = CoerceOptions::new().max_retries(5).strict(false);
/// assert_eq!(options.max_retries, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoerceOptions {
    /// Total attempts allowed, including the first.
    pub max_retries: u32,
    /// Whether exhaustion is an error.
    pub strict: bool,
    /// Conversation to continue on the first attempt.
    pub continuation: Option<ContinuationToken>,
    /// Fail before any request when the schema does not compile.
    pub fail_on_schema_defect: bool,
}

impl Default for CoerceOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            strict: true,
            continuation: None,
            fail_on_schema_defect: true,
        }
    }
}

impl CoerceOptions {
    /// Default options: 3 attempts, strict.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attempt budget.
    #[must_use]
    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Set strict mode.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Continue an existing conversation.
    #[must_use]
    pub fn continuation(mut self, token: impl Into<ContinuationToken>) -> Self {
        self.continuation = Some(token.into());
        self
    }

    /// Whether to reject a malformed schema up front.
    ///
    /// When disabled, the compile error is fed back to the backend on every
    /// attempt like any other validation failure.
    #[must_use]
    pub fn fail_on_schema_defect(mut self, fail: bool) -> Self {
        self.fail_on_schema_defect = fail;
        self
    }

    pub(crate) fn check(&self) -> Result<(), CoerceError> {
        if self.max_retries == 0 {
            return Err(CoerceError::configuration("max_retries must be at least 1"));
        }
        Ok(())
    }
}
