//! The self-correcting coercion loop.
//!
//! Each attempt augments the caller's prompt with the schema (and, on
//! retries, the errors of the attempt just made), sends it through the
//! transport, then extracts and validates JSON from the reply. Attempts run
//! strictly in sequence and stay in one backend conversation by threading
//! the continuation token forward.

use serde_json::Value as JsonValue;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uiapi_core::{ContinuationToken, PromptRequest, CHAT_COMPLETIONS_PATH};
use uiapi_output::{
    augment_prompt, extract_json, SchemaError, SchemaValidator, ValidationOutcome, NO_JSON_FOUND,
    NO_RESPONSE,
};
use uiapi_transport::{send_prompts, Transport};

use crate::error::CoerceError;
use crate::options::CoerceOptions;

/// What happened during one attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercionAttempt {
    /// Zero-based attempt index.
    pub index: u32,
    /// Prompt text sent.
    pub prompt: String,
    /// Text of the first article, if the backend sent any.
    pub response_text: Option<String>,
    /// JSON found in the response.
    pub value: Option<JsonValue>,
    /// Validation of `value`; `None` when nothing was extracted.
    pub validation: Option<ValidationOutcome>,
    /// Conversation the request was sent in.
    pub continuation: Option<ContinuationToken>,
}

impl CoercionAttempt {
    /// Whether the extracted value may be returned to the caller.
    pub fn is_accepted(&self) -> bool {
        self.validation
            .as_ref()
            .is_some_and(ValidationOutcome::is_valid)
    }

    /// Feedback for the next prompt.
    pub fn errors(&self) -> Vec<String> {
        match (&self.response_text, &self.validation) {
            (None, _) => vec![NO_RESPONSE.to_string()],
            (Some(_), None) => vec![NO_JSON_FOUND.to_string()],
            (Some(_), Some(outcome)) => outcome.errors(),
        }
    }

    fn into_accepted(self) -> Option<(JsonValue, Option<String>)> {
        match (self.value, self.validation) {
            (Some(value), Some(outcome)) if outcome.is_valid() => {
                let advisory = outcome.advisory().map(str::to_string);
                Some((value, advisory))
            }
            _ => None,
        }
    }
}

/// Result of a coercion call that did not fail outright.
#[derive(Debug, Clone, PartialEq)]
pub enum CoercionOutcome {
    /// A value passed validation.
    Succeeded {
        /// The validated value.
        value: JsonValue,
        /// Attempts made, including the successful one.
        attempts: u32,
        /// Set when validation was skipped rather than passed.
        advisory: Option<String>,
        /// Conversation to continue with.
        continuation: Option<ContinuationToken>,
        /// Time from the first prompt to the result.
        elapsed: Duration,
    },
    /// Every attempt failed and strict mode was off.
    Exhausted {
        /// Attempts made.
        attempts: u32,
        /// Errors from the last attempt.
        errors: Vec<String>,
        /// Conversation to continue with.
        continuation: Option<ContinuationToken>,
        /// Time from the first prompt to giving up.
        elapsed: Duration,
    },
}

impl CoercionOutcome {
    /// Whether a value was obtained.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// The validated value.
    pub fn value(&self) -> Option<&JsonValue> {
        match self {
            Self::Succeeded { value, .. } => Some(value),
            Self::Exhausted { .. } => None,
        }
    }

    /// Consume and return the validated value.
    pub fn into_value(self) -> Option<JsonValue> {
        match self {
            Self::Succeeded { value, .. } => Some(value),
            Self::Exhausted { .. } => None,
        }
    }

    /// Attempts made.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Succeeded { attempts, .. } | Self::Exhausted { attempts, .. } => *attempts,
        }
    }

    /// Total elapsed time.
    pub fn elapsed(&self) -> Duration {
        match self {
            Self::Succeeded { elapsed, .. } | Self::Exhausted { elapsed, .. } => *elapsed,
        }
    }

    /// The latest continuation token.
    pub fn continuation(&self) -> Option<&ContinuationToken> {
        match self {
            Self::Succeeded { continuation, .. } | Self::Exhausted { continuation, .. } => {
                continuation.as_ref()
            }
        }
    }

    /// Advisory for a value that was never actually validated.
    pub fn advisory(&self) -> Option<&str> {
        match self {
            Self::Succeeded { advisory, .. } => advisory.as_deref(),
            Self::Exhausted { .. } => None,
        }
    }

    /// Errors from the last attempt of an exhausted call.
    pub fn errors(&self) -> &[String] {
        match self {
            Self::Succeeded { .. } => &[],
            Self::Exhausted { errors, .. } => errors,
        }
    }
}

/// Obtain a value conforming to `schema` from the chat endpoint.
///
/// Only the first prompt is used. Extraction misses and validation
/// failures are fed back into the next attempt; a transport failure ends
/// the call immediately. After `max_retries` failed attempts, strict mode
/// returns [`CoerceError::Exhausted`] and non-strict mode returns
/// [`CoercionOutcome::Exhausted`].
///
/// # Example
///
/// ```rust,ignore
/// use serde_json::json;
/// use uiapi::{coerce, CoerceOptions};
///
/// let schema = json!({"type": "object", "required": ["name"]});
/// let prompts = vec!["Give me a person".to_string()];
/// let outcome = coerce(&transport, &prompts, &schema, &CoerceOptions::new()).await?;
/// println!("{}", outcome.value().unwrap());
/// ```
pub async fn coerce<T>(
    transport: &T,
    prompts: &[String],
    schema: &JsonValue,
    options: &CoerceOptions,
) -> Result<CoercionOutcome, CoerceError>
where
    T: Transport + ?Sized,
{
    options.check()?;
    let prompt = prompts
        .first()
        .ok_or_else(|| CoerceError::configuration("at least one prompt is required"))?;
    if prompts.len() > 1 {
        debug!(
            ignored = prompts.len() - 1,
            "Only the first prompt is used for JSON coercion"
        );
    }

    let validator = match SchemaValidator::compile(schema) {
        Ok(validator) => Ok(validator),
        Err(err) if options.fail_on_schema_defect => {
            return Err(CoerceError::schema_defect(err.message));
        }
        Err(err) => {
            warn!(error = %err, "Schema does not compile, every attempt will fail validation");
            Err(err)
        }
    };

    let start = Instant::now();
    let mut continuation = options.continuation.clone();
    let mut errors: Vec<String> = Vec::new();

    for index in 0..options.max_retries {
        debug!(
            attempt = index + 1,
            max_attempts = options.max_retries,
            continuing = continuation.is_some(),
            "Starting coercion attempt"
        );

        let prior = (index > 0).then_some(errors.as_slice());
        let text = augment_prompt(prompt, schema, prior);
        let (attempt, returned) =
            run_attempt(transport, index, text, continuation.clone(), &validator).await?;

        if returned.is_some() {
            continuation = returned;
        }

        let feedback = attempt.errors();
        if let Some((value, advisory)) = attempt.into_accepted() {
            let elapsed = start.elapsed();
            info!(
                attempts = index + 1,
                skipped_validation = advisory.is_some(),
                elapsed_ms = elapsed.as_millis() as u64,
                "Coercion succeeded"
            );
            return Ok(CoercionOutcome::Succeeded {
                value,
                attempts: index + 1,
                advisory,
                continuation,
                elapsed,
            });
        }

        warn!(
            attempt = index + 1,
            error_count = feedback.len(),
            "Coercion attempt failed"
        );
        errors = feedback;
    }

    let attempts = options.max_retries;
    let elapsed = start.elapsed();
    info!(
        attempts,
        error_count = errors.len(),
        strict = options.strict,
        elapsed_ms = elapsed.as_millis() as u64,
        "Coercion exhausted"
    );

    if options.strict {
        Err(CoerceError::Exhausted { attempts, errors })
    } else {
        Ok(CoercionOutcome::Exhausted {
            attempts,
            errors,
            continuation,
            elapsed,
        })
    }
}

/// Send one prompt and evaluate the reply.
///
/// Returns the attempt record and the token the backend handed back, if any.
async fn run_attempt<T>(
    transport: &T,
    index: u32,
    prompt: String,
    continuation: Option<ContinuationToken>,
    validator: &Result<SchemaValidator, SchemaError>,
) -> Result<(CoercionAttempt, Option<ContinuationToken>), CoerceError>
where
    T: Transport + ?Sized,
{
    let request =
        PromptRequest::new(vec![prompt.clone()]).with_continuation(continuation.clone());
    let exchange = send_prompts(transport, CHAT_COMPLETIONS_PATH, &request).await?;

    let response_text = exchange
        .response
        .first_text()
        .filter(|text| !text.trim().is_empty());
    let value = response_text.as_deref().and_then(extract_json);
    let validation = value.as_ref().map(|value| match validator {
        Ok(validator) => validator.validate(value),
        Err(err) => ValidationOutcome::SchemaDefect(err.message.clone()),
    });

    let attempt = CoercionAttempt {
        index,
        prompt,
        response_text,
        value,
        validation,
        continuation,
    };
    Ok((attempt, exchange.response.continuation))
}
