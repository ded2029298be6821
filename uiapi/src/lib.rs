//! # uiapi
//!
//! Client for a ChatGPT UI API server that can turn free-form answers into
//! JSON matching a caller-supplied schema.
//!
//! ## Overview
//!
//! The backend replies with prose. [`GptClient::chat_json`] asks for JSON,
//! pulls it out of whatever the backend wrote, validates it, and on failure
//! asks again in the same conversation with the validation errors as
//! feedback. Plain [`chat_completions`](GptClient::chat_completions) and
//! [`image_generations`](GptClient::image_generations) are single-request
//! passthroughs.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use serde_json::json;
//! use uiapi::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = GptClient::from_env()?;
//!
//!     let schema = json!({
//!         "type": "object",
//!         "properties": {
//!             "name": {"type": "string"},
//!             "age": {"type": "integer"}
//!         },
//!         "required": ["name", "age"]
//!     });
//!
//!     let outcome = client
//!         .chat_json(&["Give me a person".into()], &schema, &CoerceOptions::new())
//!         .await?;
//!
//!     println!("{} after {} attempts", outcome.value().unwrap(), outcome.attempts());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `schema-validation` (default): validate with the `jsonschema` crate.
//!   Without it, values are accepted and
//!   [`CoercionOutcome::advisory`] reports that validation was skipped.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod client;
pub mod coerce;
pub mod error;
pub mod options;

// Re-export the building blocks
pub use uiapi_core::{
    Article, ClientConfig, ConfigError, ContinuationToken, PromptRequest, PromptResponse,
    CHAT_COMPLETIONS_PATH, IMAGE_GENERATIONS_PATH,
};
pub use uiapi_output::{
    augment_prompt, extract_json, validate_json, SchemaError, SchemaValidator, ValidationOutcome,
};
pub use uiapi_transport::{
    BoxedTransport, HttpTransport, MockTransport, RetryConfig, Transport, TransportError,
    TransportResponse,
};

pub use client::{ChatCompletion, GptClient, ImageGeneration, Passthrough};
pub use coerce::{coerce, CoercionAttempt, CoercionOutcome};
pub use error::{ClientError, CoerceError};
pub use options::CoerceOptions;

/// Prelude for common imports.
///
/// ```rust
/// use uiapi::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ClientConfig, CoerceError, CoerceOptions, CoercionOutcome, ContinuationToken, GptClient,
        Transport, TransportError, ValidationOutcome,
    };
}
