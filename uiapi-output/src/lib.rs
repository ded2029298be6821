//! # uiapi-output
//!
//! Turning free-form backend text into schema-conformant JSON.
//!
//! This crate holds the three building blocks of the coercion protocol:
//!
//! - **[`extract_json`]**: pull a JSON value out of prose, markdown fences,
//!   or an embedded `{ ... }` span
//! - **[`validate_json`]** / **[`SchemaValidator`]**: check a value against a
//!   JSON Schema and report every violation with its path
//! - **[`augment_prompt`]**: ask the backend for JSON matching a schema,
//!   with the previous attempt's errors as feedback
//!
//! ## Feature Flags
//!
//! - `schema-validation` (default): validate with the `jsonschema` crate.
//!   Without it, validation reports [`ValidationOutcome::Skipped`].
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use uiapi_output::{augment_prompt, extract_json, validate_json};
//!
//! let schema = json!({
//!     "type": "object",
//!     "properties": {"name": {"type": "string"}, "age": {"type": "integer"}},
//!     "required": ["name", "age"]
//! });
//!
//! let prompt = augment_prompt("Give me a person", &schema, None);
//! assert!(prompt.contains("Respond ONLY with valid JSON"));
//!
//! let value = extract_json("```json\n{\"name\": \"Ann\", \"age\": 30}\n```").unwrap();
//! assert!(validate_json(&value, &schema).is_valid());
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod parser;
pub mod prompt;
pub mod validator;

// Re-exports
pub use error::{SchemaError, INVALID_SCHEMA_PREFIX, NO_JSON_FOUND, NO_RESPONSE};
pub use parser::extract_json;
pub use prompt::{augment_prompt, render_schema};
pub use validator::{validate_json, SchemaValidator, ValidationOutcome, VALIDATION_SKIPPED};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        augment_prompt, extract_json, validate_json, SchemaError, SchemaValidator,
        ValidationOutcome,
    };
}
