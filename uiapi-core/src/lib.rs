//! # uiapi-core
//!
//! Core types for talking to a ChatGPT UI API server.
//!
//! This crate provides the pieces every other uiapi crate builds on:
//!
//! - **Config**: [`ClientConfig`], the explicit base URL and timeouts
//! - **Wire types**: [`PromptRequest`], [`PromptResponse`], [`Article`]
//! - **Conversations**: [`ContinuationToken`], the opaque chat handle
//! - **Errors**: [`ConfigError`]
//!
//! ## Example
//!
//! ```rust
//! use uiapi_core::{ClientConfig, PromptRequest, CHAT_COMPLETIONS_PATH};
//!
//! let config = ClientConfig::new("http://localhost:8000/").unwrap();
//! assert_eq!(
//!     config.endpoint_url(CHAT_COMPLETIONS_PATH),
//!     "http://localhost:8000/uia/chat/completions"
//! );
//!
//! let request = PromptRequest::new(vec!["Hello!".to_string()]);
//! assert!(request.continuation.is_none());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod errors;
pub mod types;

// Re-exports for convenience
pub use config::{ClientConfig, BASE_URL_ENV, TIMEOUT_ENV};
pub use errors::{ConfigError, ConfigResult};
pub use types::{
    Article, ContinuationToken, PromptRequest, PromptResponse, CHAT_COMPLETIONS_PATH,
    IMAGE_GENERATIONS_PATH,
};

/// Prelude module for common imports.
pub mod prelude {
    pub use crate::config::ClientConfig;
    pub use crate::errors::{ConfigError, ConfigResult};
    pub use crate::types::{Article, ContinuationToken, PromptRequest, PromptResponse};
}
