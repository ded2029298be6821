//! # uiapi-transport
//!
//! Request/response exchange with a ChatGPT UI API server.
//!
//! ## Core Concepts
//!
//! - **[`Transport`]**: POST a JSON payload to a path, get a JSON body back
//! - **[`HttpTransport`]**: the reqwest implementation
//! - **[`MockTransport`]**: scripted responses for tests
//! - **[`RetryConfig`]**: backoff for transient HTTP failures (5xx, 429,
//!   timeouts), applied inside a single exchange
//!
//! ## Example
//!
//! ```rust,ignore
//! use uiapi_core::{ClientConfig, PromptRequest, CHAT_COMPLETIONS_PATH};
//! use uiapi_transport::{send_prompts, HttpTransport};
//!
//! let transport = HttpTransport::new(&ClientConfig::from_env()?)?;
//! let request = PromptRequest::new(vec!["Hello!".into()]);
//! let exchange = send_prompts(&transport, CHAT_COMPLETIONS_PATH, &request).await?;
//! println!("{:?} in {:?}", exchange.response.articles, exchange.elapsed);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod http;
pub mod mock;
pub mod retry;
pub mod transport;

// Re-exports
pub use error::{TransportError, TransportResult};
pub use http::HttpTransport;
pub use mock::{MockTransport, RecordedRequest};
pub use retry::{with_retry, RetryConfig, WaitStrategy};
pub use transport::{send_prompts, BoxedTransport, Exchange, Transport, TransportResponse};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        send_prompts, BoxedTransport, HttpTransport, RetryConfig, Transport, TransportError,
        TransportResponse, TransportResult,
    };
}
