//! Scripted transport for tests.
//!
//! [`MockTransport`] replays queued bodies or errors in order and records
//! every request it receives.
//!
//! ```rust
//! use uiapi_transport::MockTransport;
//!
//! let transport = MockTransport::new()
//!     .with_articles(["not json"])
//!     .with_articles([r#"{"name": "Ann"}"#]);
//! assert_eq!(transport.request_count(), 0);
//! ```

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value as JsonValue};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{TransportError, TransportResult};
use crate::transport::{Transport, TransportResponse};

/// A request seen by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// Endpoint path.
    pub path: String,
    /// JSON payload.
    pub payload: JsonValue,
}

impl RecordedRequest {
    /// The `prompts` field of the payload.
    pub fn prompts(&self) -> Vec<String> {
        self.payload
            .get("prompts")
            .and_then(JsonValue::as_array)
            .map(|prompts| {
                prompts
                    .iter()
                    .filter_map(|p| p.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The `chat_url` field of the payload, if sent.
    pub fn chat_url(&self) -> Option<&str> {
        self.payload.get("chat_url").and_then(JsonValue::as_str)
    }
}

/// Transport returning pre-configured responses.
///
/// Once the queue is empty every request gets an empty object body.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<VecDeque<TransportResult<JsonValue>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockTransport {
    /// Create a mock with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw response body.
    pub fn with_response(self, body: JsonValue) -> Self {
        self.responses.lock().push_back(Ok(body));
        self
    }

    /// Queue a chat response carrying the given articles.
    pub fn with_articles<I, S>(self, articles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let articles: Vec<String> = articles.into_iter().map(Into::into).collect();
        self.with_response(json!({ "articles": articles }))
    }

    /// Queue a failed exchange.
    pub fn with_error(self, error: TransportError) -> Self {
        self.responses.lock().push_back(Err(error));
        self
    }

    /// Requests received so far.
    pub fn recorded_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(&self, path: &str, payload: &JsonValue) -> TransportResult<TransportResponse> {
        self.requests.lock().push(RecordedRequest {
            path: path.to_string(),
            payload: payload.clone(),
        });

        let next = self.responses.lock().pop_front();
        let body = next.unwrap_or_else(|| Ok(json!({})))?;
        Ok(TransportResponse {
            body,
            elapsed: Duration::from_millis(1),
        })
    }
}
