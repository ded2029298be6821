//! The transport seam between the client and the backend.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;
use uiapi_core::{PromptRequest, PromptResponse};

use crate::error::{TransportError, TransportResult};

/// Raw result of one exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    /// Decoded JSON body.
    pub body: JsonValue,
    /// Time spent on the round trip.
    pub elapsed: Duration,
}

/// Something that can POST a JSON payload to a backend path.
///
/// Implementations own connection details such as base URL and timeouts.
/// A failed exchange is reported as a [`TransportError`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `payload` to `path` and return the decoded response body.
    async fn post(&self, path: &str, payload: &JsonValue) -> TransportResult<TransportResponse>;
}

/// Shared transport for dynamic dispatch.
pub type BoxedTransport = Arc<dyn Transport>;

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn post(&self, path: &str, payload: &JsonValue) -> TransportResult<TransportResponse> {
        (**self).post(path, payload).await
    }
}

/// Typed result of [`send_prompts`].
#[derive(Debug, Clone)]
pub struct Exchange {
    /// Decoded response.
    pub response: PromptResponse,
    /// Time spent on the round trip.
    pub elapsed: Duration,
}

/// Send a [`PromptRequest`] and decode the [`PromptResponse`].
///
/// A body that is not a JSON object of the expected shape is an
/// [`TransportError::InvalidResponse`].
pub async fn send_prompts<T: Transport + ?Sized>(
    transport: &T,
    path: &str,
    request: &PromptRequest,
) -> TransportResult<Exchange> {
    let payload = serde_json::to_value(request)?;
    let TransportResponse { body, elapsed } = transport.post(path, &payload).await?;

    if !body.is_object() {
        return Err(TransportError::invalid_response(format!(
            "expected a JSON object, got {body}"
        )));
    }

    let response = serde_json::from_value(body)
        .map_err(|e| TransportError::invalid_response(e.to_string()))?;
    Ok(Exchange { response, elapsed })
}
