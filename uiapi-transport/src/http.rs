//! reqwest-backed transport.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value as JsonValue;
use std::time::{Duration, Instant};
use tracing::debug;
use uiapi_core::ClientConfig;

use crate::error::{TransportError, TransportResult};
use crate::retry::{with_retry, RetryConfig};
use crate::transport::{Transport, TransportResponse};

/// HTTP transport talking JSON to a UI API server.
///
/// # Example
///
/// ```rust,ignore
/// use uiapi_core::ClientConfig;
/// use uiapi_transport::HttpTransport;
///
/// let config = ClientConfig::new("http://localhost:8000")?;
/// let transport = HttpTransport::new(&config)?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    retry: RetryConfig,
}

impl HttpTransport {
    /// Create a transport with its own reqwest client.
    pub fn new(config: &ClientConfig) -> TransportResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create a transport around an existing reqwest client.
    pub fn with_client(client: Client, config: &ClientConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: RetryConfig::new().max_retries(config.max_transport_retries),
        }
    }

    /// Replace the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// The server this transport talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The retry policy in use.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, path: &str, payload: &JsonValue) -> TransportResult<TransportResponse> {
        let url = format!("{}{}", self.base_url, path);

        with_retry(&self.retry, || {
            let client = self.client.clone();
            let url = url.clone();
            let payload = payload.clone();
            async move { post_once(client, url, payload).await }
        })
        .await
    }
}

async fn post_once(
    client: Client,
    url: String,
    payload: JsonValue,
) -> TransportResult<TransportResponse> {
    debug!(url = %url, "Posting to UI API");
    let start = Instant::now();

    let response = client.post(&url).json(&payload).send().await?;
    let response = check_response(response).await?;
    let text = response.text().await?;
    let elapsed = start.elapsed();

    let body = serde_json::from_str(&text)
        .map_err(|e| TransportError::invalid_response(format!("{e}: {}", preview(&text))))?;

    debug!(
        url = %url,
        elapsed_ms = elapsed.as_millis() as u64,
        "UI API request completed"
    );
    Ok(TransportResponse { body, elapsed })
}

/// Turn a non-success status into a [`TransportError::Http`].
async fn check_response(response: Response) -> TransportResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = parse_retry_after(&response);
    let body = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), "UI API returned an error status");
    Err(TransportError::Http {
        status: status.as_u16(),
        body,
        retry_after,
    })
}

/// Parse a Retry-After header given in seconds.
fn parse_retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// First few hundred characters of a body, for error messages.
fn preview(text: &str) -> &str {
    const LIMIT: usize = 200;
    match text.char_indices().nth(LIMIT) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
