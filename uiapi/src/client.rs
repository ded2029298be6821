//! High-level client for a ChatGPT UI API server.

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uiapi_core::{
    Article, ClientConfig, ContinuationToken, PromptRequest, CHAT_COMPLETIONS_PATH,
    IMAGE_GENERATIONS_PATH,
};
use uiapi_transport::{send_prompts, BoxedTransport, HttpTransport, Transport, TransportResult};

use crate::coerce::{coerce, CoercionOutcome};
use crate::error::{ClientError, CoerceError};
use crate::options::CoerceOptions;

// ============================================================================
// Passthrough results
// ============================================================================

/// Verbatim result list of a single request.
#[derive(Debug, Clone, PartialEq)]
pub struct Passthrough<T> {
    /// Results in the order the backend returned them.
    pub results: Vec<T>,
    /// Conversation handle returned by the backend.
    pub continuation: Option<ContinuationToken>,
    /// Round-trip time.
    pub elapsed: Duration,
}

/// Result of [`GptClient::chat_completions`].
pub type ChatCompletion = Passthrough<Article>;

/// Result of [`GptClient::image_generations`].
pub type ImageGeneration = Passthrough<JsonValue>;

impl ChatCompletion {
    /// Text of the first article.
    pub fn first_text(&self) -> Option<String> {
        self.results.first().map(Article::text)
    }
}

// ============================================================================
// Client
// ============================================================================

/// Client for the UI API endpoints.
///
/// Cheap to clone; clones share the transport.
///
/// # Example
///
/// ```rust,ignore
/// use serde_json::json;
/// use uiapi::{ClientConfig, CoerceOptions, GptClient};
///
/// let client = GptClient::new(&ClientConfig::new("http://localhost:8000")?)?;
///
/// let chat = client.chat_completions(vec!["Hello!".into()], None).await?;
/// println!("{:?}", chat.first_text());
///
/// let schema = json!({"type": "object", "required": ["name", "age"]});
/// let person = client
///     .chat_json(&["Give me a person".into()], &schema, &CoerceOptions::new())
///     .await?;
/// ```
#[derive(Clone)]
pub struct GptClient {
    transport: BoxedTransport,
}

impl GptClient {
    /// Create a client talking HTTP to the configured server.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(transport))
    }

    /// Create a client from `UIAPI_*` environment variables.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(&ClientConfig::from_env()?)
    }

    /// Create a client over any transport.
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Create a client over a shared transport.
    pub fn from_shared(transport: BoxedTransport) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &BoxedTransport {
        &self.transport
    }

    /// Send prompts to the chat endpoint and return the articles verbatim.
    pub async fn chat_completions(
        &self,
        prompts: Vec<String>,
        continuation: Option<ContinuationToken>,
    ) -> TransportResult<ChatCompletion> {
        let request = PromptRequest::new(prompts).with_continuation(continuation);
        let exchange =
            send_prompts(self.transport.as_ref(), CHAT_COMPLETIONS_PATH, &request).await?;
        debug!(
            articles = exchange.response.articles.len(),
            elapsed_ms = exchange.elapsed.as_millis() as u64,
            "Chat completion received"
        );
        Ok(Passthrough {
            results: exchange.response.articles,
            continuation: exchange.response.continuation,
            elapsed: exchange.elapsed,
        })
    }

    /// Send prompts to the image endpoint and return the images verbatim.
    pub async fn image_generations(
        &self,
        prompts: Vec<String>,
        continuation: Option<ContinuationToken>,
    ) -> TransportResult<ImageGeneration> {
        let request = PromptRequest::new(prompts).with_continuation(continuation);
        let exchange =
            send_prompts(self.transport.as_ref(), IMAGE_GENERATIONS_PATH, &request).await?;
        debug!(
            images = exchange.response.images.len(),
            elapsed_ms = exchange.elapsed.as_millis() as u64,
            "Image generation received"
        );
        Ok(Passthrough {
            results: exchange.response.images,
            continuation: exchange.response.continuation,
            elapsed: exchange.elapsed,
        })
    }

    /// Ask for JSON conforming to `schema`, retrying with error feedback.
    ///
    /// See [`coerce`] for the retry protocol.
    pub async fn chat_json(
        &self,
        prompts: &[String],
        schema: &JsonValue,
        options: &CoerceOptions,
    ) -> Result<CoercionOutcome, CoerceError> {
        coerce(self.transport.as_ref(), prompts, schema, options).await
    }

    /// Like [`chat_json`](Self::chat_json), deserializing the value into `T`.
    ///
    /// Returns `Ok(None)` when a non-strict call runs out of attempts.
    pub async fn chat_typed<T: DeserializeOwned>(
        &self,
        prompts: &[String],
        schema: &JsonValue,
        options: &CoerceOptions,
    ) -> Result<Option<T>, CoerceError> {
        let outcome = self.chat_json(prompts, schema, options).await?;
        outcome
            .into_value()
            .map(|value| serde_json::from_value(value).map_err(CoerceError::Deserialize))
            .transpose()
    }
}

impl fmt::Debug for GptClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GptClient").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use serde_json::json;
    use uiapi_transport::MockTransport;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, PartialEq, Deserialize)]
    struct Person {
        name: String,
        age: u32,
    }

    fn person_schema() -> JsonValue {
        json!({
            "type": "object",
            "properties": {"name": {"type": "string"}, "age": {"type": "integer"}},
            "required": ["name", "age"]
        })
    }

    #[tokio::test]
    async fn test_chat_passthrough_is_verbatim() {
        let mock = MockTransport::new().with_response(json!({
            "articles": ["not json at all", ["line one", "line two"]],
            "chat_url": "https://chat.example/c/5"
        }));
        let client = GptClient::with_transport(mock.clone());

        let chat = client
            .chat_completions(vec!["Hello!".into(), "Again".into()], None)
            .await
            .unwrap();

        assert_eq!(
            chat.results,
            vec![
                Article::from("not json at all"),
                Article::Lines(vec![json!("line one"), json!("line two")]),
            ]
        );
        assert_eq!(chat.first_text().as_deref(), Some("not json at all"));
        assert_eq!(
            chat.continuation,
            Some(ContinuationToken::new("https://chat.example/c/5"))
        );

        let recorded = mock.recorded_requests();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].path, CHAT_COMPLETIONS_PATH);
        assert_eq!(recorded[0].payload, json!({"prompts": ["Hello!", "Again"]}));
    }

    #[tokio::test]
    async fn test_image_passthrough() {
        let mock = MockTransport::new().with_response(json!({"images": ["https://img/1.png"]}));
        let client = GptClient::with_transport(mock.clone());

        let images = client
            .image_generations(vec!["a cat".into()], Some("https://chat.example/c/1".into()))
            .await
            .unwrap();

        assert_eq!(images.results, vec![json!("https://img/1.png")]);
        assert_eq!(images.continuation, None);

        let recorded = mock.recorded_requests();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].path, IMAGE_GENERATIONS_PATH);
        assert_eq!(recorded[0].chat_url(), Some("https://chat.example/c/1"));
    }

    #[tokio::test]
    async fn test_passthrough_missing_results() {
        let client = GptClient::with_transport(MockTransport::new());
        let chat = client.chat_completions(vec!["Hi".into()], None).await.unwrap();
        assert!(chat.results.is_empty());
        assert_eq!(chat.first_text(), None);
    }

    #[cfg(feature = "schema-validation")]
    #[tokio::test]
    async fn test_chat_typed() {
        let mock = MockTransport::new()
            .with_articles(["```json\n{\"name\": \"Ann\", \"age\": 30}\n```"]);
        let client = GptClient::with_transport(mock);

        let person: Option<Person> = client
            .chat_typed(&["give me a person".into()], &person_schema(), &CoerceOptions::new())
            .await
            .unwrap();

        assert_eq!(
            person,
            Some(Person {
                name: "Ann".into(),
                age: 30
            })
        );
    }

    #[cfg(feature = "schema-validation")]
    #[tokio::test]
    async fn test_chat_typed_lenient_exhaustion() {
        let mock = MockTransport::new().with_articles(["no"]);
        let client = GptClient::with_transport(mock);

        let options = CoerceOptions::new().max_retries(1).strict(false);
        let person: Option<Person> = client
            .chat_typed(&["give me a person".into()], &person_schema(), &options)
            .await
            .unwrap();

        assert_eq!(person, None);
    }

    #[tokio::test]
    async fn test_chat_typed_shape_mismatch() {
        let mock = MockTransport::new().with_articles([r#"{"name": "Ann", "age": -1}"#]);
        let client = GptClient::with_transport(mock);

        let result: Result<Option<Person>, _> = client
            .chat_typed(&["give me a person".into()], &person_schema(), &CoerceOptions::new())
            .await;

        assert!(matches!(result, Err(CoerceError::Deserialize(_))));
    }

    #[tokio::test]
    async fn test_http_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_COMPLETIONS_PATH))
            .and(body_json(json!({"prompts": ["Hello!"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "articles": ["Hi there"],
                "chat_url": "https://chat.example/c/7"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GptClient::new(&ClientConfig::new(server.uri()).unwrap()).unwrap();
        let chat = client
            .chat_completions(vec!["Hello!".into()], None)
            .await
            .unwrap();

        assert_eq!(chat.first_text().as_deref(), Some("Hi there"));
        assert_eq!(
            chat.continuation.as_ref().map(ContinuationToken::as_str),
            Some("https://chat.example/c/7")
        );
    }
}
