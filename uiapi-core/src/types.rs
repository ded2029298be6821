//! Wire types for the UI API endpoints.
//!
//! Both endpoints share one shape: a list of prompts (plus an optional
//! conversation URL) goes in, a result list (plus an optional updated
//! conversation URL) comes out. Only the result field name differs.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// Text completion endpoint path.
pub const CHAT_COMPLETIONS_PATH: &str = "/uia/chat/completions";

/// Image generation endpoint path.
pub const IMAGE_GENERATIONS_PATH: &str = "/uia/images/generations";

/// Opaque handle continuing an existing backend conversation.
///
/// The UI backend hands this out as a chat URL; the client never looks
/// inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContinuationToken(String);

impl ContinuationToken {
    /// Wrap a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Borrow the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the raw token.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ContinuationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContinuationToken {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ContinuationToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Request body for either endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRequest {
    /// Prompts, in order.
    pub prompts: Vec<String>,
    /// Conversation to continue.
    #[serde(rename = "chat_url", skip_serializing_if = "Option::is_none")]
    pub continuation: Option<ContinuationToken>,
}

impl PromptRequest {
    /// Create a request starting a new conversation.
    pub fn new(prompts: Vec<String>) -> Self {
        Self {
            prompts,
            continuation: None,
        }
    }

    /// Continue the given conversation, if any.
    #[must_use]
    pub fn with_continuation(mut self, token: Option<ContinuationToken>) -> Self {
        self.continuation = token;
        self
    }
}

/// Response body from either endpoint.
///
/// Missing or `null` result lists deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptResponse {
    /// Text results from the completion endpoint.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub articles: Vec<Article>,
    /// Image results from the generation endpoint.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<JsonValue>,
    /// Updated conversation handle, when the backend returns one.
    #[serde(rename = "chat_url", default, skip_serializing_if = "Option::is_none")]
    pub continuation: Option<ContinuationToken>,
}

impl PromptResponse {
    /// Text of the first article, if any.
    pub fn first_text(&self) -> Option<String> {
        self.articles.first().map(Article::text)
    }
}

/// A single text result.
///
/// The UI backend scrapes the chat page, so an article arrives either as
/// one string or as the rendered lines of the answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Article {
    /// Whole answer as one string.
    Text(String),
    /// Answer split into lines.
    Lines(Vec<JsonValue>),
    /// Anything else the backend sends.
    Other(JsonValue),
}

impl Article {
    /// Flatten the article into plain text.
    ///
    /// Lines are joined with `\n`; non-string items render as JSON.
    pub fn text(&self) -> String {
        match self {
            Article::Text(text) => text.clone(),
            Article::Lines(lines) => lines
                .iter()
                .map(render_item)
                .collect::<Vec<_>>()
                .join("\n"),
            Article::Other(value) => render_item(value),
        }
    }
}

impl From<&str> for Article {
    fn from(s: &str) -> Self {
        Article::Text(s.to_string())
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn render_item(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_request_omits_missing_token() {
        let request = PromptRequest::new(vec!["Hello!".into()]);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"prompts": ["Hello!"]})
        );
    }

    #[test]
    fn test_request_serializes_token_as_chat_url() {
        let request = PromptRequest::new(vec!["Hi".into()])
            .with_continuation(Some("https://chat.example/c/1".into()));
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"prompts": ["Hi"], "chat_url": "https://chat.example/c/1"})
        );
    }

    #[test]
    fn test_response_defaults() {
        let response: PromptResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.articles.is_empty());
        assert!(response.images.is_empty());
        assert!(response.continuation.is_none());
        assert!(response.first_text().is_none());
    }

    #[test]
    fn test_response_null_lists() {
        let response: PromptResponse = serde_json::from_value(json!({
            "articles": null,
            "images": null,
            "chat_url": null
        }))
        .unwrap();
        assert_eq!(response, PromptResponse::default());
    }

    #[test]
    fn test_response_with_token() {
        let response: PromptResponse = serde_json::from_value(json!({
            "articles": ["hello"],
            "chat_url": "https://chat.example/c/2"
        }))
        .unwrap();
        assert_eq!(response.first_text().as_deref(), Some("hello"));
        assert_eq!(
            response.continuation,
            Some(ContinuationToken::new("https://chat.example/c/2"))
        );
    }

    #[test]
    fn test_line_article_joined() {
        let response: PromptResponse = serde_json::from_value(json!({
            "articles": [["ChatGPT said:", "{\"a\": 1}", 42]]
        }))
        .unwrap();
        assert_eq!(
            response.first_text().unwrap(),
            "ChatGPT said:\n{\"a\": 1}\n42"
        );
    }

    #[test]
    fn test_article_round_trips_verbatim() {
        let raw = json!(["plain", ["a", "b"], {"kind": "other"}]);
        let articles: Vec<Article> = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&articles).unwrap(), raw);
        assert_eq!(articles[2].text(), r#"{"kind":"other"}"#);
    }
}
