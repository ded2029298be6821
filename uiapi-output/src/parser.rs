//! JSON extraction from free-form model output.
//!
//! Backends rarely answer with bare JSON. This module pulls the first
//! parseable JSON value out of a response, trying in order:
//!
//! 1. the whole (trimmed) text
//! 2. each fenced code block, with or without a language tag
//! 3. each balanced `{ ... }` span
//!
//! Malformed JSON is a normal negative result here, never an error.

use regex::Regex;
use serde_json::Value as JsonValue;
use std::sync::OnceLock;
use tracing::trace;

fn fence_pattern() -> Option<&'static Regex> {
    static FENCE: OnceLock<Option<Regex>> = OnceLock::new();
    FENCE
        .get_or_init(|| {
            // Opening fence, optional language tag, then the shortest body up
            // to the next closing fence.
            Regex::new(r"(?s)```(?:[A-Za-z][\w+.-]*)?[ \t]*\r?\n?(.*?)```").ok()
        })
        .as_ref()
}

/// Extract a JSON value from text that might contain markdown or prose.
///
/// Returns `None` when nothing in the text parses.
///
/// # Example
///
/// ```rust
/// use uiapi_output::parser::extract_json;
///
/// let text = r#"Here is your data: {"name": "John", "age": 25} Hope this helps!"#;
/// let value = extract_json(text).unwrap();
/// assert_eq!(value["name"], "John");
///
/// assert!(extract_json("not json at all").is_none());
/// ```
pub fn extract_json(text: &str) -> Option<JsonValue> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<JsonValue>(text) {
        trace!("Response parsed as bare JSON");
        return Some(value);
    }

    if let Some(value) = extract_from_fences(text) {
        trace!("JSON found in fenced block");
        return Some(value);
    }

    let found = find_json_object(text);
    if found.is_some() {
        trace!("JSON found by brace matching");
    }
    found
}

/// Parse the first fenced code block whose body is valid JSON.
fn extract_from_fences(text: &str) -> Option<JsonValue> {
    fence_pattern()?
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|body| serde_json::from_str::<JsonValue>(body.as_str().trim()).ok())
}

/// Find the first balanced `{ ... }` span that parses as JSON.
///
/// Top-level spans are tried first, in order. Only when none of them
/// parses are the spans nested inside them tried, so a valid object inside
/// a malformed one is still found. Braces inside string literals do not
/// count toward nesting.
fn find_json_object(text: &str) -> Option<JsonValue> {
    let (top_level, mut nested) = brace_spans(text.as_bytes());
    nested.sort_unstable();

    top_level
        .into_iter()
        .chain(nested)
        .find_map(|(start, end)| serde_json::from_str::<JsonValue>(&text[start..=end]).ok())
}

/// Collect every balanced `{ ... }` span in one pass.
///
/// Returns `(top_level, nested)` as inclusive byte ranges. Works on bytes:
/// the delimiters are ASCII and never occur inside a multi-byte UTF-8
/// sequence.
fn brace_spans(bytes: &[u8]) -> (Vec<(usize, usize)>, Vec<(usize, usize)>) {
    let mut open: Vec<usize> = Vec::new();
    let mut top_level = Vec::new();
    let mut nested = Vec::new();
    let mut in_string = false;
    let mut escape_next = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escape_next {
                escape_next = false;
            } else if b == b'\\' {
                escape_next = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            // Quotes in surrounding prose are not strings.
            b'"' if !open.is_empty() => in_string = true,
            b'{' => open.push(i),
            b'}' => {
                if let Some(start) = open.pop() {
                    if open.is_empty() {
                        top_level.push((start, i));
                    } else {
                        nested.push((start, i));
                    }
                }
            }
            _ => {}
        }
    }

    (top_level, nested)
}
