//! Prompt augmentation for schema-constrained answers.

use serde_json::Value as JsonValue;

/// Header introducing the previous attempt's errors.
pub const FEEDBACK_HEADER: &str = "Your previous response had validation errors:";

/// Instruction following the error list.
pub const FEEDBACK_FOOTER: &str = "Please fix and respond again.";

/// Instruction preceding the rendered schema.
pub const SCHEMA_INSTRUCTION: &str = "Respond ONLY with valid JSON matching this schema:";

/// Build the prompt text for one coercion attempt.
///
/// The first attempt passes `None` and gets the original prompt followed
/// by the schema instruction. Retries pass the errors from the attempt
/// just made, which are listed as bullets ahead of the prompt. An empty
/// error slice is treated like `None`.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use uiapi_output::prompt::augment_prompt;
///
/// let schema = json!({"type": "object"});
/// let errors = vec!["root: \"name\" is a required property".to_string()];
/// let prompt = augment_prompt("Give me a person", &schema, Some(errors.as_slice()));
/// assert!(prompt.contains("- root: \"name\" is a required property"));
/// assert!(prompt.ends_with("{\n  \"type\": \"object\"\n}"));
/// ```
pub fn augment_prompt(
    prompt: &str,
    schema: &JsonValue,
    prior_errors: Option<&[String]>,
) -> String {
    let mut lines: Vec<String> = Vec::new();

    if let Some(errors) = prior_errors.filter(|e| !e.is_empty()) {
        lines.push(FEEDBACK_HEADER.to_string());
        lines.extend(errors.iter().map(|e| format!("- {e}")));
        lines.push(String::new());
        lines.push(FEEDBACK_FOOTER.to_string());
        lines.push(String::new());
    }

    lines.push(prompt.to_string());
    lines.push(String::new());
    lines.push(SCHEMA_INSTRUCTION.to_string());
    lines.push(render_schema(schema));

    lines.join("\n")
}

/// Pretty-print a schema with two-space indentation.
pub fn render_schema(schema: &JsonValue) -> String {
    serde_json::to_string_pretty(schema).unwrap_or_else(|_| schema.to_string())
}
