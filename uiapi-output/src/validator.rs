//! JSON Schema validation with path-qualified error reporting.
//!
//! Validation is backed by the `jsonschema` crate (Draft 7) when the
//! `schema-validation` feature is enabled, which it is by default. Without
//! it, every value is accepted with an advisory so callers can tell the
//! check never ran.

use serde_json::Value as JsonValue;

use crate::error::{SchemaError, INVALID_SCHEMA_PREFIX};

/// Advisory returned when validation support is compiled out.
pub const VALIDATION_SKIPPED: &str = "Warning: schema validation unavailable, validation skipped";

/// Path label for violations at the top level of the document.
pub const ROOT_PATH: &str = "root";

/// Result of validating one value against a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The value conforms.
    Valid,
    /// The value violates one or more rules, in the order found.
    Invalid(Vec<String>),
    /// The schema itself could not be compiled.
    SchemaDefect(String),
    /// No validator is available; the value was not checked.
    Skipped(String),
}

impl ValidationOutcome {
    /// Whether the value may be used.
    ///
    /// A skipped check counts as usable; use [`is_skipped`](Self::is_skipped)
    /// to tell it apart from a real pass.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid | Self::Skipped(_))
    }

    /// Whether validation was skipped.
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    /// The advisory attached to a skipped check.
    pub fn advisory(&self) -> Option<&str> {
        match self {
            Self::Skipped(advisory) => Some(advisory),
            _ => None,
        }
    }

    /// Error lines suitable for feeding back to the model.
    ///
    /// Schema defects are reported as a single line prefixed with
    /// `Invalid schema`.
    pub fn errors(&self) -> Vec<String> {
        match self {
            Self::Valid | Self::Skipped(_) => Vec::new(),
            Self::Invalid(errors) => errors.clone(),
            Self::SchemaDefect(message) => vec![format!("{INVALID_SCHEMA_PREFIX}: {message}")],
        }
    }

    /// Flatten into a `(passed, messages)` pair.
    ///
    /// A skipped check yields `(true, [advisory])`.
    pub fn into_parts(self) -> (bool, Vec<String>) {
        match self {
            Self::Valid => (true, Vec::new()),
            Self::Skipped(advisory) => (true, vec![advisory]),
            other => (false, other.errors()),
        }
    }
}

/// A schema compiled once and reused across validations.
pub struct SchemaValidator {
    #[cfg(feature = "schema-validation")]
    compiled: jsonschema::JSONSchema,
}

impl std::fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaValidator").finish_non_exhaustive()
    }
}

impl SchemaValidator {
    /// Compile a schema, rejecting it if it is not valid Draft 7.
    #[cfg(feature = "schema-validation")]
    pub fn compile(schema: &JsonValue) -> Result<Self, SchemaError> {
        let compiled = jsonschema::JSONSchema::options()
            .with_draft(jsonschema::Draft::Draft7)
            .compile(schema)
            .map_err(|e| SchemaError::new(e.to_string()))?;
        Ok(Self { compiled })
    }

    /// Accept any schema; nothing is compiled without validation support.
    #[cfg(not(feature = "schema-validation"))]
    pub fn compile(_schema: &JsonValue) -> Result<Self, SchemaError> {
        Ok(Self {})
    }

    /// Whether this build can actually check values.
    pub fn is_available() -> bool {
        cfg!(feature = "schema-validation")
    }

    /// Validate a value, collecting every violation.
    #[cfg(feature = "schema-validation")]
    pub fn validate(&self, value: &JsonValue) -> ValidationOutcome {
        match self.compiled.validate(value) {
            Ok(()) => ValidationOutcome::Valid,
            Err(errors) => ValidationOutcome::Invalid(
                errors
                    .map(|error| {
                        let path = display_path(&error.instance_path.to_string());
                        format!("{path}: {error}")
                    })
                    .collect(),
            ),
        }
    }

    /// Report the value as unchecked.
    #[cfg(not(feature = "schema-validation"))]
    pub fn validate(&self, _value: &JsonValue) -> ValidationOutcome {
        tracing::warn!("Schema validation support not compiled in, skipping");
        ValidationOutcome::Skipped(VALIDATION_SKIPPED.to_string())
    }
}

/// Validate `value` against `schema` in one step.
///
/// A schema that fails to compile yields [`ValidationOutcome::SchemaDefect`].
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use uiapi_output::validator::validate_json;
///
/// let schema = json!({"type": "object", "required": ["name", "age"]});
/// let outcome = validate_json(&json!({"name": "Ann", "age": 30}), &schema);
/// assert!(outcome.is_valid());
/// ```
pub fn validate_json(value: &JsonValue, schema: &JsonValue) -> ValidationOutcome {
    match SchemaValidator::compile(schema) {
        Ok(validator) => validator.validate(value),
        Err(err) => ValidationOutcome::SchemaDefect(err.message),
    }
}

/// Render a JSON pointer as `a -> b -> 0`, or `root` when empty.
#[cfg_attr(not(feature = "schema-validation"), allow(dead_code))]
fn display_path(pointer: &str) -> String {
    let segments: Vec<String> = pointer
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
        .collect();

    if segments.is_empty() {
        ROOT_PATH.to_string()
    } else {
        segments.join(" -> ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn person_schema() -> JsonValue {
        json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "age": {"type": "integer"},
                "address": {
                    "type": "object",
                    "properties": {"city": {"type": "string"}},
                    "required": ["city"]
                }
            },
            "required": ["name", "age"]
        })
    }

    #[test]
    fn test_display_path() {
        assert_eq!(display_path(""), "root");
        assert_eq!(display_path("/age"), "age");
        assert_eq!(display_path("/address/city"), "address -> city");
        assert_eq!(display_path("/items/0/a~1b"), "items -> 0 -> a/b");
    }

    #[test]
    fn test_outcome_errors_for_schema_defect() {
        let outcome = ValidationOutcome::SchemaDefect("bad type".into());
        assert!(!outcome.is_valid());
        assert_eq!(outcome.errors(), vec!["Invalid schema: bad type".to_string()]);
    }

    #[test]
    fn test_skipped_is_distinguishable() {
        let outcome = ValidationOutcome::Skipped(VALIDATION_SKIPPED.into());
        assert!(outcome.is_valid());
        assert!(outcome.is_skipped());
        assert_eq!(outcome.advisory(), Some(VALIDATION_SKIPPED));
        assert!(outcome.errors().is_empty());
        assert_eq!(
            outcome.into_parts(),
            (true, vec![VALIDATION_SKIPPED.to_string()])
        );
    }

    #[test]
    fn test_valid_into_parts() {
        assert_eq!(ValidationOutcome::Valid.into_parts(), (true, Vec::new()));
    }

    #[cfg(feature = "schema-validation")]
    mod with_validator {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_valid_person() {
            let outcome = validate_json(&json!({"name": "Ann", "age": 30}), &person_schema());
            assert_eq!(outcome, ValidationOutcome::Valid);
            assert!(!outcome.is_skipped());
        }

        #[test]
        fn test_reports_every_missing_field() {
            let outcome = validate_json(&json!({}), &person_schema());
            let errors = outcome.errors();
            assert!(!outcome.is_valid());
            assert!(errors.len() >= 2, "expected two errors, got {errors:?}");
            assert!(errors.iter().all(|e| e.starts_with("root: ")));
            assert!(errors.iter().any(|e| e.contains("name")));
            assert!(errors.iter().any(|e| e.contains("age")));
        }

        #[test]
        fn test_type_error_is_path_qualified() {
            let value = json!({"name": "Ann", "age": "thirty"});
            let outcome = validate_json(&value, &person_schema());
            let errors = outcome.errors();
            assert_eq!(errors.len(), 1);
            assert!(errors[0].starts_with("age: "), "got {errors:?}");
        }

        #[test]
        fn test_nested_error_path() {
            let value = json!({"name": "Ann", "age": 30, "address": {"city": 7}});
            let errors = validate_json(&value, &person_schema()).errors();
            assert_eq!(errors.len(), 1);
            assert!(errors[0].starts_with("address -> city: "), "got {errors:?}");
        }

        #[test]
        fn test_schema_defect_detected() {
            let schema = json!({"type": "not-a-type"});
            let outcome = validate_json(&json!({}), &schema);
            assert!(matches!(outcome, ValidationOutcome::SchemaDefect(_)));
            let errors = outcome.errors();
            assert_eq!(errors.len(), 1);
            assert!(errors[0].starts_with("Invalid schema: "));
        }

        #[test]
        fn test_compiled_validator_reused() {
            let validator = SchemaValidator::compile(&person_schema()).unwrap();
            assert!(validator.validate(&json!({"name": "A", "age": 1})).is_valid());
            assert!(!validator.validate(&json!({"name": "A"})).is_valid());
            assert!(SchemaValidator::is_available());
        }
    }

    #[cfg(not(feature = "schema-validation"))]
    mod without_validator {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_degrades_to_advisory() {
            let outcome = validate_json(&json!({}), &person_schema());
            assert!(outcome.is_valid());
            assert_eq!(outcome.advisory(), Some(VALIDATION_SKIPPED));
            assert!(!SchemaValidator::is_available());
        }
    }
}
