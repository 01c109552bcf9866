//! Response classification.
//!
//! The API reports logical failures in two different shapes: permission
//! problems as a bare HTTP 403, and validation problems as an HTTP 200
//! whose body carries an error envelope with a violation list. Everything
//! else that is not a clean 200 is an unknown failure. [`classify`] folds
//! a raw status/body pair into that taxonomy and is total: malformed JSON
//! never panics, it degrades to an unknown failure carrying the parse
//! error.

use crate::errors::{MyraError, MyraResult};
use serde::Deserialize;
use serde_json::Value;

/// A single field-level validation error reported by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Violation {
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Path of the offending property inside the submitted object.
    #[serde(rename = "propertyPath", default)]
    pub property_path: String,
}

impl Violation {
    /// Looks up the offending value in the returned target object.
    ///
    /// An absent target or property yields the `N/A` placeholder so that
    /// user-facing reporting never has to special-case it.
    pub fn given_value(&self, target_object: Option<&Value>) -> String {
        target_object
            .and_then(|row| row.get(&self.property_path))
            .map(render_value)
            .unwrap_or_else(|| "N/A".to_string())
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Typed outcome of one API call.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome {
    /// Clean HTTP 200 with the parsed payload.
    Success(Value),
    /// HTTP 200 carrying the error envelope.
    ValidationFailure {
        /// Violations from the response `violationList`.
        violations: Vec<Violation>,
        /// First entry of the response `targetObject`, when present.
        target_object: Option<Value>,
    },
    /// HTTP 403; the body is ignored.
    PermissionDenied,
    /// Any other status, or an unparseable 200 body.
    UnknownFailure {
        /// Raw status code for diagnostics.
        status_code: u16,
        /// Parse error recorded when a 200 body was not valid JSON.
        detail: Option<String>,
    },
}

/// Error envelope embedded in HTTP 200 responses.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(rename = "violationList", default)]
    violation_list: Vec<Violation>,
    #[serde(rename = "targetObject", default)]
    target_object: Vec<Value>,
}

/// Maps a raw status code and body to an [`ApiOutcome`].
///
/// Evaluated in precedence: 403 first, then 200, then everything else.
pub fn classify(status_code: u16, raw_body: &str) -> ApiOutcome {
    match status_code {
        403 => ApiOutcome::PermissionDenied,
        200 => match serde_json::from_str::<Value>(raw_body) {
            Ok(body) => classify_ok_body(body),
            Err(e) => ApiOutcome::UnknownFailure {
                status_code,
                detail: Some(format!("invalid JSON in 200 response: {}", e)),
            },
        },
        other => ApiOutcome::UnknownFailure {
            status_code: other,
            detail: None,
        },
    }
}

fn classify_ok_body(body: Value) -> ApiOutcome {
    let flagged = matches!(
        body.get("error"),
        Some(flag) if !matches!(flag, Value::Null | Value::Bool(false))
    );
    if !flagged {
        return ApiOutcome::Success(body);
    }

    // Re-read through the envelope; a missing violationList still counts
    // as a validation failure with no itemized violations.
    let envelope: ErrorEnvelope = serde_json::from_value(body).unwrap_or(ErrorEnvelope {
        violation_list: Vec::new(),
        target_object: Vec::new(),
    });

    ApiOutcome::ValidationFailure {
        violations: envelope.violation_list,
        target_object: envelope.target_object.into_iter().next(),
    }
}

impl ApiOutcome {
    /// True only for [`ApiOutcome::Success`]. An empty-but-valid payload
    /// (for instance an empty list) still counts as success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Converts the outcome into a result, turning every non-success
    /// variant into its corresponding error.
    pub fn into_result(self) -> MyraResult<Value> {
        match self {
            Self::Success(payload) => Ok(payload),
            Self::ValidationFailure {
                violations,
                target_object,
            } => Err(MyraError::Validation {
                violations,
                target_object,
            }),
            Self::PermissionDenied => Err(MyraError::PermissionDenied),
            Self::UnknownFailure {
                status_code,
                detail,
            } => Err(MyraError::Unknown {
                status_code,
                detail,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn forbidden_ignores_the_body() {
        assert_eq!(classify(403, "not even json"), ApiOutcome::PermissionDenied);
        assert_eq!(classify(403, r#"{"error":true}"#), ApiOutcome::PermissionDenied);
    }

    #[test]
    fn clean_ok_is_success() {
        let outcome = classify(200, r#"{"ok":1}"#);
        assert_eq!(outcome, ApiOutcome::Success(json!({"ok": 1})));
        assert!(outcome.is_success());
    }

    #[test]
    fn empty_payload_still_counts_as_success() {
        let outcome = classify(200, r#"{"count":0,"pageSize":10,"list":[]}"#);
        assert!(outcome.is_success());
        assert!(outcome.into_result().is_ok());
    }

    #[test]
    fn error_envelope_becomes_validation_failure() {
        let body = r#"{
            "error": true,
            "violationList": [
                {"message": "invalid fqdn", "propertyPath": "fqdn"},
                {"message": "start after end", "propertyPath": "start"}
            ],
            "targetObject": [{"fqdn": "bad..name", "start": "2024-01-01T00:00:00+0100"}]
        }"#;
        match classify(200, body) {
            ApiOutcome::ValidationFailure {
                violations,
                target_object,
            } => {
                assert_eq!(violations.len(), 2);
                assert_eq!(violations[0].property_path, "fqdn");
                assert_eq!(violations[0].given_value(target_object.as_ref()), "bad..name");
                assert_eq!(violations[1].message, "start after end");
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn empty_violation_list_is_still_a_validation_failure() {
        let outcome = classify(200, r#"{"error":true,"violationList":[],"targetObject":[]}"#);
        assert!(matches!(
            outcome,
            ApiOutcome::ValidationFailure { ref violations, ref target_object }
                if violations.is_empty() && target_object.is_none()
        ));
    }

    #[test]
    fn absent_target_object_yields_placeholder() {
        let violation = Violation {
            message: "bad".into(),
            property_path: "resource".into(),
        };
        assert_eq!(violation.given_value(None), "N/A");
        let target = json!({"other": 1});
        assert_eq!(violation.given_value(Some(&target)), "N/A");
    }

    #[test]
    fn malformed_ok_body_degrades_to_unknown_failure() {
        match classify(200, "<html>gateway error</html>") {
            ApiOutcome::UnknownFailure {
                status_code,
                detail,
            } => {
                assert_eq!(status_code, 200);
                assert!(detail.unwrap().contains("invalid JSON"));
            }
            other => panic!("expected unknown failure, got {:?}", other),
        }
    }

    #[test_case(500)]
    #[test_case(404)]
    #[test_case(302)]
    #[test_case(201)]
    fn other_statuses_are_unknown_failures(status: u16) {
        assert_eq!(
            classify(status, "anything"),
            ApiOutcome::UnknownFailure {
                status_code: status,
                detail: None
            }
        );
    }

    #[test]
    fn into_result_maps_the_taxonomy() {
        assert!(matches!(
            classify(403, "").into_result(),
            Err(MyraError::PermissionDenied)
        ));
        assert!(matches!(
            classify(500, "").into_result(),
            Err(MyraError::Unknown { status_code: 500, .. })
        ));
        assert!(matches!(
            classify(200, r#"{"error":true,"violationList":[]}"#).into_result(),
            Err(MyraError::Validation { .. })
        ));
    }
}
