//! Error types for the Myracloud client.

use crate::outcome::Violation;
use thiserror::Error;

/// Result type alias for Myracloud operations.
pub type MyraResult<T> = Result<T, MyraError>;

/// Errors surfaced by the request pipeline and the service layer.
///
/// Configuration errors are raised before any network call and always name
/// the offending field. Transport failures (DNS, connection refused, TLS)
/// are kept distinct from the HTTP-status taxonomy: a `Transport` error
/// means no status code was ever obtained.
#[derive(Error, Debug)]
pub enum MyraError {
    /// A required option was not supplied or was empty.
    #[error("missing required option `{field}`")]
    MissingOption {
        /// Name of the missing field.
        field: &'static str,
    },

    /// An option failed its declared normalizer or allowed-value check.
    #[error("invalid value for option `{field}`: {message}")]
    InvalidOption {
        /// Name of the offending field.
        field: &'static str,
        /// What was wrong with the value.
        message: String,
    },

    /// The request never produced an HTTP status code.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered HTTP 403.
    #[error("permission denied by the Myracloud API")]
    PermissionDenied,

    /// HTTP 200 carrying an error envelope with per-field violations.
    #[error("the API rejected the request with {} violation(s)", violations.len())]
    Validation {
        /// Field-level violations reported by the API.
        violations: Vec<Violation>,
        /// First entry of the response `targetObject`, when present. Used
        /// to look up the offending value per violation.
        target_object: Option<serde_json::Value>,
    },

    /// Any other status, or an unparseable success body.
    #[error("unexpected API response (HTTP {status_code})")]
    Unknown {
        /// Raw HTTP status code for diagnostics.
        status_code: u16,
        /// Parse error or other diagnostic detail, when available.
        detail: Option<String>,
    },

    /// More than one record matched a lookup that must be unique.
    #[error("found multiple records matching the given criteria")]
    AmbiguousMatch,

    /// A lookup that requires a match found none.
    #[error("could not find a record matching the given criteria")]
    NoMatch,
}

impl MyraError {
    /// Creates an `InvalidOption` error.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            field,
            message: message.into(),
        }
    }

    /// Returns true for errors raised before any network activity.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingOption { .. } | Self::InvalidOption { .. }
        )
    }
}
