//! Error page management.
//!
//! Error pages are assigned per domain and per status code through a
//! selection map `{fqdn: {code: bool}}` spanning the full set of
//! assignable codes; codes outside that set fail validation.

use crate::client::MyraClient;
use crate::config::normalize::normalize_fqdn;
use crate::config::ApiMethod;
use crate::errors::{MyraError, MyraResult};
use serde_json::{json, Map, Value};
use std::str::FromStr;

/// Status codes an error page can be assigned to.
pub const AVAILABLE_ERROR_CODES: [u16; 5] = [429, 500, 502, 503, 504];

/// Operations on error pages. Closed enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPagesOperation {
    /// Upload an error page for the selected codes.
    Upload,
    /// Remove the error page assignment for the selected codes.
    Delete,
}

impl FromStr for ErrorPagesOperation {
    type Err = MyraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upload" => Ok(Self::Upload),
            "delete" => Ok(Self::Delete),
            other => Err(MyraError::invalid(
                "operation",
                format!("`{}` is not one of upload, delete", other),
            )),
        }
    }
}

/// Parses a comma-separated code list against the closed code set.
pub fn normalize_error_codes(field: &'static str, value: &str) -> MyraResult<Vec<u16>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let code: u16 = part
                .parse()
                .map_err(|_| MyraError::invalid(field, format!("`{}` is not an integer", part)))?;
            if !AVAILABLE_ERROR_CODES.contains(&code) {
                return Err(MyraError::invalid(
                    field,
                    format!("`{}` is not an assignable error code", code),
                ));
            }
            Ok(code)
        })
        .collect()
}

/// Error page operations.
pub struct ErrorPagesService<'a> {
    client: &'a MyraClient,
}

impl<'a> ErrorPagesService<'a> {
    pub(crate) fn new(client: &'a MyraClient) -> Self {
        Self { client }
    }

    /// Uploads an error page for `fqdn`, assigned to `codes`.
    pub fn upload(&self, fqdn: &str, codes: &[u16], page_content: &str) -> MyraResult<Value> {
        let fqdn = normalize_fqdn(fqdn);
        let codes = validated(codes)?;
        let body = json!({
            "selection": selection(&fqdn, &codes),
            "pageContent": page_content,
        });
        self.send(ApiMethod::Update, &fqdn, body)
    }

    /// Removes the error page assignment for `codes` on `fqdn`.
    pub fn delete(&self, fqdn: &str, codes: &[u16]) -> MyraResult<Value> {
        let fqdn = normalize_fqdn(fqdn);
        let codes = validated(codes)?;
        let body = json!({ "selection": selection(&fqdn, &codes) });
        self.send(ApiMethod::Delete, &fqdn, body)
    }

    fn send(&self, method: ApiMethod, fqdn: &str, body: Value) -> MyraResult<Value> {
        self.client.execute(
            method,
            format!("errorpages/{}", fqdn),
            Some(body.to_string()),
            1,
        )
    }
}

fn validated(codes: &[u16]) -> MyraResult<Vec<u16>> {
    for code in codes {
        if !AVAILABLE_ERROR_CODES.contains(code) {
            return Err(MyraError::invalid(
                "errorCodes",
                format!("`{}` is not an assignable error code", code),
            ));
        }
    }
    Ok(codes.to_vec())
}

/// Builds the per-domain selection map: every assignable code appears,
/// flagged true when selected.
fn selection(fqdn: &str, codes: &[u16]) -> Value {
    let mut flags = Map::new();
    for code in AVAILABLE_ERROR_CODES {
        flags.insert(code.to_string(), Value::Bool(codes.contains(&code)));
    }
    let mut map = Map::new();
    map.insert(fqdn.to_string(), Value::Object(flags));
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn selection_spans_the_full_code_set() {
        assert_eq!(
            selection("example.com", &[429, 503]),
            json!({
                "example.com": {
                    "429": true,
                    "500": false,
                    "502": false,
                    "503": true,
                    "504": false,
                }
            })
        );
    }

    #[test]
    fn code_list_parsing() {
        assert_eq!(
            normalize_error_codes("errorCodes", "429, 500,504").unwrap(),
            vec![429, 500, 504]
        );
        assert_eq!(normalize_error_codes("errorCodes", "").unwrap(), Vec::<u16>::new());
    }

    #[test]
    fn codes_outside_the_closed_set_fail() {
        assert!(normalize_error_codes("errorCodes", "404").is_err());
        assert!(normalize_error_codes("errorCodes", "429,505").is_err());
        assert!(normalize_error_codes("errorCodes", "abc").is_err());
        assert!(validated(&[429, 505]).is_err());
    }

    #[test]
    fn operation_parsing_is_a_closed_set() {
        assert_eq!(
            "upload".parse::<ErrorPagesOperation>().unwrap(),
            ErrorPagesOperation::Upload
        );
        assert!("replace".parse::<ErrorPagesOperation>().is_err());
    }
}
