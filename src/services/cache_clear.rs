//! Cache invalidation.

use crate::client::MyraClient;
use crate::config::normalize::normalize_fqdn;
use crate::config::ApiMethod;
use crate::errors::{MyraError, MyraResult};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
struct CacheClearRequest<'a> {
    fqdn: &'a str,
    resource: Option<&'a str>,
    recursive: bool,
}

/// Cache clear operations for a protected domain.
pub struct CacheClearService<'a> {
    client: &'a MyraClient,
}

impl<'a> CacheClearService<'a> {
    pub(crate) fn new(client: &'a MyraClient) -> Self {
        Self { client }
    }

    /// Clears cached objects for `fqdn`.
    ///
    /// `resource` is a cleanup rule describing which files to remove from
    /// the cache (`None` clears everything); `recursive` applies the rule
    /// to nested paths.
    pub fn clear(&self, fqdn: &str, resource: Option<&str>, recursive: bool) -> MyraResult<Value> {
        let fqdn = normalize_fqdn(fqdn);
        let body = CacheClearRequest {
            fqdn: &fqdn,
            resource,
            recursive,
        };
        let content = serde_json::to_string(&body)
            .map_err(|e| MyraError::invalid("content", e.to_string()))?;

        self.client
            .execute(ApiMethod::Create, format!("cacheClear/{}", fqdn), Some(content), 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let body = CacheClearRequest {
            fqdn: "example.com",
            resource: Some("*.css"),
            recursive: true,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"fqdn":"example.com","resource":"*.css","recursive":true}"#
        );
    }

    #[test]
    fn absent_rule_serializes_as_null() {
        let body = CacheClearRequest {
            fqdn: "example.com",
            resource: None,
            recursive: false,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"fqdn":"example.com","resource":null,"recursive":false}"#
        );
    }
}
