//! Request configuration: API methods, client settings, and the validated
//! per-call `RequestOptions` value.

pub mod normalize;

use crate::errors::{MyraError, MyraResult};
use chrono::DateTime;
use chrono_tz::Europe::Berlin;
use chrono_tz::Tz;
use self::normalize::format_header_date;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, DATE};
use reqwest::Method;
use std::fmt;
use url::Url;

/// Default production API endpoint.
pub const DEFAULT_API_ENDPOINT: &str = "https://api.myracloud.com";

/// Default API language.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Logical API operations and their HTTP methods.
///
/// The API maps its verbs onto HTTP unconventionally: CREATE is `PUT` and
/// UPDATE is `POST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    /// Create a resource (`PUT`).
    Create,
    /// Update a resource (`POST`).
    Update,
    /// Delete a resource (`DELETE`).
    Delete,
    /// List resources (`GET`); the only paginated operation.
    List,
}

impl ApiMethod {
    /// The HTTP method name as it takes part in signing.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "PUT",
            Self::Update => "POST",
            Self::Delete => "DELETE",
            Self::List => "GET",
        }
    }

    /// The reqwest method for dispatch.
    pub fn http_method(&self) -> Method {
        match self {
            Self::Create => Method::PUT,
            Self::Update => Method::POST,
            Self::Delete => Method::DELETE,
            Self::List => Method::GET,
        }
    }
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection settings shared by every call a [`crate::MyraClient`] makes.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// API key identifying the caller.
    pub api_key: String,
    /// Shared secret used for request signing.
    pub secret: String,
    /// Base URL of the API.
    pub api_endpoint: String,
    /// Two-letter API language code.
    pub language: String,
    /// Skip TLS peer verification.
    pub no_check_cert: bool,
    /// Enable transport-level protocol tracing. Logging concern only;
    /// never changes the result of a call.
    pub verbose: bool,
}

impl ApiSettings {
    /// Creates settings with the production endpoint and default language.
    pub fn new(api_key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret: secret.into(),
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            no_check_cert: false,
            verbose: false,
        }
    }

    /// Sets the API endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.api_endpoint = endpoint.into();
        self
    }

    /// Sets the API language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Disables TLS peer verification.
    pub fn without_cert_check(mut self) -> Self {
        self.no_check_cert = true;
        self
    }

    /// Enables transport protocol tracing.
    pub fn with_verbose(mut self) -> Self {
        self.verbose = true;
        self
    }
}

/// A validated, normalized request configuration.
///
/// Built once per call through [`RequestOptionsBuilder`] and never
/// mutated afterwards. The `Date` header holds one canonical instant per
/// request, generated at build time and reused for both signing and
/// transmission.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Logical operation.
    pub method: ApiMethod,
    /// Resource-relative path, e.g. `cacheClear/example.com`.
    pub path: String,
    /// API key identifying the caller.
    pub api_key: String,
    /// Shared signing secret.
    pub secret: String,
    /// Two-letter API language code.
    pub language: String,
    /// Base URL, guaranteed free of a trailing slash.
    pub api_endpoint: String,
    /// Request headers; always carries `Date` and `Content-Type`.
    pub headers: HeaderMap,
    /// JSON-encoded body, empty exactly when `method` is LIST or the call
    /// carries no body.
    pub content: String,
    /// Skip TLS peer verification.
    pub no_check_cert: bool,
    /// Transport protocol tracing flag.
    pub verbose: bool,
}

impl RequestOptions {
    /// Starts building request options.
    pub fn builder() -> RequestOptionsBuilder {
        RequestOptionsBuilder::new()
    }
}

/// Builder collecting raw candidate values for [`RequestOptions`].
///
/// Validation happens in [`build`](Self::build): missing required fields
/// and values failing their normalizer surface as configuration errors
/// naming the field.
#[derive(Debug, Default)]
pub struct RequestOptionsBuilder {
    method: Option<ApiMethod>,
    path: Option<String>,
    api_key: Option<String>,
    secret: Option<String>,
    language: Option<String>,
    api_endpoint: Option<String>,
    content: Option<String>,
    no_check_cert: bool,
    verbose: bool,
    date: Option<DateTime<Tz>>,
}

impl RequestOptionsBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds credentials, endpoint, language, and transport flags from
    /// client settings.
    pub fn from_settings(settings: &ApiSettings) -> Self {
        Self {
            api_key: Some(settings.api_key.clone()),
            secret: Some(settings.secret.clone()),
            language: Some(settings.language.clone()),
            api_endpoint: Some(settings.api_endpoint.clone()),
            no_check_cert: settings.no_check_cert,
            verbose: settings.verbose,
            ..Self::default()
        }
    }

    /// Sets the logical operation. Required.
    pub fn method(mut self, method: ApiMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the resource-relative path. Required, non-empty.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the API key. Required, non-empty.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the signing secret. Required, non-empty.
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Sets the API language (two-letter code).
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the API endpoint.
    pub fn api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.api_endpoint = Some(endpoint.into());
        self
    }

    /// Sets the JSON body.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Disables TLS peer verification.
    pub fn no_check_cert(mut self, no_check_cert: bool) -> Self {
        self.no_check_cert = no_check_cert;
        self
    }

    /// Enables transport protocol tracing.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Pins the request instant instead of sampling the clock at build
    /// time. Useful for reproducible signatures.
    pub fn date(mut self, date: DateTime<Tz>) -> Self {
        self.date = Some(date);
        self
    }

    /// Validates and normalizes the collected values.
    pub fn build(self) -> MyraResult<RequestOptions> {
        let method = self.method.ok_or(MyraError::MissingOption { field: "method" })?;
        let path = required_non_empty("path", self.path)?;
        let api_key = required_non_empty("apiKey", self.api_key)?;
        let secret = required_non_empty("secret", self.secret)?;

        let language = self.language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        if language.len() != 2 || !language.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(MyraError::invalid(
                "language",
                format!("`{}` is not a two-letter locale code", language),
            ));
        }

        let api_endpoint = normalize_endpoint(
            self.api_endpoint
                .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string()),
        )?;

        // A body must never travel with a LIST call, even when supplied.
        let content = match method {
            ApiMethod::List => String::new(),
            _ => self.content.unwrap_or_default(),
        };

        let date = self
            .date
            .unwrap_or_else(|| chrono::Utc::now().with_timezone(&Berlin));
        let mut headers = HeaderMap::new();
        headers.insert(
            DATE,
            HeaderValue::from_str(&format_header_date(&date))
                .map_err(|e| MyraError::invalid("date", e.to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(RequestOptions {
            method,
            path,
            api_key,
            secret,
            language,
            api_endpoint,
            headers,
            content,
            no_check_cert: self.no_check_cert,
            verbose: self.verbose,
        })
    }
}

fn required_non_empty(field: &'static str, value: Option<String>) -> MyraResult<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(MyraError::MissingOption { field }),
    }
}

fn normalize_endpoint(endpoint: String) -> MyraResult<String> {
    Url::parse(&endpoint)
        .map_err(|e| MyraError::invalid("apiEndpoint", e.to_string()))?;
    Ok(endpoint.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::last_header_value;
    use chrono::TimeZone;

    fn minimal() -> RequestOptionsBuilder {
        RequestOptions::builder()
            .method(ApiMethod::Create)
            .path("cacheClear/example.com")
            .api_key("key")
            .secret("secret")
    }

    #[test]
    fn method_to_http_mapping() {
        assert_eq!(ApiMethod::Create.as_str(), "PUT");
        assert_eq!(ApiMethod::Update.as_str(), "POST");
        assert_eq!(ApiMethod::Delete.as_str(), "DELETE");
        assert_eq!(ApiMethod::List.as_str(), "GET");
    }

    #[test]
    fn missing_required_fields_name_the_field() {
        let err = RequestOptions::builder()
            .method(ApiMethod::List)
            .api_key("k")
            .secret("s")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("path"));

        let err = RequestOptions::builder()
            .method(ApiMethod::List)
            .path("maintenance/example.com")
            .secret("s")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("apiKey"));
    }

    #[test]
    fn empty_credentials_are_missing() {
        let err = minimal().secret("").build().unwrap_err();
        assert!(matches!(err, MyraError::MissingOption { field: "secret" }));
    }

    #[test]
    fn defaults_applied() {
        let options = minimal().build().unwrap();
        assert_eq!(options.language, "en");
        assert_eq!(options.api_endpoint, "https://api.myracloud.com");
        assert_eq!(
            last_header_value(&options.headers, "Content-Type"),
            "application/json"
        );
        assert!(!last_header_value(&options.headers, "Date").is_empty());
    }

    #[test]
    fn endpoint_loses_trailing_slash() {
        let options = minimal()
            .api_endpoint("https://staging.myracloud.com/")
            .build()
            .unwrap();
        assert_eq!(options.api_endpoint, "https://staging.myracloud.com");
    }

    #[test]
    fn bad_endpoint_is_a_configuration_error() {
        let err = minimal().api_endpoint("not a url").build().unwrap_err();
        assert!(err.to_string().contains("apiEndpoint"));
    }

    #[test]
    fn bad_language_is_a_configuration_error() {
        assert!(minimal().language("english").build().is_err());
        assert!(minimal().language("EN").build().is_err());
        assert!(minimal().language("de").build().is_ok());
    }

    #[test]
    fn list_calls_never_keep_a_body() {
        let options = minimal()
            .method(ApiMethod::List)
            .content(r#"{"ignored":true}"#)
            .build()
            .unwrap();
        assert_eq!(options.content, "");
    }

    #[test]
    fn pinned_date_lands_in_the_header() {
        let date = Berlin.with_ymd_and_hms(2024, 6, 15, 12, 30, 45).unwrap();
        let options = minimal().date(date).build().unwrap();
        assert_eq!(
            last_header_value(&options.headers, "Date"),
            "2024-06-15T12:30:45+02:00"
        );
    }

    #[test]
    fn settings_seed_the_builder() {
        let settings = ApiSettings::new("k", "s")
            .with_endpoint("https://staging.myracloud.com/")
            .with_language("de")
            .without_cert_check();
        let options = RequestOptionsBuilder::from_settings(&settings)
            .method(ApiMethod::List)
            .path("subdomainSetting/example.com")
            .build()
            .unwrap();
        assert_eq!(options.api_key, "k");
        assert_eq!(options.language, "de");
        assert_eq!(options.api_endpoint, "https://staging.myracloud.com");
        assert!(options.no_check_cert);
    }
}
