//! Myracloud API client: transport, URL composition, and dispatch.

use crate::config::{ApiMethod, ApiSettings, RequestOptions, RequestOptionsBuilder};
use crate::errors::{MyraError, MyraResult};
use crate::outcome::{classify, ApiOutcome};
use crate::pagination::ListEnvelope;
use crate::services::{
    CacheClearService, ErrorPagesService, MaintenanceService, StatisticService,
    SubdomainSettingService,
};
use crate::signing;
use reqwest::blocking::Client;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};

/// Raw result of one dispatched request: the numeric status code and the
/// unparsed body.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Raw response body.
    pub body: String,
}

/// Synchronous Myracloud API client.
///
/// Holds one reusable blocking transport, built once from the settings
/// and shared by every call. Each invocation performs exactly one
/// outbound request (or a bounded sequence of paginated LIST requests)
/// and blocks until it returns; no retries, no caching.
pub struct MyraClient {
    http: Client,
    settings: ApiSettings,
}

impl MyraClient {
    /// Creates a client from connection settings.
    ///
    /// `no_check_cert` disables TLS peer verification on the transport;
    /// `verbose` enables protocol tracing and nothing else.
    pub fn new(settings: ApiSettings) -> MyraResult<Self> {
        let http = Client::builder()
            .danger_accept_invalid_certs(settings.no_check_cert)
            .connection_verbose(settings.verbose)
            .build()?;

        Ok(Self { http, settings })
    }

    /// The settings this client was built from.
    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    /// Starts request options seeded from this client's settings.
    pub fn options(&self) -> RequestOptionsBuilder {
        RequestOptionsBuilder::from_settings(&self.settings)
    }

    // Service accessors

    /// Cache invalidation operations.
    pub fn cache_clear(&self) -> CacheClearService<'_> {
        CacheClearService::new(self)
    }

    /// Maintenance page operations.
    pub fn maintenance(&self) -> MaintenanceService<'_> {
        MaintenanceService::new(self)
    }

    /// Error page operations.
    pub fn error_pages(&self) -> ErrorPagesService<'_> {
        ErrorPagesService::new(self)
    }

    /// Statistics queries.
    pub fn statistic(&self) -> StatisticService<'_> {
        StatisticService::new(self)
    }

    /// Subdomain setting listings.
    pub fn subdomain_setting(&self) -> SubdomainSettingService<'_> {
        SubdomainSettingService::new(self)
    }

    // Dispatch pipeline

    /// Performs one HTTP call for the given options.
    ///
    /// Composes the language-prefixed URI (with the page suffix for LIST
    /// calls), signs the request, appends the `Authorization` header last,
    /// and returns the raw status and body. Transport failures surface as
    /// [`MyraError::Transport`]; no status code is ever retried.
    pub fn dispatch(&self, options: &RequestOptions, page: u32) -> MyraResult<RawResponse> {
        let uri = request_uri(options, page);
        let endpoint = format!("{}{}", options.api_endpoint, uri);

        let signature = signing::sign(
            options.method.as_str(),
            &uri,
            &options.secret,
            &options.headers,
            &options.content,
        );

        let mut headers = options.headers.clone();
        headers.append(
            AUTHORIZATION,
            HeaderValue::from_str(&signing::authorization_header(&options.api_key, &signature))
                .map_err(|e| MyraError::invalid("apiKey", e.to_string()))?,
        );

        let mut request = self
            .http
            .request(options.method.http_method(), &endpoint)
            .headers(headers);

        // A body travels only on non-LIST calls and only when non-empty.
        if !options.content.is_empty() && options.method != ApiMethod::List {
            request = request.body(options.content.clone());
        }

        debug!(method = %options.method, url = %endpoint, "dispatching API request");
        if options.verbose {
            trace!(uri = %uri, "request signed");
        }
        let response = request.send()?;

        let status_code = response.status().as_u16();
        let body = response.text()?;
        debug!(status = status_code, bytes = body.len(), "API response received");

        Ok(RawResponse { status_code, body })
    }

    /// Dispatches and classifies one call.
    pub fn perform(&self, options: &RequestOptions, page: u32) -> MyraResult<ApiOutcome> {
        let response = self.dispatch(options, page)?;
        Ok(classify(response.status_code, &response.body))
    }

    /// Dispatches, classifies, and unwraps into the success payload.
    pub(crate) fn execute(
        &self,
        method: ApiMethod,
        path: String,
        content: Option<String>,
        page: u32,
    ) -> MyraResult<Value> {
        let mut builder = self.options().method(method).path(path);
        if let Some(content) = content {
            builder = builder.content(content);
        }
        let options = builder.build()?;
        self.perform(&options, page)?.into_result()
    }

    /// LIST helper decoding the response into a typed envelope.
    pub(crate) fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        page: u32,
    ) -> MyraResult<ListEnvelope<T>> {
        let payload = self.execute(ApiMethod::List, path.to_string(), None, page)?;
        serde_json::from_value(payload).map_err(|e| MyraError::Unknown {
            status_code: 200,
            detail: Some(format!("unexpected list envelope: {}", e)),
        })
    }
}

/// Composes the path a request is sent to (and signed over):
/// `/{language}/rapi/{path}` with any leading slash stripped from `path`,
/// plus the `/{page}` suffix for LIST calls. Non-LIST calls ignore `page`.
pub fn request_uri(options: &RequestOptions, page: u32) -> String {
    let mut uri = format!(
        "/{}/rapi/{}",
        options.language,
        options.path.trim_start_matches('/')
    );
    if options.method == ApiMethod::List {
        uri.push_str(&format!("/{}", page));
    }
    uri
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn options(method: ApiMethod, path: &str) -> RequestOptions {
        RequestOptions::builder()
            .method(method)
            .path(path)
            .api_key("key")
            .secret("secret")
            .build()
            .unwrap()
    }

    #[test]
    fn list_uri_carries_language_prefix_and_page() {
        let options = options(ApiMethod::List, "maintenance/example.com");
        assert_eq!(request_uri(&options, 1), "/en/rapi/maintenance/example.com/1");
        assert_eq!(request_uri(&options, 7), "/en/rapi/maintenance/example.com/7");
    }

    #[test]
    fn non_list_uri_ignores_page() {
        let options = options(ApiMethod::Create, "cacheClear/example.com");
        assert_eq!(request_uri(&options, 1), "/en/rapi/cacheClear/example.com");
        assert_eq!(request_uri(&options, 9), "/en/rapi/cacheClear/example.com");
    }

    #[test]
    fn leading_slash_in_path_is_stripped() {
        let options = options(ApiMethod::Update, "/statistic/query");
        assert_eq!(request_uri(&options, 1), "/en/rapi/statistic/query");
    }

    #[test]
    fn client_construction_with_defaults() {
        let client = MyraClient::new(ApiSettings::new("key", "secret")).unwrap();
        assert_eq!(client.settings().language, "en");
    }
}
