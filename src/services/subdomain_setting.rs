//! Subdomain setting listings.

use crate::client::MyraClient;
use crate::config::normalize::normalize_fqdn;
use crate::config::ApiMethod;
use crate::errors::MyraResult;
use serde_json::Value;

/// Subdomain setting operations. List only; settings are written through
/// other channels.
pub struct SubdomainSettingService<'a> {
    client: &'a MyraClient,
}

impl<'a> SubdomainSettingService<'a> {
    pub(crate) fn new(client: &'a MyraClient) -> Self {
        Self { client }
    }

    /// Lists the settings of a subdomain.
    ///
    /// The payload shape is setting-specific, so it is returned as raw
    /// JSON for the caller to render.
    pub fn list(&self, fqdn: &str, page: u32) -> MyraResult<Value> {
        let fqdn = normalize_fqdn(fqdn);
        self.client.execute(
            ApiMethod::List,
            format!("subdomainSetting/{}", fqdn),
            None,
            page,
        )
    }
}
