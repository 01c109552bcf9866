//! Traffic statistics queries.

use crate::client::MyraClient;
use crate::config::normalize::{format_iso8601, normalize_fqdn};
use crate::config::ApiMethod;
use crate::errors::{MyraError, MyraResult};
use chrono::DateTime;
use chrono_tz::Tz;
use serde_json::{json, Value};

/// KPI data sources requested with every statistics query.
const KPI_SOURCES: [&str; 7] = [
    "requests",
    "requests_cached",
    "requests_uncached",
    "bytes",
    "requests_blocked",
    "upstream_performance",
    "response_codes",
];

/// Statistics queries.
pub struct StatisticService<'a> {
    client: &'a MyraClient,
}

impl<'a> StatisticService<'a> {
    pub(crate) fn new(client: &'a MyraClient) -> Self {
        Self { client }
    }

    /// Queries hourly KPI statistics for `fqdn` between `start` and `end`.
    ///
    /// Both dates are required; the result payload carries one `result`
    /// entry per KPI data source (`{source}_stats`).
    pub fn query(
        &self,
        fqdn: &str,
        start: Option<&DateTime<Tz>>,
        end: Option<&DateTime<Tz>>,
    ) -> MyraResult<Value> {
        let start = start.ok_or(MyraError::MissingOption { field: "startDate" })?;
        let end = end.ok_or(MyraError::MissingOption { field: "endDate" })?;
        let fqdn = normalize_fqdn(fqdn);

        let body = json!({
            "query": {
                "startDate": format_iso8601(start),
                "endDate": format_iso8601(end),
                "type": "fqdn",
                "fqdn": [format!("ALL:{}", fqdn)],
                "aggregationInterval": "hour",
                "dataSources": kpi_data_sources(),
            }
        });

        self.client.execute(
            ApiMethod::Update,
            "statistic/query".to_string(),
            Some(body.to_string()),
            1,
        )
    }
}

fn kpi_data_sources() -> Value {
    let mut sources = serde_json::Map::new();
    for source in KPI_SOURCES {
        sources.insert(
            format!("{}_stats", source),
            json!({ "source": source, "type": "stats" }),
        );
    }
    Value::Object(sources)
}
