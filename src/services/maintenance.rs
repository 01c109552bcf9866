//! Maintenance page management.
//!
//! Create, update, delete, and list maintenance pages. Updates and
//! deletions identify the affected record by its (start, end, fqdn)
//! triple, looked up across all listing pages; the lookup must be unique.

use crate::client::MyraClient;
use crate::config::normalize::{format_iso8601, normalize_fqdn};
use crate::config::ApiMethod;
use crate::errors::{MyraError, MyraResult};
use crate::pagination::{find_unique, ListEnvelope};
use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Operations a maintenance-style command may request. Closed
/// enumeration: anything else fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Enqueue a new maintenance page.
    Create,
    /// Change an existing maintenance page.
    Update,
    /// Remove an existing maintenance page.
    Delete,
    /// List maintenance pages.
    List,
}

impl FromStr for Operation {
    type Err = MyraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "list" => Ok(Self::List),
            other => Err(MyraError::invalid(
                "operation",
                format!("`{}` is not one of create, update, delete, list", other),
            )),
        }
    }
}

/// One maintenance page as returned by the listing.
#[derive(Debug, Clone, Deserialize)]
pub struct MaintenanceRecord {
    /// Server-assigned identifier, echoed back on update/delete.
    #[serde(default)]
    pub id: Value,
    /// Creation timestamp.
    #[serde(default)]
    pub created: Option<String>,
    /// Last-modified timestamp, echoed back on update/delete.
    #[serde(default)]
    pub modified: Option<String>,
    /// Domain the page belongs to.
    #[serde(default)]
    pub fqdn: String,
    /// Scheduled start, ISO-8601.
    #[serde(default)]
    pub start: Option<String>,
    /// Scheduled end, ISO-8601.
    #[serde(default)]
    pub end: Option<String>,
    /// Whether the page is currently active.
    #[serde(default)]
    pub active: Option<bool>,
}

impl MaintenanceRecord {
    /// True when this record is identified by the given selector.
    ///
    /// A record field that is empty or absent matches only an absent
    /// selector value; a present field must match the formatted selector
    /// exactly. The fqdn must always match.
    fn matches(&self, fqdn: &str, start: Option<&str>, end: Option<&str>) -> bool {
        let field_matches = |field: &Option<String>, selector: Option<&str>| match field {
            Some(value) if !value.is_empty() => Some(value.as_str()) == selector,
            _ => selector.is_none(),
        };

        field_matches(&self.start, start) && field_matches(&self.end, end) && self.fqdn == fqdn
    }
}

#[derive(Debug, Serialize)]
struct CreateRequest<'a> {
    content: &'a str,
    start: String,
    end: String,
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    id: &'a Value,
    modified: &'a str,
    start: String,
    end: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct DeleteRequest<'a> {
    id: &'a Value,
    modified: &'a str,
}

/// Maintenance page operations.
pub struct MaintenanceService<'a> {
    client: &'a MyraClient,
}

impl<'a> MaintenanceService<'a> {
    pub(crate) fn new(client: &'a MyraClient) -> Self {
        Self { client }
    }

    fn path(fqdn: &str) -> String {
        format!("maintenance/{}", normalize_fqdn(fqdn))
    }

    /// Lists one page of maintenance records.
    pub fn list(&self, fqdn: &str, page: u32) -> MyraResult<ListEnvelope<MaintenanceRecord>> {
        self.client.list(&Self::path(fqdn), page)
    }

    /// Enqueues a new maintenance page with the given HTML content and
    /// schedule.
    pub fn create(
        &self,
        fqdn: &str,
        content: &str,
        start: &DateTime<Tz>,
        end: &DateTime<Tz>,
    ) -> MyraResult<Value> {
        let body = CreateRequest {
            content,
            start: format_iso8601(start),
            end: format_iso8601(end),
        };
        self.send(ApiMethod::Create, fqdn, &body)
    }

    /// Updates the maintenance page identified by (start, end, fqdn).
    ///
    /// At least one of `new_start`, `new_end`, `new_content` must be
    /// given; dates not being changed keep their selector value.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &self,
        fqdn: &str,
        start: Option<&DateTime<Tz>>,
        end: Option<&DateTime<Tz>>,
        new_start: Option<&DateTime<Tz>>,
        new_end: Option<&DateTime<Tz>>,
        new_content: Option<&str>,
    ) -> MyraResult<Value> {
        if new_start.is_none() && new_end.is_none() && new_content.is_none() {
            return Err(MyraError::invalid("operation", "there is nothing to change"));
        }

        let record = self.require(fqdn, start, end)?;
        let body = UpdateRequest {
            id: &record.id,
            modified: record.modified.as_deref().unwrap_or_default(),
            start: format_iso8601(new_start.or(start).ok_or(MyraError::MissingOption {
                field: "start",
            })?),
            end: format_iso8601(new_end.or(end).ok_or(MyraError::MissingOption {
                field: "end",
            })?),
            content: new_content,
        };
        self.send(ApiMethod::Update, fqdn, &body)
    }

    /// Deletes the maintenance page identified by (start, end, fqdn).
    pub fn delete(
        &self,
        fqdn: &str,
        start: Option<&DateTime<Tz>>,
        end: Option<&DateTime<Tz>>,
    ) -> MyraResult<Value> {
        let record = self.require(fqdn, start, end)?;
        let body = DeleteRequest {
            id: &record.id,
            modified: record.modified.as_deref().unwrap_or_default(),
        };
        self.send(ApiMethod::Delete, fqdn, &body)
    }

    /// Scans all listing pages for the record matching (start, end, fqdn).
    ///
    /// Returns `Ok(None)` when nothing matches; more than one match is a
    /// logic error rather than a silent pick.
    pub fn find(
        &self,
        fqdn: &str,
        start: Option<&DateTime<Tz>>,
        end: Option<&DateTime<Tz>>,
    ) -> MyraResult<Option<MaintenanceRecord>> {
        let fqdn = normalize_fqdn(fqdn);
        let start = start.map(format_iso8601);
        let end = end.map(format_iso8601);

        find_unique(
            |page| self.list(&fqdn, page),
            |record| record.matches(&fqdn, start.as_deref(), end.as_deref()),
        )
    }

    fn require(
        &self,
        fqdn: &str,
        start: Option<&DateTime<Tz>>,
        end: Option<&DateTime<Tz>>,
    ) -> MyraResult<MaintenanceRecord> {
        self.find(fqdn, start, end)?.ok_or(MyraError::NoMatch)
    }

    fn send(&self, method: ApiMethod, fqdn: &str, body: &impl Serialize) -> MyraResult<Value> {
        let content = serde_json::to_string(body)
            .map_err(|e| MyraError::invalid("content", e.to_string()))?;
        self.client
            .execute(method, Self::path(fqdn), Some(content), 1)
    }
}
