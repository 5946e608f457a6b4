//! Record sources backed by a json-server style HTTP endpoint.
//!
//! [`HttpSource`] fetches the whole collection and filters in memory.
//! [`RemoteFilterSource`] sends the filter as json-server query operators and
//! narrows the returned subset with the same predicate, so both produce the
//! same records for the same data.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::config;
use crate::error::{DashboardError, Result};
use crate::filter::FilterPredicate;
use crate::models::{records_from_payload, FilterSpec, SalesRecord};
use crate::sources::{RecordSource, SourceStrategy};

// ---------------------------------------------------------------------------
// HttpSource
// ---------------------------------------------------------------------------

/// Bulk fetch of `GET {base_url}/salesData`, filtered client-side.
pub struct HttpSource {
    base_url: String,
    client: Client,
}

impl HttpSource {
    /// Create a source for the given record store base URL.
    ///
    /// `timeout` bounds each request end to end.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(DashboardError::InvalidArgument(
                "record store base URL is empty".into(),
            ));
        }
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET` the sales collection with optional query parameters.
    fn get_records(&self, query: &[(String, String)]) -> Result<Vec<SalesRecord>> {
        let url = config::collection_url(&self.base_url);
        debug!(url = %url, params = query.len(), "fetching sales records");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .and_then(|r| r.error_for_status());
        let response = match response {
            Ok(r) => r,
            Err(e) => {
                warn!("Failed to fetch sales records from {}: {}", url, e);
                return Err(e.into());
            }
        };

        let payload: serde_json::Value = response.json()?;
        let records = records_from_payload(payload)?;
        debug!(count = records.len(), "fetched sales records");
        Ok(records)
    }
}

impl RecordSource for HttpSource {
    fn fetch_all(&self) -> Result<Vec<SalesRecord>> {
        self.get_records(&[])
    }

    fn describe(&self) -> String {
        format!("http({})", config::collection_url(&self.base_url))
    }
}

// ---------------------------------------------------------------------------
// RemoteFilterSource
// ---------------------------------------------------------------------------

/// Filtered fetch: the record store applies the filter.
///
/// Requires ISO `YYYY-MM-DD...` dates on the server, since json-server compares
/// them as strings.
pub struct RemoteFilterSource {
    inner: HttpSource,
}

impl RemoteFilterSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            inner: HttpSource::new(base_url, timeout)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }
}

impl RecordSource for RemoteFilterSource {
    fn fetch_all(&self) -> Result<Vec<SalesRecord>> {
        self.inner.fetch_all()
    }

    fn fetch_filtered(&self, spec: &FilterSpec) -> Result<Vec<SalesRecord>> {
        let predicate = FilterPredicate::compile(spec);
        let records = self.inner.get_records(&remote_query(&predicate))?;
        Ok(predicate.retain(records))
    }

    fn strategy(&self) -> SourceStrategy {
        SourceStrategy::ServerFilter
    }

    fn describe(&self) -> String {
        format!(
            "http-filtered({})",
            config::collection_url(self.inner.base_url())
        )
    }
}

/// Translate a predicate into json-server query operators.
///
/// The result may admit more records than the predicate, never fewer: every
/// decoded record date starts with its `YYYY-MM-DD` calendar date (padded
/// dates are rejected by [`SaleDate::parse`](crate::models::SaleDate::parse)),
/// so the store's string comparison agrees with the calendar comparison.
pub fn remote_query(predicate: &FilterPredicate) -> Vec<(String, String)> {
    let mut query = Vec::new();

    if let Some(min) = predicate.min_amount {
        query.push((format!("{}_gte", config::FIELD_TOTAL_AMOUNT), min.to_string()));
    }
    if let Some(max) = predicate.max_amount {
        query.push((format!("{}_lte", config::FIELD_TOTAL_AMOUNT), max.to_string()));
    }
    if let Some(start) = predicate.start_date {
        query.push((
            format!("{}_gte", config::FIELD_DATE),
            start.format("%Y-%m-%d").to_string(),
        ));
    }
    if let Some(end) = predicate.end_date {
        // '~' sorts after any time suffix, so the whole end day is kept.
        query.push((
            format!("{}_lte", config::FIELD_DATE),
            format!("{}~", end.format("%Y-%m-%d")),
        ));
    }
    for category in &predicate.categories {
        query.push((config::FIELD_PRODUCT_CATEGORY.to_string(), category.clone()));
    }

    query
}
