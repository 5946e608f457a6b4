//! Sales dashboard SDK for Rust.
//!
//! Fetches transactional sales records from a record store, filters them with
//! a composable predicate and aggregates them into chart-ready series: sales
//! over time, totals per category, gender and category shares, and the age
//! distribution.
//!
//! Filtering can happen client-side (bulk fetch, in-memory predicate) or in
//! the store (json-server query operators, embedded DuckDB). The aggregates
//! are the same either way.
//!
//! # Quick start
//!
//! ```no_run
//! use sales_dashboard::{FilterSpec, SalesDashboard};
//!
//! let dashboard = SalesDashboard::builder()
//!     .base_url("http://localhost:3001")
//!     .build()
//!     .unwrap();
//!
//! let spec = FilterSpec::new().min_amount(60).date_range("2023-01-01", "2023-06-30");
//! let snapshot = dashboard.snapshot(&spec).unwrap();
//! for point in &snapshot.time_series {
//!     println!("{}: {}", point.date, point.total_amount);
//! }
//! ```
//!
//! The pure pipeline is usable without any source:
//!
//! ```
//! use sales_dashboard::{aggregate, filter, FilterPredicate, FilterSpec, SalesRecord};
//!
//! let records: Vec<SalesRecord> = serde_json::from_str(r#"[
//!   {"Transaction ID": 1, "Date": "2024-01-01", "Customer ID": "C1", "Gender": "Male",
//!    "Age": 20, "Product Category": "Beauty", "Quantity": 2,
//!    "Price per Unit": 50, "Total Amount": 100}
//! ]"#).unwrap();
//!
//! let predicate = FilterPredicate::compile(&FilterSpec::new().min_amount(60));
//! let kept = filter::filter_records(&records, &predicate);
//! let totals = aggregate::aggregate_by_category(kept);
//! assert_eq!(totals[0].category, "Beauty");
//! ```

pub mod aggregate;
#[cfg(feature = "async")]
pub mod async_client;
pub mod config;
pub mod connection;
pub mod error;
pub mod filter;
pub mod models;
pub mod sequence;
pub mod sources;
pub mod sql_builder;

#[cfg(feature = "async")]
pub use async_client::{AsyncSalesDashboard, AsyncSalesDashboardBuilder};
pub use connection::Connection;
pub use error::{DashboardError, Result};
pub use filter::FilterPredicate;
pub use models::{
    AgeBand, AgeBandTotal, CategoryTotal, DashboardSnapshot, FilterSpec, SaleDate, SalesRecord,
    ShareSlice, TimeSeriesPoint,
};
pub use sequence::{RequestSequencer, Ticket};
pub use sources::{RecordSource, SourceStrategy};
pub use sql_builder::SqlBuilder;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use sources::{FileSource, HttpSource, RemoteFilterSource, SqlSource, StaticSource};

// ---------------------------------------------------------------------------
// SalesDashboardBuilder
// ---------------------------------------------------------------------------

enum SourceKind {
    Http,
    File(PathBuf),
    Records(Vec<SalesRecord>),
    Custom(Box<dyn RecordSource>),
}

/// Builder for configuring and constructing a [`SalesDashboard`].
///
/// Use [`SalesDashboard::builder()`] to obtain a builder. Without any source
/// method the dashboard reads from the HTTP record store at
/// [`config::DEFAULT_BASE_URL`].
pub struct SalesDashboardBuilder {
    base_url: Option<String>,
    timeout: Duration,
    server_side_filtering: bool,
    kind: SourceKind,
}

impl Default for SalesDashboardBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: config::DEFAULT_TIMEOUT,
            server_side_filtering: false,
            kind: SourceKind::Http,
        }
    }
}

impl SalesDashboardBuilder {
    /// Read records from the HTTP record store at `url`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self.kind = SourceKind::Http;
        self
    }

    /// Like [`base_url`](Self::base_url), resolving the URL from
    /// [`config::BASE_URL_ENV`] with [`config::DEFAULT_BASE_URL`] as fallback.
    pub fn base_url_from_env(self) -> Self {
        self.base_url(config::base_url_from_env())
    }

    /// Set the HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Delegate filtering to the store instead of filtering in memory.
    ///
    /// For HTTP this sends json-server query operators; for files and
    /// in-memory records the data is loaded into DuckDB and filtered in SQL.
    pub fn server_side_filtering(mut self, enabled: bool) -> Self {
        self.server_side_filtering = enabled;
        self
    }

    /// Read records from a local JSON file (`.gz` allowed).
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.kind = SourceKind::File(path.as_ref().to_path_buf());
        self
    }

    /// Serve a fixed set of records.
    pub fn records(mut self, records: Vec<SalesRecord>) -> Self {
        self.kind = SourceKind::Records(records);
        self
    }

    /// Use a custom record source. `server_side_filtering` has no effect.
    pub fn source(mut self, source: Box<dyn RecordSource>) -> Self {
        self.kind = SourceKind::Custom(source);
        self
    }

    /// Build the dashboard.
    ///
    /// HTTP sources do not contact the store until the first fetch. File and
    /// record sources with server-side filtering load their data into DuckDB
    /// here.
    pub fn build(self) -> Result<SalesDashboard> {
        let source: Box<dyn RecordSource> = match self.kind {
            SourceKind::Http => {
                let base_url = self
                    .base_url
                    .unwrap_or_else(|| config::DEFAULT_BASE_URL.to_string());
                if self.server_side_filtering {
                    Box::new(RemoteFilterSource::new(base_url, self.timeout)?)
                } else {
                    Box::new(HttpSource::new(base_url, self.timeout)?)
                }
            }
            SourceKind::File(path) => {
                let file = FileSource::new(path);
                if self.server_side_filtering {
                    Box::new(SqlSource::from_source(&file)?)
                } else {
                    Box::new(file)
                }
            }
            SourceKind::Records(records) => {
                if self.server_side_filtering {
                    Box::new(SqlSource::new(&records)?)
                } else {
                    Box::new(StaticSource::new(records))
                }
            }
            SourceKind::Custom(source) => source,
        };
        Ok(SalesDashboard { source })
    }
}

// ---------------------------------------------------------------------------
// SalesDashboard
// ---------------------------------------------------------------------------

/// Orchestrates fetch, filter and aggregation over one record source.
///
/// Chart accessors (`snapshot`, `time_series`, ...) ignore the spec's
/// `category`, since the charts always show every category. [`records`]
/// applies the full spec.
///
/// [`records`]: SalesDashboard::records
pub struct SalesDashboard {
    source: Box<dyn RecordSource>,
}

impl SalesDashboard {
    /// Create a new builder for configuring the dashboard.
    pub fn builder() -> SalesDashboardBuilder {
        SalesDashboardBuilder::default()
    }

    /// Wrap an existing source.
    pub fn with_source(source: Box<dyn RecordSource>) -> Self {
        Self { source }
    }

    /// Records admitted by the full spec, category included.
    pub fn records(&self, spec: &FilterSpec) -> Result<Vec<SalesRecord>> {
        self.source.fetch_filtered(spec)
    }

    /// Every chart for one filter state, computed from a single fetch.
    pub fn snapshot(&self, spec: &FilterSpec) -> Result<DashboardSnapshot> {
        let records = self.chart_records(spec)?;
        let refs: Vec<&SalesRecord> = records.iter().collect();
        Ok(aggregate::aggregate_all(&refs))
    }

    /// Sales over time (line chart).
    pub fn time_series(&self, spec: &FilterSpec) -> Result<Vec<TimeSeriesPoint>> {
        Ok(aggregate::aggregate_by_date(&self.chart_records(spec)?))
    }

    /// Sales by product category (bar chart).
    pub fn category_totals(&self, spec: &FilterSpec) -> Result<Vec<CategoryTotal>> {
        Ok(aggregate::aggregate_by_category(&self.chart_records(spec)?))
    }

    /// Sales split by gender (pie chart).
    pub fn gender_shares(&self, spec: &FilterSpec) -> Result<Vec<ShareSlice>> {
        Ok(aggregate::aggregate_by_gender(&self.chart_records(spec)?))
    }

    /// Sales split by product category (pie chart).
    pub fn category_shares(&self, spec: &FilterSpec) -> Result<Vec<ShareSlice>> {
        Ok(aggregate::aggregate_by_category_share(&self.chart_records(spec)?))
    }

    /// Age distribution, always five bands.
    pub fn age_distribution(&self, spec: &FilterSpec) -> Result<Vec<AgeBandTotal>> {
        Ok(aggregate::aggregate_by_age_band(&self.chart_records(spec)?))
    }

    /// The record source in use.
    pub fn source(&self) -> &dyn RecordSource {
        self.source.as_ref()
    }

    pub fn strategy(&self) -> SourceStrategy {
        self.source.strategy()
    }

    fn chart_records(&self, spec: &FilterSpec) -> Result<Vec<SalesRecord>> {
        self.source.fetch_filtered(&spec.clone().without_category())
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for SalesDashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SalesDashboard(source={}, strategy={})",
            self.source.describe(),
            self.source.strategy()
        )
    }
}
