//! Async wrapper around [`SalesDashboard`] for use in async runtimes (Tokio, etc.).
//!
//! Every operation runs on the blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the event loop free while the
//! record source does its blocking I/O.
//!
//! Refreshes follow last-request-wins: when a filter change starts a new
//! refresh while an older one is still in flight, the older result is
//! discarded instead of overwriting the newer one.
//!
//! # Example
//!
//! ```no_run
//! use sales_dashboard::{AsyncSalesDashboard, FilterSpec};
//!
//! #[tokio::main]
//! async fn main() {
//!     let dashboard = AsyncSalesDashboard::builder()
//!         .base_url("http://localhost:3001")
//!         .build()
//!         .await
//!         .unwrap();
//!
//!     if let Some(snapshot) = dashboard.refresh(FilterSpec::new().min_amount(60)).await.unwrap() {
//!         println!("{} records", snapshot.record_count);
//!     }
//! }
//! ```

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::debug;

use crate::error::{DashboardError, Result};
use crate::models::{DashboardSnapshot, FilterSpec, SalesRecord};
use crate::sequence::{RequestSequencer, Ticket};
use crate::sources::RecordSource;
use crate::{SalesDashboard, SalesDashboardBuilder};

// ---------------------------------------------------------------------------
// AsyncSalesDashboardBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncSalesDashboard`].
///
/// Mirrors [`SalesDashboardBuilder`].
#[derive(Default)]
pub struct AsyncSalesDashboardBuilder {
    inner: SalesDashboardBuilder,
}

impl AsyncSalesDashboardBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.inner = self.inner.base_url(url);
        self
    }

    pub fn base_url_from_env(mut self) -> Self {
        self.inner = self.inner.base_url_from_env();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.timeout(timeout);
        self
    }

    pub fn server_side_filtering(mut self, enabled: bool) -> Self {
        self.inner = self.inner.server_side_filtering(enabled);
        self
    }

    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.inner = self.inner.file(path);
        self
    }

    pub fn records(mut self, records: Vec<SalesRecord>) -> Self {
        self.inner = self.inner.records(records);
        self
    }

    pub fn source(mut self, source: Box<dyn RecordSource>) -> Self {
        self.inner = self.inner.source(source);
        self
    }

    /// Build the async dashboard.
    ///
    /// Construction runs on the blocking thread pool, since file and SQL
    /// sources may load data eagerly.
    pub async fn build(self) -> Result<AsyncSalesDashboard> {
        let inner = self.inner;
        let dashboard = tokio::task::spawn_blocking(move || inner.build())
            .await
            .map_err(|e| DashboardError::InvalidArgument(format!("Task join error: {e}")))??;
        Ok(AsyncSalesDashboard::new(dashboard))
    }
}

// ---------------------------------------------------------------------------
// AsyncSalesDashboard
// ---------------------------------------------------------------------------

/// Async wrapper around [`SalesDashboard`].
///
/// The dashboard sits behind a [`Mutex`]; refreshes queue on it but their
/// results are published strictly in request order.
pub struct AsyncSalesDashboard {
    inner: Arc<Mutex<SalesDashboard>>,
    sequencer: RequestSequencer,
    published: Mutex<Option<(Ticket, DashboardSnapshot)>>,
}

impl AsyncSalesDashboard {
    /// Create a new builder for configuring the async dashboard.
    pub fn builder() -> AsyncSalesDashboardBuilder {
        AsyncSalesDashboardBuilder::default()
    }

    /// Wrap an already built dashboard.
    pub fn new(dashboard: SalesDashboard) -> Self {
        Self {
            inner: Arc::new(Mutex::new(dashboard)),
            sequencer: RequestSequencer::new(),
            published: Mutex::new(None),
        }
    }

    /// Run a sync dashboard operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&SalesDashboard) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let dashboard = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = dashboard
                .lock()
                .map_err(|_| DashboardError::InvalidArgument("dashboard lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| DashboardError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Recompute every chart for `spec` and publish the result.
    ///
    /// Returns `Ok(None)` when a newer refresh was started before this one
    /// finished; its result (or error) is discarded and
    /// [`latest`](Self::latest) is left untouched.
    pub async fn refresh(&self, spec: FilterSpec) -> Result<Option<DashboardSnapshot>> {
        let ticket = self.sequencer.begin();
        let result = self.run(move |d| d.snapshot(&spec)).await;

        let mut published = self
            .published
            .lock()
            .map_err(|_| DashboardError::InvalidArgument("snapshot lock poisoned".into()))?;

        if !self.sequencer.is_current(ticket) {
            debug!(ticket = ticket.value(), "discarding superseded refresh");
            return Ok(None);
        }

        let snapshot = result?;
        if published.as_ref().map_or(true, |(t, _)| *t < ticket) {
            *published = Some((ticket, snapshot.clone()));
        }
        Ok(Some(snapshot))
    }

    /// The most recently published snapshot.
    pub fn latest(&self) -> Option<DashboardSnapshot> {
        self.published
            .lock()
            .ok()
            .and_then(|p| p.as_ref().map(|(_, s)| s.clone()))
    }

    /// Records admitted by the full spec, category included.
    pub async fn records(&self, spec: FilterSpec) -> Result<Vec<SalesRecord>> {
        self.run(move |d| d.records(&spec)).await
    }

    /// Close the dashboard, dropping the record source on the blocking pool.
    pub async fn close(self) -> Result<()> {
        let inner = self.inner;
        tokio::task::spawn_blocking(move || drop(inner))
            .await
            .map_err(|e| DashboardError::InvalidArgument(format!("Task join error: {e}")))
    }
}
