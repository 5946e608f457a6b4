//! Record sources.
//!
//! A [`RecordSource`] supplies sales records either as the full dataset
//! (client-side filtering) or already filtered by the store (server-side
//! filtering). Aggregation does not know which one it was given.

pub mod file;
pub mod http;
pub mod sql;

pub use file::FileSource;
pub use http::{HttpSource, RemoteFilterSource};
pub use sql::SqlSource;

use std::fmt;

use crate::error::Result;
use crate::filter::FilterPredicate;
use crate::models::{FilterSpec, SalesRecord};

/// Where filtering happens for a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStrategy {
    /// Full fetch, filtered in memory.
    ClientFilter,
    /// The store applies the filter before returning records.
    ServerFilter,
}

impl fmt::Display for SourceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceStrategy::ClientFilter => f.write_str("client-filter"),
            SourceStrategy::ServerFilter => f.write_str("server-filter"),
        }
    }
}

/// Supplier of sales records.
///
/// Errors from the underlying transport are returned unchanged. For the same
/// data and spec, `fetch_filtered` must return exactly the records
/// `fetch_all` followed by [`FilterPredicate::retain`] would, in the same order.
pub trait RecordSource: Send {
    /// The complete dataset.
    fn fetch_all(&self) -> Result<Vec<SalesRecord>>;

    /// Records admitted by `spec`.
    fn fetch_filtered(&self, spec: &FilterSpec) -> Result<Vec<SalesRecord>> {
        let records = self.fetch_all()?;
        Ok(FilterPredicate::compile(spec).retain(records))
    }

    fn strategy(&self) -> SourceStrategy {
        SourceStrategy::ClientFilter
    }

    /// Short human-readable description, used in logs and `Display`.
    fn describe(&self) -> String;
}

impl<S: RecordSource + ?Sized> RecordSource for Box<S> {
    fn fetch_all(&self) -> Result<Vec<SalesRecord>> {
        (**self).fetch_all()
    }

    fn fetch_filtered(&self, spec: &FilterSpec) -> Result<Vec<SalesRecord>> {
        (**self).fetch_filtered(spec)
    }

    fn strategy(&self) -> SourceStrategy {
        (**self).strategy()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

// ---------------------------------------------------------------------------
// StaticSource
// ---------------------------------------------------------------------------

/// In-memory records, filtered client-side.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<SalesRecord>,
}

impl StaticSource {
    pub fn new(records: Vec<SalesRecord>) -> Self {
        Self { records }
    }
}

impl RecordSource for StaticSource {
    fn fetch_all(&self) -> Result<Vec<SalesRecord>> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("static({} records)", self.records.len())
    }
}
