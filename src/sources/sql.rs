//! Embedded SQL record source.
//!
//! Records are loaded once into an in-memory DuckDB table and every filtered
//! fetch is compiled into a parameterized `WHERE` clause, so the filter runs
//! inside the query engine rather than over Rust values.

use tracing::debug;

use crate::connection::{Connection, RECORD_COLUMNS};
use crate::error::Result;
use crate::filter::FilterPredicate;
use crate::models::{FilterSpec, SalesRecord};
use crate::sources::{RecordSource, SourceStrategy};
use crate::sql_builder::SqlBuilder;

const TABLE: &str = "sales";

/// Server-filter source backed by DuckDB.
pub struct SqlSource {
    conn: Connection,
    origin: String,
}

impl SqlSource {
    /// Load the given records into a fresh in-memory database.
    pub fn new(records: &[SalesRecord]) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.load_records(TABLE, records)?;
        Ok(Self {
            conn,
            origin: format!("{} records", records.len()),
        })
    }

    /// Load the full dataset of another source.
    pub fn from_source(source: &dyn RecordSource) -> Result<Self> {
        let records = source.fetch_all()?;
        let conn = Connection::open_in_memory()?;
        conn.load_records(TABLE, &records)?;
        Ok(Self {
            conn,
            origin: source.describe(),
        })
    }

    /// Number of loaded records.
    pub fn len(&self) -> Result<u64> {
        self.conn.count(TABLE)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl RecordSource for SqlSource {
    fn fetch_all(&self) -> Result<Vec<SalesRecord>> {
        let (sql, params) = filtered_query(&FilterPredicate::any());
        self.conn.query_records(&sql, &params)
    }

    fn fetch_filtered(&self, spec: &FilterSpec) -> Result<Vec<SalesRecord>> {
        let (sql, params) = filtered_query(&FilterPredicate::compile(spec));
        debug!(sql = %sql, params = ?params, "querying sales table");
        self.conn.query_records(&sql, &params)
    }

    fn strategy(&self) -> SourceStrategy {
        SourceStrategy::ServerFilter
    }

    fn describe(&self) -> String {
        format!("duckdb({})", self.origin)
    }
}

/// Compile a predicate into a `SELECT` over the sales table, in load order.
pub fn filtered_query(predicate: &FilterPredicate) -> (String, Vec<String>) {
    let mut qb = SqlBuilder::new(TABLE);
    qb.select(&RECORD_COLUMNS);

    if let Some(min) = predicate.min_amount {
        qb.where_cast("total_amount", ">=", &min.to_string(), "DOUBLE");
    }
    if let Some(max) = predicate.max_amount {
        qb.where_cast("total_amount", "<=", &max.to_string(), "DOUBLE");
    }
    if let Some(start) = predicate.start_date {
        qb.where_cast("sale_date", ">=", &start.format("%Y-%m-%d").to_string(), "DATE");
    }
    if let Some(end) = predicate.end_date {
        qb.where_cast("sale_date", "<=", &end.format("%Y-%m-%d").to_string(), "DATE");
    }
    for category in &predicate.categories {
        qb.where_eq("product_category", category);
    }

    qb.order_by(&["seq ASC"]);
    qb.build()
}
