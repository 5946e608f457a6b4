//! DuckDB connection wrapper holding sales records in an in-memory table.
//!
//! The table keeps the load order in a `seq` column and the calendar date of
//! each record in a `sale_date DATE` column, so date filters in SQL compare
//! the same value the in-memory predicate does.

use duckdb::Connection as DuckDbConnection;

use crate::error::{DashboardError, Result};
use crate::models::{SaleDate, SalesRecord};

/// Columns read back into a [`SalesRecord`], in this order.
pub const RECORD_COLUMNS: [&str; 9] = [
    "transaction_id",
    "date",
    "customer_id",
    "gender",
    "age",
    "product_category",
    "quantity",
    "price_per_unit",
    "total_amount",
];

/// Wraps an in-memory DuckDB database.
pub struct Connection {
    conn: DuckDbConnection,
}

impl Connection {
    /// Open an in-memory DuckDB database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Create (or replace) `table_name` and load `records` into it.
    ///
    /// Runs in a single transaction; on failure the table is left empty.
    pub fn load_records(&self, table_name: &str, records: &[SalesRecord]) -> Result<()> {
        self.conn.execute_batch(&format!(
            "CREATE OR REPLACE TABLE {} (\
                seq BIGINT NOT NULL, \
                transaction_id BIGINT NOT NULL, \
                date VARCHAR NOT NULL, \
                sale_date DATE NOT NULL, \
                customer_id VARCHAR NOT NULL, \
                gender VARCHAR NOT NULL, \
                age BIGINT NOT NULL, \
                product_category VARCHAR NOT NULL, \
                quantity BIGINT NOT NULL, \
                price_per_unit DOUBLE NOT NULL, \
                total_amount DOUBLE NOT NULL\
             )",
            table_name
        ))?;

        self.conn.execute_batch("BEGIN TRANSACTION")?;
        let result = (|| -> Result<()> {
            let mut stmt = self.conn.prepare(&format!(
                "INSERT INTO {} VALUES (?, ?, ?, CAST(? AS DATE), ?, ?, ?, ?, ?, ?, ?)",
                table_name
            ))?;
            for (seq, r) in records.iter().enumerate() {
                let day = r.date.calendar_date().format("%Y-%m-%d").to_string();
                stmt.execute(duckdb::params![
                    seq as i64,
                    r.transaction_id,
                    r.date.as_str(),
                    day,
                    r.customer_id,
                    r.gender,
                    i64::from(r.age),
                    r.product_category,
                    i64::from(r.quantity),
                    r.price_per_unit,
                    r.total_amount
                ])?;
            }
            Ok(())
        })();

        match result {
            Ok(()) => {
                self.conn.execute_batch("COMMIT")?;
                Ok(())
            }
            Err(e) => {
                let _ = self.conn.execute_batch("ROLLBACK");
                Err(e)
            }
        }
    }

    /// Execute a query selecting [`RECORD_COLUMNS`] and decode each row.
    pub fn query_records(&self, sql: &str, params: &[String]) -> Result<Vec<SalesRecord>> {
        let mut stmt = self.conn.prepare(sql)?;

        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows = stmt.query(param_values.as_slice())?;
        let mut out = Vec::new();

        while let Some(row) = rows.next()? {
            let index = out.len();
            let raw_date: String = row.get(1)?;
            let date = SaleDate::parse(&raw_date).ok_or_else(|| DashboardError::MalformedRecord {
                index,
                reason: format!("unparseable date {:?}", raw_date),
            })?;
            out.push(SalesRecord {
                transaction_id: row.get(0)?,
                date,
                customer_id: row.get(2)?,
                gender: row.get(3)?,
                age: to_u32(row.get(4)?, index, "age")?,
                product_category: row.get(5)?,
                quantity: to_u32(row.get(6)?, index, "quantity")?,
                price_per_unit: row.get(7)?,
                total_amount: row.get(8)?,
            });
        }

        Ok(out)
    }

    /// Number of rows in a table.
    pub fn count(&self, table_name: &str) -> Result<u64> {
        let n: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table_name), [], |row| row.get(0))?;
        Ok(n.max(0) as u64)
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }
}

fn to_u32(value: i64, index: usize, field: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| DashboardError::MalformedRecord {
        index,
        reason: format!("{} out of range: {}", field, value),
    })
}
