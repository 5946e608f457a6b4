//! Parameterized `SELECT` builder for the sales table.
//!
//! Filter values only ever travel as bound `?` parameters. Column names and
//! operators come from this crate, never from the filter spec.
//!
//! # Example
//!
//! ```rust
//! use sales_dashboard::SqlBuilder;
//! let (sql, params) = SqlBuilder::new("sales")
//!     .where_eq("product_category", "Beauty")
//!     .where_cast("total_amount", ">=", "60", "DOUBLE")
//!     .order_by(&["seq ASC"])
//!     .build();
//! assert_eq!(params, vec!["Beauty", "60"]);
//! assert!(sql.contains("total_amount >= CAST(? AS DOUBLE)"));
//! ```

/// Accumulates the pieces of one query, then renders it with [`build`](Self::build).
pub struct SqlBuilder {
    columns: Vec<String>,
    table: String,
    conditions: Vec<String>,
    params: Vec<String>,
    ordering: Vec<String>,
}

impl SqlBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            columns: vec!["*".to_string()],
            table: table.to_string(),
            conditions: Vec::new(),
            params: Vec::new(),
            ordering: Vec::new(),
        }
    }

    /// Replace the selected columns (`*` until called).
    pub fn select(&mut self, cols: &[&str]) -> &mut Self {
        self.columns = cols.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Add a raw condition; `params` bind its placeholders in order.
    pub fn where_clause(&mut self, condition: &str, params: &[&str]) -> &mut Self {
        self.conditions.push(condition.to_string());
        self.params.extend(params.iter().map(|p| p.to_string()));
        self
    }

    /// `{column} = ?`
    pub fn where_eq(&mut self, column: &str, value: &str) -> &mut Self {
        self.where_clause(&format!("{} = ?", column), &[value])
    }

    /// `{column} {op} CAST(? AS {sql_type})`.
    ///
    /// Parameters are bound as text, so typed comparisons (amounts, dates)
    /// cast the placeholder to the column's type.
    pub fn where_cast(&mut self, column: &str, op: &str, value: &str, sql_type: &str) -> &mut Self {
        self.where_clause(&format!("{} {} CAST(? AS {})", column, op, sql_type), &[value])
    }

    /// Append ordering terms, e.g. `"seq ASC"`.
    pub fn order_by(&mut self, terms: &[&str]) -> &mut Self {
        self.ordering.extend(terms.iter().map(|t| t.to_string()));
        self
    }

    /// Render the SQL text (one clause per line) and its parameters.
    pub fn build(&self) -> (String, Vec<String>) {
        let mut sql = format!("SELECT {}\nFROM {}", self.columns.join(", "), self.table);
        if !self.conditions.is_empty() {
            sql.push_str("\nWHERE ");
            sql.push_str(&self.conditions.join(" AND "));
        }
        if !self.ordering.is_empty() {
            sql.push_str("\nORDER BY ");
            sql.push_str(&self.ordering.join(", "));
        }
        (sql, self.params.clone())
    }
}
