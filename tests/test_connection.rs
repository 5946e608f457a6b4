//! Connection integration tests: loading records, querying them back, row
//! decoding errors.

mod common;

use sales_dashboard::connection::RECORD_COLUMNS;
use sales_dashboard::{Connection, DashboardError, SqlBuilder};

fn loaded() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.load_records("sales", &common::sample_records()).unwrap();
    conn
}

fn select_all() -> String {
    let (sql, _) = SqlBuilder::new("sales")
        .select(&RECORD_COLUMNS)
        .order_by(&["seq ASC"])
        .build();
    sql
}

// ---------------------------------------------------------------------------
// load_records
// ---------------------------------------------------------------------------

#[test]
fn load_records_creates_one_row_per_record() {
    let conn = loaded();
    assert_eq!(conn.count("sales").unwrap(), 12);
}

#[test]
fn load_records_replaces_existing_table() {
    let conn = loaded();
    conn.load_records("sales", &common::scenario_records()).unwrap();
    assert_eq!(conn.count("sales").unwrap(), 2);
}

#[test]
fn sale_date_column_holds_the_calendar_date() {
    let conn = loaded();
    let day: String = conn
        .raw()
        .query_row(
            "SELECT CAST(sale_date AS VARCHAR) FROM sales WHERE transaction_id = 11",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(day, "2023-02-27");
}

// ---------------------------------------------------------------------------
// query_records
// ---------------------------------------------------------------------------

#[test]
fn query_records_returns_records_in_load_order() {
    let conn = loaded();
    let records = conn.query_records(&select_all(), &[]).unwrap();
    assert_eq!(records, common::sample_records());
}

#[test]
fn query_records_with_params() {
    let conn = loaded();
    let (sql, params) = SqlBuilder::new("sales")
        .select(&RECORD_COLUMNS)
        .where_eq("gender", "Female")
        .where_clause("total_amount >= CAST(? AS DOUBLE)", &["100"])
        .order_by(&["seq ASC"])
        .build();
    let records = conn.query_records(&sql, &params).unwrap();
    let ids: Vec<i64> = records.iter().map(|r| r.transaction_id).collect();
    assert_eq!(ids, vec![2, 10]);
}

#[test]
fn query_records_returns_empty_for_no_matches() {
    let conn = loaded();
    let (sql, params) = SqlBuilder::new("sales")
        .select(&RECORD_COLUMNS)
        .where_eq("product_category", "Garden")
        .build();
    assert!(conn.query_records(&sql, &params).unwrap().is_empty());
}

#[test]
fn out_of_range_age_is_a_malformed_record() {
    let conn = loaded();
    conn.raw()
        .execute_batch("UPDATE sales SET age = -1 WHERE transaction_id = 3")
        .unwrap();
    match conn.query_records(&select_all(), &[]) {
        Err(DashboardError::MalformedRecord { index, reason }) => {
            assert_eq!(index, 2);
            assert!(reason.contains("age"), "{reason}");
        }
        other => panic!("expected MalformedRecord, got {:?}", other),
    }
}

#[test]
fn invalid_sql_is_a_duckdb_error() {
    let conn = loaded();
    let err = conn.query_records("SELECT nope FROM sales", &[]).unwrap_err();
    assert!(matches!(err, DashboardError::DuckDb(_)));
}

#[test]
fn count_of_missing_table_fails() {
    let conn = Connection::open_in_memory().unwrap();
    assert!(conn.count("sales").is_err());
}
