//! Shared test fixtures for the sales dashboard integration tests.
//!
//! Provides sample records, helpers writing them as JSON fixture files, and a
//! tiny loopback HTTP server standing in for the json-server record store.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use flate2::write::GzEncoder;
use flate2::Compression;
use sales_dashboard::SalesRecord;

/// Build one record from its interesting fields.
pub fn record(
    id: i64,
    date: &str,
    gender: &str,
    age: u32,
    category: &str,
    quantity: u32,
    total: f64,
) -> SalesRecord {
    let price = if quantity == 0 { 0.0 } else { total / f64::from(quantity) };
    serde_json::from_value(serde_json::json!({
        "Transaction ID": id,
        "Date": date,
        "Customer ID": format!("CUST{:03}", id),
        "Gender": gender,
        "Age": age,
        "Product Category": category,
        "Quantity": quantity,
        "Price per Unit": price,
        "Total Amount": total,
    }))
    .unwrap()
}

/// The two-record scenario: same day, one Beauty sale of 100, one Clothing
/// sale of 50.
pub fn scenario_records() -> Vec<SalesRecord> {
    vec![
        record(1, "2024-01-01", "Male", 20, "Beauty", 2, 100.0),
        record(2, "2024-01-01", "Female", 40, "Clothing", 1, 50.0),
    ]
}

/// A dozen records spread over dates (out of order, some with a time of day),
/// categories, genders and every age band including an under-18 buyer.
pub fn sample_records() -> Vec<SalesRecord> {
    vec![
        record(1, "2023-11-24", "Male", 34, "Beauty", 3, 150.0),
        record(2, "2023-02-27", "Female", 26, "Clothing", 2, 1000.0),
        record(3, "2023-01-13", "Male", 50, "Electronics", 1, 30.0),
        record(4, "2023-05-21", "Male", 37, "Clothing", 1, 500.0),
        record(5, "2023-05-06", "Male", 30, "Beauty", 2, 100.0),
        record(6, "2023-04-25", "Female", 45, "Beauty", 1, 30.0),
        record(7, "2023-03-13", "Male", 46, "Clothing", 2, 50.0),
        record(8, "2023-02-22", "Male", 30, "Electronics", 4, 100.0),
        record(9, "2023-12-13", "Male", 63, "Electronics", 2, 600.0),
        record(10, "2023-10-07", "Female", 52, "Clothing", 4, 200.0),
        record(11, "2023-02-27T18:30:00Z", "Female", 17, "Toys", 1, 25.0),
        record(12, "2023-05-21 09:15:00", "Other", 23, "Books", 3, 45.0),
    ]
}

/// Serialize records the way the record store returns them.
pub fn records_json(records: &[SalesRecord]) -> serde_json::Value {
    serde_json::to_value(records).unwrap()
}

/// Write a json-server style `db.json` document.
pub fn write_db_json(dir: &Path, records: &[SalesRecord]) -> PathBuf {
    let path = dir.join("db.json");
    let doc = serde_json::json!({ "salesData": records_json(records) });
    std::fs::write(&path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();
    path
}

/// Write a bare JSON array of records.
pub fn write_array_json(dir: &Path, name: &str, records: &[SalesRecord]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string(&records_json(records)).unwrap()).unwrap();
    path
}

/// Write a gzip-compressed JSON array of records.
pub fn write_gz_json(dir: &Path, records: &[SalesRecord]) -> PathBuf {
    let path = dir.join("sales.json.gz");
    let file = std::fs::File::create(&path).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder
        .write_all(serde_json::to_string(&records_json(records)).unwrap().as_bytes())
        .unwrap();
    encoder.finish().unwrap();
    path
}

/// A loopback server answering `responses.len()` requests in order.
///
/// Returns the base URL and a receiver yielding each request line
/// (`GET /salesData?... HTTP/1.1`) as it is served.
pub fn serve(responses: Vec<(u16, String)>) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for (status, body) in responses {
            let (mut stream, _) = match listener.accept() {
                Ok(conn) => conn,
                Err(_) => return,
            };

            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut chunk) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => buf.extend_from_slice(&chunk[..n]),
                }
            }
            let request = String::from_utf8_lossy(&buf);
            let request_line = request.lines().next().unwrap_or_default().to_string();
            let _ = tx.send(request_line);

            let reason = if status == 200 { "OK" } else { "Error" };
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });

    (format!("http://{}", addr), rx)
}

/// A base URL nothing listens on.
pub fn dead_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Compare two floats with a relative tolerance.
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}
