use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// SaleDate: Raw date string plus its calendar date
// ---------------------------------------------------------------------------

/// A transaction date as received from the record store.
///
/// Keeps the raw string (the grouping key of the time series) next to the
/// calendar date used for filtering and the UTC instant used for ordering.
/// Accepts `YYYY-MM-DD`, optionally followed by a time part
/// (`2024-01-05T10:30:00Z`, `2024-01-05T10:30:00+02:00`,
/// `2024-01-05 10:30:00`). The calendar date is always the leading
/// `YYYY-MM-DD`. Surrounding whitespace is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SaleDate {
    raw: String,
    day: NaiveDate,
    at: NaiveDateTime,
}

impl SaleDate {
    /// Parse a date string, returning `None` when it is not a recognised form.
    pub fn parse(raw: &str) -> Option<Self> {
        parse_date_parts(raw).map(|(day, at)| Self {
            raw: raw.to_string(),
            day,
            at,
        })
    }

    /// The date exactly as received.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The calendar date, time of day discarded.
    pub fn calendar_date(&self) -> NaiveDate {
        self.day
    }

    /// The point in time, normalised to UTC. Bare dates and naive times are
    /// taken as UTC; bare dates sit at midnight.
    pub fn instant(&self) -> NaiveDateTime {
        self.at
    }
}

impl fmt::Display for SaleDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for SaleDate {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        SaleDate::parse(s)
            .ok_or_else(|| DashboardError::InvalidArgument(format!("unparseable date: {:?}", s)))
    }
}

impl Serialize for SaleDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for SaleDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        SaleDate::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unparseable date {:?}", raw)))
    }
}

/// Extract the calendar date from a `YYYY-MM-DD[(T| )time]` string.
pub(crate) fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    parse_date_parts(raw).map(|(day, _)| day)
}

/// Calendar date and UTC instant of a `YYYY-MM-DD[(T| )time]` string.
fn parse_date_parts(s: &str) -> Option<(NaiveDate, NaiveDateTime)> {
    let head = s.get(..10)?;
    let day = NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()?;
    let rest = &s[10..];
    if rest.is_empty() {
        return Some((day, day.and_time(NaiveTime::MIN)));
    }
    if !(rest.starts_with('T') || rest.starts_with(' ')) || rest.ends_with(char::is_whitespace) {
        return None;
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(&s.replacen(' ', "T", 1)) {
        return Some((day, at.naive_utc()));
    }
    [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    .map(|at| (day, at))
}

// ---------------------------------------------------------------------------
// SalesRecord: One transaction
// ---------------------------------------------------------------------------

/// One sales transaction, in the record store's wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    #[serde(rename = "Transaction ID")]
    pub transaction_id: i64,
    #[serde(rename = "Date")]
    pub date: SaleDate,
    #[serde(rename = "Customer ID")]
    pub customer_id: String,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "Age")]
    pub age: u32,
    #[serde(rename = "Product Category")]
    pub product_category: String,
    #[serde(rename = "Quantity")]
    pub quantity: u32,
    #[serde(rename = "Price per Unit")]
    pub price_per_unit: f64,
    #[serde(rename = "Total Amount")]
    pub total_amount: f64,
}

impl SalesRecord {
    fn validate(&self) -> std::result::Result<(), String> {
        if !self.total_amount.is_finite() || self.total_amount < 0.0 {
            return Err(format!("invalid total amount {}", self.total_amount));
        }
        if !self.price_per_unit.is_finite() || self.price_per_unit < 0.0 {
            return Err(format!("invalid price per unit {}", self.price_per_unit));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode and validate wire records.
///
/// Fails on the first malformed record; nothing is skipped.
pub fn decode_records(values: Vec<serde_json::Value>) -> Result<Vec<SalesRecord>> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let record: SalesRecord = serde_json::from_value(value)
                .map_err(|e| DashboardError::MalformedRecord {
                    index,
                    reason: e.to_string(),
                })?;
            record
                .validate()
                .map_err(|reason| DashboardError::MalformedRecord { index, reason })?;
            Ok(record)
        })
        .collect()
}

/// Decode a response body: either a bare array of records or a json-server
/// database document with the records under the sales collection key.
pub fn records_from_payload(payload: serde_json::Value) -> Result<Vec<SalesRecord>> {
    match payload {
        serde_json::Value::Array(items) => decode_records(items),
        serde_json::Value::Object(mut map) => match map.remove(crate::config::SALES_COLLECTION) {
            Some(serde_json::Value::Array(items)) => decode_records(items),
            Some(_) => Err(DashboardError::MalformedPayload(format!(
                "'{}' is not an array",
                crate::config::SALES_COLLECTION
            ))),
            None => Err(DashboardError::MalformedPayload(format!(
                "object without a '{}' collection",
                crate::config::SALES_COLLECTION
            ))),
        },
        other => Err(DashboardError::MalformedPayload(format!(
            "expected an array of records, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_dates_parse() {
        let d = SaleDate::parse("2023-11-24").unwrap();
        assert_eq!(d.as_str(), "2023-11-24");
        assert_eq!(d.calendar_date(), NaiveDate::from_ymd_opt(2023, 11, 24).unwrap());
    }

    #[test]
    fn time_of_day_is_dropped() {
        for raw in [
            "2024-01-31T23:59:59Z",
            "2024-01-31T08:00:00+05:00",
            "2024-01-31T10:15:00",
            "2024-01-31 10:15:00",
            "2024-01-31T10:15",
        ] {
            let d = SaleDate::parse(raw).unwrap_or_else(|| panic!("{raw} should parse"));
            assert_eq!(d.calendar_date(), NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
            assert_eq!(d.as_str(), raw);
        }
    }

    #[test]
    fn instant_is_normalised_to_utc() {
        let at = |raw: &str| SaleDate::parse(raw).unwrap().instant().to_string();
        assert_eq!(at("2024-01-01"), "2024-01-01 00:00:00");
        assert_eq!(at("2024-01-01T08:00:00+05:00"), "2024-01-01 03:00:00");
        assert_eq!(at("2024-01-01 09:00:00"), "2024-01-01 09:00:00");
        assert_eq!(at("2024-01-01T10:00:00Z"), "2024-01-01 10:00:00");
        // Offset shifts the instant, never the calendar date.
        let d = SaleDate::parse("2024-01-01T02:00:00+05:00").unwrap();
        assert_eq!(d.calendar_date(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(d.instant().to_string(), "2023-12-31 21:00:00");
    }

    #[test]
    fn from_str_reports_the_bad_input() {
        let d: SaleDate = "2024-03-05T12:00:00Z".parse().unwrap();
        assert_eq!(d.to_string(), "2024-03-05T12:00:00Z");
        let err = "05/03/2024".parse::<SaleDate>().unwrap_err();
        assert!(matches!(err, DashboardError::InvalidArgument(ref m) if m.contains("05/03/2024")));
    }

    #[test]
    fn wire_keys_match_config_field_names() {
        use crate::config::*;

        let record: SalesRecord = serde_json::from_value(serde_json::json!({
            FIELD_TRANSACTION_ID: 7,
            FIELD_DATE: "2024-01-01",
            FIELD_CUSTOMER_ID: "CUST007",
            FIELD_GENDER: "Female",
            FIELD_AGE: 41,
            FIELD_PRODUCT_CATEGORY: "Beauty",
            FIELD_QUANTITY: 2,
            FIELD_PRICE_PER_UNIT: 25.0,
            FIELD_TOTAL_AMOUNT: 50.0,
        }))
        .unwrap();
        assert_eq!(record.transaction_id, 7);
        assert_eq!(record.total_amount, 50.0);

        let value = serde_json::to_value(&record).unwrap();
        let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        let mut expected = vec![
            FIELD_TRANSACTION_ID,
            FIELD_DATE,
            FIELD_CUSTOMER_ID,
            FIELD_GENDER,
            FIELD_AGE,
            FIELD_PRODUCT_CATEGORY,
            FIELD_QUANTITY,
            FIELD_PRICE_PER_UNIT,
            FIELD_TOTAL_AMOUNT,
        ];
        expected.sort_unstable();
        assert_eq!(keys, expected);
    }

    #[test]
    fn garbage_dates_are_rejected() {
        for raw in [
            "",
            "yesterday",
            "2024-13-01",
            "2024-02-30",
            "2024-01-01garbage",
            "01/05/2024",
            " 2024-01-05",
            "2024-01-05 ",
            "2024-01-05T10:00:00Z ",
        ] {
            assert!(SaleDate::parse(raw).is_none(), "{raw} should not parse");
        }
    }
}
