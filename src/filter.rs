//! Filter predicate builder.
//!
//! Compiles a [`FilterSpec`] into a [`FilterPredicate`] over single records.
//! Empty or uncoercible fields are unconstrained; active constraints are
//! combined with AND. Contradictory bounds are not errors, they just admit
//! nothing.

use chrono::NaiveDate;

use crate::models::record::parse_calendar_date;
use crate::models::{FilterSpec, SalesRecord};

/// A compiled filter. All bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPredicate {
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Every listed category must equal the record's category.
    pub categories: Vec<String>,
}

impl FilterPredicate {
    /// Compile a spec. Never fails: fields that do not coerce are dropped.
    pub fn compile(spec: &FilterSpec) -> Self {
        let category = spec.category.trim();
        Self {
            min_amount: parse_amount(&spec.min_amount),
            max_amount: parse_amount(&spec.max_amount),
            start_date: parse_bound_date(&spec.start_date),
            end_date: parse_bound_date(&spec.end_date),
            categories: if category.is_empty() {
                Vec::new()
            } else {
                // Exact match against the untrimmed spec value.
                vec![spec.category.clone()]
            },
        }
    }

    /// The predicate admitting every record.
    pub fn any() -> Self {
        Self::default()
    }

    /// True when no constraint is active.
    pub fn is_unconstrained(&self) -> bool {
        self.min_amount.is_none()
            && self.max_amount.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.categories.is_empty()
    }

    /// Decide inclusion of one record.
    pub fn matches(&self, record: &SalesRecord) -> bool {
        if let Some(min) = self.min_amount {
            if record.total_amount < min {
                return false;
            }
        }
        if let Some(max) = self.max_amount {
            if record.total_amount > max {
                return false;
            }
        }
        let day = record.date.calendar_date();
        if let Some(start) = self.start_date {
            if day < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if day > end {
                return false;
            }
        }
        self.categories
            .iter()
            .all(|c| c == &record.product_category)
    }

    /// Conjunction of two predicates, by tightening each bound.
    ///
    /// `a.and(&b).matches(r) == a.matches(r) && b.matches(r)` for every record.
    pub fn and(&self, other: &FilterPredicate) -> FilterPredicate {
        let mut categories = self.categories.clone();
        for c in &other.categories {
            if !categories.contains(c) {
                categories.push(c.clone());
            }
        }
        FilterPredicate {
            min_amount: tighter(self.min_amount, other.min_amount, f64::max),
            max_amount: tighter(self.max_amount, other.max_amount, f64::min),
            start_date: tighter(self.start_date, other.start_date, std::cmp::max),
            end_date: tighter(self.end_date, other.end_date, std::cmp::min),
            categories,
        }
    }

    /// Keep the matching records of an owned collection, in order.
    pub fn retain(&self, mut records: Vec<SalesRecord>) -> Vec<SalesRecord> {
        if !self.is_unconstrained() {
            records.retain(|r| self.matches(r));
        }
        records
    }
}

impl From<&FilterSpec> for FilterPredicate {
    fn from(spec: &FilterSpec) -> Self {
        FilterPredicate::compile(spec)
    }
}

/// Borrow the records admitted by `predicate`, preserving order.
pub fn filter_records<'a>(
    records: &'a [SalesRecord],
    predicate: &FilterPredicate,
) -> Vec<&'a SalesRecord> {
    records.iter().filter(|r| predicate.matches(r)).collect()
}

fn tighter<T: Copy>(a: Option<T>, b: Option<T>, pick: impl Fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(x), Some(y)) => Some(pick(x, y)),
        (x, None) => x,
        (None, y) => y,
    }
}

fn parse_amount(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| !v.is_nan())
}

fn parse_bound_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    parse_calendar_date(s)
}
