//! Aggregations from a record collection to chart-ready shapes.
//!
//! Every function takes an already-filtered collection (`&[SalesRecord]`,
//! `&Vec<SalesRecord>` or the `Vec<&SalesRecord>` returned by
//! [`filter_records`](crate::filter::filter_records)) and never filters again.
//! Sums are plain `f64` additions in input order.

use std::collections::HashMap;
use std::hash::Hash;

use crate::models::{
    AgeBand, AgeBandTotal, CategoryTotal, DashboardSnapshot, SalesRecord, ShareSlice,
    TimeSeriesPoint,
};

/// Group records by key, one accumulator per distinct key.
///
/// Accumulators are created by `init` on the first occurrence of a key and
/// updated by `accumulate` for every record carrying it. Output is in
/// first-occurrence order.
pub fn group_and_accumulate<'a, I, K, A>(
    records: I,
    key_of: impl Fn(&'a SalesRecord) -> K,
    init: impl Fn(&K) -> A,
    accumulate: impl Fn(&mut A, &'a SalesRecord),
) -> Vec<A>
where
    I: IntoIterator<Item = &'a SalesRecord>,
    K: Eq + Hash,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut out: Vec<A> = Vec::new();

    for record in records {
        let key = key_of(record);
        let idx = match slots.get(&key) {
            Some(&idx) => idx,
            None => {
                out.push(init(&key));
                slots.insert(key, out.len() - 1);
                out.len() - 1
            }
        };
        accumulate(&mut out[idx], record);
    }

    out
}

/// Sales over time, one point per distinct date string.
///
/// Points are ordered by the instant of their date (offsets applied), then by
/// the raw string for equal instants.
pub fn aggregate_by_date<'a, I>(records: I) -> Vec<TimeSeriesPoint>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    let mut grouped = group_and_accumulate(
        records,
        |r| &r.date,
        |date| {
            (
                date.instant(),
                TimeSeriesPoint {
                    date: date.as_str().to_string(),
                    total_amount: 0.0,
                    transaction_count: 0,
                },
            )
        },
        |(_, point), r| {
            point.total_amount += r.total_amount;
            point.transaction_count += 1;
        },
    );

    grouped.sort_by(|(a_at, a), (b_at, b)| a_at.cmp(b_at).then_with(|| a.date.cmp(&b.date)));
    grouped.into_iter().map(|(_, point)| point).collect()
}

/// Total amount and units per product category, first-seen order.
pub fn aggregate_by_category<'a, I>(records: I) -> Vec<CategoryTotal>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    group_and_accumulate(
        records,
        |r| r.product_category.as_str(),
        |category| CategoryTotal {
            category: category.to_string(),
            total_amount: 0.0,
            quantity: 0,
        },
        |acc, r| {
            acc.total_amount += r.total_amount;
            acc.quantity += u64::from(r.quantity);
        },
    )
}

/// Amount and record count per gender, first-seen order.
pub fn aggregate_by_gender<'a, I>(records: I) -> Vec<ShareSlice>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    share_by(records, |r| r.gender.as_str())
}

/// Amount and record count per product category, first-seen order.
pub fn aggregate_by_category_share<'a, I>(records: I) -> Vec<ShareSlice>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    share_by(records, |r| r.product_category.as_str())
}

fn share_by<'a, I>(records: I, key_of: impl Fn(&'a SalesRecord) -> &'a str) -> Vec<ShareSlice>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    group_and_accumulate(
        records,
        key_of,
        |name| ShareSlice {
            name: name.to_string(),
            value: 0.0,
            count: 0,
        },
        |slice, r| {
            slice.value += r.total_amount;
            slice.count += 1;
        },
    )
}

/// Age distribution over the five fixed bands, always all five, in order.
pub fn aggregate_by_age_band<'a, I>(records: I) -> Vec<AgeBandTotal>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    let mut bands: Vec<AgeBandTotal> = AgeBand::ALL.iter().copied().map(AgeBandTotal::empty).collect();

    for record in records {
        let band = AgeBand::for_age(record.age);
        // ALL is declared in variant order.
        let slot = &mut bands[band as usize];
        slot.count += 1;
        slot.total_amount += record.total_amount;
    }

    bands
}

/// Every aggregate for one collection.
pub fn aggregate_all(records: &[&SalesRecord]) -> DashboardSnapshot {
    let mut total_amount = 0.0;
    for r in records {
        total_amount += r.total_amount;
    }

    DashboardSnapshot {
        time_series: aggregate_by_date(records.iter().copied()),
        category_totals: aggregate_by_category(records.iter().copied()),
        gender_shares: aggregate_by_gender(records.iter().copied()),
        category_shares: aggregate_by_category_share(records.iter().copied()),
        age_distribution: aggregate_by_age_band(records.iter().copied()),
        record_count: records.len() as u64,
        total_amount,
    }
}
