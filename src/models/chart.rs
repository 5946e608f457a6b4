use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TimeSeriesPoint: Sales over time (line chart)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    pub date: String,
    pub total_amount: f64,
    pub transaction_count: u64,
}

// ---------------------------------------------------------------------------
// CategoryTotal: Sales by product category (bar chart)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub total_amount: f64,
    pub quantity: u64,
}

// ---------------------------------------------------------------------------
// ShareSlice: One slice of a gender or category pie
// ---------------------------------------------------------------------------

/// `value` is the summed total amount, `count` the number of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareSlice {
    pub name: String,
    pub value: f64,
    pub count: u64,
}

// ---------------------------------------------------------------------------
// AgeBand / AgeBandTotal: Age distribution
// ---------------------------------------------------------------------------

/// The five fixed age bands, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeBand {
    #[serde(rename = "18-25")]
    From18To25,
    #[serde(rename = "26-35")]
    From26To35,
    #[serde(rename = "36-45")]
    From36To45,
    #[serde(rename = "46-55")]
    From46To55,
    #[serde(rename = "56+")]
    From56,
}

impl AgeBand {
    pub const ALL: [AgeBand; 5] = [
        AgeBand::From18To25,
        AgeBand::From26To35,
        AgeBand::From36To45,
        AgeBand::From46To55,
        AgeBand::From56,
    ];

    /// Band for an age. Bands are inclusive on both ends.
    ///
    /// Ages matching no explicit band, i.e. anything under 18, land in
    /// [`AgeBand::From56`].
    pub fn for_age(age: u32) -> AgeBand {
        match age {
            18..=25 => AgeBand::From18To25,
            26..=35 => AgeBand::From26To35,
            36..=45 => AgeBand::From36To45,
            46..=55 => AgeBand::From46To55,
            _ => AgeBand::From56,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeBand::From18To25 => "18-25",
            AgeBand::From26To35 => "26-35",
            AgeBand::From36To45 => "36-45",
            AgeBand::From46To55 => "46-55",
            AgeBand::From56 => "56+",
        }
    }
}

impl fmt::Display for AgeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeBandTotal {
    pub age_group: AgeBand,
    pub count: u64,
    pub total_amount: f64,
}

impl AgeBandTotal {
    pub fn empty(age_group: AgeBand) -> Self {
        Self {
            age_group,
            count: 0,
            total_amount: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// DashboardSnapshot: Every chart for one filter state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub time_series: Vec<TimeSeriesPoint>,
    pub category_totals: Vec<CategoryTotal>,
    pub gender_shares: Vec<ShareSlice>,
    pub category_shares: Vec<ShareSlice>,
    pub age_distribution: Vec<AgeBandTotal>,
    pub record_count: u64,
    pub total_amount: f64,
}
