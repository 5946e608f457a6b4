use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// FilterSpec: User-supplied filter state
// ---------------------------------------------------------------------------

/// Filter state as entered by the user. Every field is a raw string and an
/// empty string means "no constraint".
///
/// Amounts deserialize from either a JSON string or a JSON number, so the
/// filter panel's `{"minAmount": 60}` and `{"minAmount": "60"}` are the same
/// spec. Compile it with [`FilterPredicate::compile`](crate::filter::FilterPredicate::compile).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    #[serde(deserialize_with = "string_or_number")]
    pub min_amount: String,
    #[serde(deserialize_with = "string_or_number")]
    pub max_amount: String,
    pub start_date: String,
    pub end_date: String,
    pub category: String,
}

impl FilterSpec {
    /// An empty spec; admits every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// The spec after the filter panel's "Clear" action.
    pub fn cleared() -> Self {
        Self::default()
    }

    pub fn min_amount(mut self, value: impl ToString) -> Self {
        self.min_amount = value.to_string();
        self
    }

    pub fn max_amount(mut self, value: impl ToString) -> Self {
        self.max_amount = value.to_string();
        self
    }

    pub fn start_date(mut self, value: impl Into<String>) -> Self {
        self.start_date = value.into();
        self
    }

    pub fn end_date(mut self, value: impl Into<String>) -> Self {
        self.end_date = value.into();
        self
    }

    /// Set both date bounds at once.
    pub fn date_range(self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date(start).end_date(end)
    }

    pub fn category(mut self, value: impl Into<String>) -> Self {
        self.category = value.into();
        self
    }

    /// The same spec with the category constraint removed. Chart callers that
    /// always want every category use this.
    pub fn without_category(mut self) -> Self {
        self.category.clear();
        self
    }

    /// True when no field carries any text.
    pub fn is_empty(&self) -> bool {
        [
            &self.min_amount,
            &self.max_amount,
            &self.start_date,
            &self.end_date,
            &self.category,
        ]
        .iter()
        .all(|s| s.trim().is_empty())
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    })
}
