//! Fund and return data as served by the remote fund-data service.

use serde::{Deserialize, Serialize};

/// Category label of the daily return, pinned to the first column of every table.
pub const DAILY_RETURN: &str = "Günlük Getiri";

/// A single named return metric, e.g. `Aylık Getiri: -2.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnEntry {
    pub description: String,
    #[serde(default)]
    pub value: Option<f64>,
}

impl ReturnEntry {
    pub fn new(description: &str, value: Option<f64>) -> Self {
        Self {
            description: description.to_string(),
            value,
        }
    }
}

/// A fund in the all-funds listing with its latest returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fund {
    /// Opaque row key; the service has used both numbers and strings.
    #[serde(default)]
    pub fund_id: Option<serde_json::Value>,
    pub fund_code: String,
    #[serde(default)]
    pub long_name: String,
    #[serde(default, rename = "fund_desc")]
    pub fund_desc: Option<String>,
    #[serde(default)]
    pub returns: Vec<ReturnEntry>,
}

/// One day of a fund's return history, as returned by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayReturns {
    #[serde(default)]
    pub fund_code: String,
    #[serde(default)]
    pub long_name: String,
    #[serde(default, rename = "fund_desc")]
    pub fund_desc: Option<String>,
    pub date: String,
    #[serde(default)]
    pub returns: Vec<ReturnEntry>,
}

/// A fund flattened for tabular display: category label to value.
///
/// `returns_data` keeps the insertion order of the first occurrence of each
/// description; a repeated description overwrites the earlier value in place.
#[derive(Debug, Clone, PartialEq)]
pub struct FundRow {
    pub fund: Fund,
    pub returns_data: Vec<(String, Option<f64>)>,
}

impl FundRow {
    /// Looks up a category. `None` means the category is missing from the row,
    /// `Some(None)` means the service sent it with a null value.
    pub fn category(&self, description: &str) -> Option<Option<f64>> {
        self.returns_data
            .iter()
            .find(|(d, _)| d == description)
            .map(|(_, v)| *v)
    }

    pub fn category_value(&self, description: &str) -> Option<f64> {
        self.category(description).flatten()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.returns_data.iter().map(|(d, _)| d.as_str())
    }
}

/// Colour classification of a return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTone {
    Positive,
    Negative,
    Neutral,
}

impl ValueTone {
    pub fn of(value: Option<f64>) -> Self {
        match value {
            Some(v) if v > 0.0 => ValueTone::Positive,
            Some(v) if v < 0.0 => ValueTone::Negative,
            _ => ValueTone::Neutral,
        }
    }
}
