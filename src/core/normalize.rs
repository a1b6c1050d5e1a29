//! Flattens nested return entries into sortable rows and derives table headers.

use crate::core::config::HeaderStrategy;
use crate::core::fund::{DAILY_RETURN, Fund, FundRow};

/// Folds a fund's return entries into `returns_data`. Last write wins for
/// repeated descriptions, but the key keeps its first position.
pub fn normalize_fund(fund: Fund) -> FundRow {
    let mut returns_data: Vec<(String, Option<f64>)> = Vec::with_capacity(fund.returns.len());
    for entry in &fund.returns {
        match returns_data.iter_mut().find(|(d, _)| *d == entry.description) {
            Some(slot) => slot.1 = entry.value,
            None => returns_data.push((entry.description.clone(), entry.value)),
        }
    }
    FundRow { fund, returns_data }
}

pub fn normalize_funds(funds: Vec<Fund>) -> Vec<FundRow> {
    funds.into_iter().map(normalize_fund).collect()
}

/// Computes the ordered category headers for one render pass.
///
/// With [`HeaderStrategy::FirstRow`] only the first row's categories are used,
/// so categories that appear only in later rows are not shown.
pub fn category_headers(rows: &[FundRow], strategy: HeaderStrategy) -> Vec<String> {
    let mut headers: Vec<String> = match strategy {
        HeaderStrategy::FirstRow => rows
            .first()
            .map(|row| row.categories().map(str::to_string).collect())
            .unwrap_or_default(),
        HeaderStrategy::Union => {
            let mut seen: Vec<String> = Vec::new();
            for category in rows.iter().flat_map(FundRow::categories) {
                if !seen.iter().any(|h| h == category) {
                    seen.push(category.to_string());
                }
            }
            seen
        }
    };

    if let Some(index) = headers.iter().position(|h| h == DAILY_RETURN) {
        let daily = headers.remove(index);
        headers.insert(0, daily);
    }
    headers
}
