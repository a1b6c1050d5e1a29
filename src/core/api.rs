//! Abstraction over the remote fund-data service.

use crate::core::error::ApiError;
use crate::core::fund::{DayReturns, Fund, ReturnEntry};
use async_trait::async_trait;

/// Parameters of a detail fetch. Empty dates are omitted from the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FundQuery {
    pub fund_code: String,
    pub start_date: String,
    pub end_date: String,
}

impl FundQuery {
    pub fn new(fund_code: &str, start_date: &str, end_date: &str) -> Self {
        Self {
            fund_code: fund_code.to_string(),
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
        }
    }
}

#[async_trait]
pub trait FundsApi: Send + Sync {
    /// `GET /api/funds`
    async fn list_funds(&self) -> Result<Vec<Fund>, ApiError>;

    /// `GET /api/funds/{code}?startDate=&endDate=`
    async fn fund_history(&self, query: &FundQuery) -> Result<Vec<DayReturns>, ApiError>;

    /// `PUT /api/funds/{code}?date=` with the full return list as body.
    async fn update_returns(
        &self,
        fund_code: &str,
        date: &str,
        returns: &[ReturnEntry],
    ) -> Result<(), ApiError>;

    /// The URL a write for `(fund_code, date)` targets, for error messages.
    fn update_target(&self, fund_code: &str, date: &str) -> String;
}
