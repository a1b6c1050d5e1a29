//! All-funds view state: the loaded rows and the table derived from them.

use crate::core::api::FundsApi;
use crate::core::compare::sort_rows;
use crate::core::config::HeaderStrategy;
use crate::core::error::{ApiError, FundsError};
use crate::core::export;
use crate::core::fund::{Fund, FundRow};
use crate::core::normalize::{category_headers, normalize_funds};
use crate::core::sort_state::SortState;
use crate::core::workflow::OpState;
use tracing::{debug, error, warn};

#[derive(Debug, Default)]
pub struct FundListing {
    rows: Vec<FundRow>,
    pub state: OpState,
    latest_token: u64,
}

/// A render pass: headers and rows in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub category_headers: Vec<String>,
    pub rows: Vec<FundRow>,
}

impl TableView {
    pub fn to_export(&self) -> String {
        export::render(&self.rows, &self.category_headers)
    }
}

impl FundListing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[FundRow] {
        &self.rows
    }

    pub fn begin_load(&mut self) -> u64 {
        self.latest_token += 1;
        self.state = OpState::Loading;
        self.latest_token
    }

    /// Applies a load result. On failure the previously loaded rows stay.
    pub fn complete_load(&mut self, token: u64, result: Result<Vec<Fund>, ApiError>) -> bool {
        if token != self.latest_token {
            warn!(token, latest = self.latest_token, "Discarding stale fund list");
            return false;
        }
        match result {
            Ok(funds) => {
                debug!(funds = funds.len(), "Fund list loaded");
                self.rows = normalize_funds(funds);
                self.state = OpState::Success;
            }
            Err(e) => {
                error!(error = %e, "Failed to load fund list");
                self.state = OpState::Error(FundsError::from_all_funds(&e));
            }
        }
        true
    }

    pub async fn load(&mut self, api: &dyn FundsApi) {
        let token = self.begin_load();
        let result = api.list_funds().await;
        self.complete_load(token, result);
    }

    /// Derives the table for the current sort state. Nothing is cached.
    pub fn view(&self, sort: &SortState, strategy: HeaderStrategy) -> TableView {
        TableView {
            category_headers: category_headers(&self.rows, strategy),
            rows: sort_rows(&self.rows, sort),
        }
    }
}
