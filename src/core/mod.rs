//! Fund-returns data engine

pub mod api;
pub mod collation;
pub mod compare;
pub mod config;
pub mod edit;
pub mod error;
pub mod export;
pub mod fund;
pub mod listing;
pub mod log;
pub mod normalize;
pub mod route;
pub mod sort_state;
pub mod workflow;

// Re-export main types for cleaner imports
pub use api::{FundQuery, FundsApi};
pub use error::{ApiError, FundsError};
pub use fund::{DayReturns, Fund, FundRow, ReturnEntry, ValueTone};
pub use sort_state::{Direction, SortState};
