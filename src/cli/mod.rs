pub mod funds;
pub mod search;
pub mod setup;
pub mod ui;
