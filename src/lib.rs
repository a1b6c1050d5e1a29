pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::search::ValueEdit;
use crate::core::config::AppConfig;
use crate::core::route::{Route, SearchParams};
use crate::core::sort_state::SortState;
use crate::core::workflow::FundSearch;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info};

pub enum AppCommand {
    /// All-funds table, sorted by the state in `location` and then `clicks`.
    Funds {
        location: Option<String>,
        clicks: Vec<String>,
        export: bool,
        out_dir: Option<PathBuf>,
    },
    Search(SearchParams),
    /// Any view addressed by its location.
    Open(String),
    Edit {
        params: SearchParams,
        date: String,
        edits: Vec<ValueEdit>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Fon Takip Sistemi starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let api = providers::FundServiceClient::new(&config.api.base_url)
        .context("Failed to create fund service client")?;

    match command {
        AppCommand::Funds {
            location,
            clicks,
            export,
            out_dir,
        } => {
            let sort = match location.as_deref().map(Route::parse).transpose()? {
                Some(Route::AllFunds { sort }) => sort,
                Some(Route::Search { .. }) => {
                    anyhow::bail!("Location does not address the all-funds view")
                }
                None => SortState::default(),
            };
            let options = cli::funds::FundsOptions {
                sort,
                clicks,
                export,
                out_dir,
            };
            cli::funds::run(&api, &config, options).await
        }
        AppCommand::Search(form) => cli::search::run(&api, &config, form).await,
        AppCommand::Open(location) => match Route::parse(&location)? {
            Route::AllFunds { sort } => {
                let options = cli::funds::FundsOptions {
                    sort,
                    ..Default::default()
                };
                cli::funds::run(&api, &config, options).await
            }
            Route::Search { params } => {
                let mut search = FundSearch::new(config.edit.validation);
                cli::search::open(&api, &mut search, &params).await;
                Ok(())
            }
        },
        AppCommand::Edit {
            params,
            date,
            edits,
        } => cli::search::edit(&api, &config, params, &date, &edits).await,
    }
}
