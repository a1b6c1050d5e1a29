use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fontakip::cli::search::ValueEdit;
use fontakip::core::log::init_logging;
use fontakip::core::route::SearchParams;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display returns of all funds
    Funds {
        /// Location carrying the sort state, e.g. "/?key=fundCode&direction=ascending"
        #[arg(short, long)]
        location: Option<String>,
        /// Click a column header (fundCode, longName or a return category); repeatable
        #[arg(long = "click")]
        clicks: Vec<String>,
        /// Export the sorted table to a semicolon-separated file
        #[arg(short, long)]
        export: bool,
        /// Directory for the exported file
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Search a fund's return history
    Search {
        /// Fund code, e.g. TTE
        code: Option<String>,
        /// First day to include (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// Last day to include (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
    },
    /// Open a view by location, e.g. "/search/TTE?startDate=2024-01-01"
    Open { location: String },
    /// Correct the returns of one day
    Edit {
        /// Fund code, e.g. TTE
        code: String,
        /// Day to edit (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// First day of the refreshed view (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// Last day of the refreshed view (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
        /// New value as "<category>=<value>"; repeatable
        #[arg(long = "set", required = true)]
        edits: Vec<ValueEdit>,
    },
}

fn search_params(code: Option<String>, start: Option<String>, end: Option<String>) -> SearchParams {
    SearchParams {
        fund_code: code.unwrap_or_default(),
        start_date: start.unwrap_or_default(),
        end_date: end.unwrap_or_default(),
    }
}

impl From<Commands> for fontakip::AppCommand {
    fn from(cmd: Commands) -> fontakip::AppCommand {
        match cmd {
            Commands::Funds {
                location,
                clicks,
                export,
                out,
            } => fontakip::AppCommand::Funds {
                location,
                clicks,
                export,
                out_dir: out,
            },
            Commands::Search { code, start, end } => {
                fontakip::AppCommand::Search(search_params(code, start, end))
            }
            Commands::Open { location } => fontakip::AppCommand::Open(location),
            Commands::Edit {
                code,
                date,
                start,
                end,
                edits,
            } => fontakip::AppCommand::Edit {
                params: search_params(Some(code), start, end),
                date,
                edits,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fontakip::cli::setup::setup(),
        Some(cmd) => fontakip::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
