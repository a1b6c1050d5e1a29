use super::ui;
use crate::core::config::AppConfig;
use crate::core::export::{self, FUND_CODE_LABEL, LONG_NAME_LABEL};
use crate::core::listing::{FundListing, TableView};
use crate::core::sort_state::{FUND_CODE_KEY, LONG_NAME_KEY, SortState};
use crate::core::workflow::OpState;
use crate::core::FundsApi;
use anyhow::Result;
use comfy_table::{Attribute, Cell};
use std::path::PathBuf;
use tracing::info;

pub const MSG_NO_FUNDS: &str = "Hiç fon bilgisi bulunamadı.";

/// Options of the all-funds view.
#[derive(Debug, Clone, Default)]
pub struct FundsOptions {
    pub sort: SortState,
    /// Column headers clicked in order, applied after `sort`.
    pub clicks: Vec<String>,
    pub export: bool,
    pub out_dir: Option<PathBuf>,
}

pub async fn run(api: &dyn FundsApi, config: &AppConfig, options: FundsOptions) -> Result<()> {
    info!("Loading all funds...");

    let mut listing = FundListing::new();
    let pb = ui::new_spinner("Yükleniyor...");
    listing.load(api).await;
    pb.finish_and_clear();

    if let OpState::Error(e) = &listing.state {
        eprintln!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
        return Ok(());
    }

    let sort = options
        .clicks
        .iter()
        .fold(options.sort, |state, key| state.click(key));
    println!(
        "{}",
        ui::style_text(&sort.to_location(), ui::StyleType::Subtle)
    );

    if listing.rows().is_empty() {
        println!("{MSG_NO_FUNDS}");
        return Ok(());
    }

    let view = listing.view(&sort, config.table.headers);
    println!(
        "\n{}",
        ui::style_text("Tüm Fonların Güncel Getirileri", ui::StyleType::Title)
    );
    println!("{}", render_table(&view, &sort));

    if options.export {
        let dir = options
            .out_dir
            .unwrap_or_else(|| config.export_directory());
        let today = chrono::Utc::now().date_naive();
        let path = export::write_to_dir(&dir, &view.rows, &view.category_headers, today)?;
        println!(
            "{}",
            ui::style_text(
                &format!("Excel'e aktarıldı: {}", path.display()),
                ui::StyleType::Success
            )
        );
    }

    Ok(())
}

fn sortable_header(label: &str, key: &str, sort: &SortState) -> Cell {
    match sort.indicator(key) {
        Some(arrow) => {
            ui::header_cell(&format!("{label} {arrow}")).add_attribute(Attribute::Underlined)
        }
        None => ui::header_cell(label),
    }
}

pub fn render_table(view: &TableView, sort: &SortState) -> String {
    let mut table = ui::new_styled_table();

    let mut header = vec![
        sortable_header(FUND_CODE_LABEL, FUND_CODE_KEY, sort),
        sortable_header(LONG_NAME_LABEL, LONG_NAME_KEY, sort),
    ];
    header.extend(
        view.category_headers
            .iter()
            .map(|h| sortable_header(h, h, sort)),
    );
    table.set_header(header);

    for row in &view.rows {
        let mut cells = vec![
            Cell::new(&row.fund.fund_code),
            Cell::new(&row.fund.long_name),
        ];
        cells.extend(
            view.category_headers
                .iter()
                .map(|h| ui::return_cell(row.category_value(h), 2)),
        );
        table.add_row(cells);
    }

    table.to_string()
}
