use super::ui;
use crate::core::config::AppConfig;
use crate::core::edit::{EditSession, EditValue};
use crate::core::route::{Route, SearchParams};
use crate::core::workflow::FundSearch;
use crate::core::FundsApi;
use anyhow::{Result, anyhow, bail};
use comfy_table::Cell;
use tracing::{debug, info};

/// An edit request in `<category>=<value>` form.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueEdit {
    pub description: String,
    pub input: String,
}

impl std::str::FromStr for ValueEdit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (description, input) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected <category>=<value>, got '{}'", s))?;
        Ok(ValueEdit {
            description: description.trim().to_string(),
            input: input.to_string(),
        })
    }
}

/// Runs a search from form input: validate, navigate, fetch, render.
pub async fn run(api: &dyn FundsApi, config: &AppConfig, form: SearchParams) -> Result<()> {
    let mut search = FundSearch::new(config.edit.validation);
    search.fund_code = form.fund_code;
    search.start_date = form.start_date;
    search.end_date = form.end_date;

    let location = match search.search() {
        Ok(location) => location,
        Err(e) => {
            eprintln!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
            return Ok(());
        }
    };
    debug!("Navigating to {}", location);
    println!("{}", ui::style_text(&location, ui::StyleType::Subtle));

    let Route::Search { params } = Route::parse(&location)? else {
        bail!("Search produced a non-search location: {}", location);
    };
    open(api, &mut search, &params).await;
    Ok(())
}

/// Shows the detail view for a search location.
pub async fn open(api: &dyn FundsApi, search: &mut FundSearch, params: &SearchParams) {
    if params.fund_code.is_empty() {
        println!("{}", ui::style_text("Fon Getirisi Arama", ui::StyleType::Title));
        println!("Fon Kodunu Girin (örnek: TTE)");
        return;
    }

    let pb = ui::new_spinner("Veriler yükleniyor...");
    search.navigate(api, params).await;
    pb.finish_and_clear();

    display(search);
}

/// Fetches a fund, edits one day and saves it.
pub async fn edit(
    api: &dyn FundsApi,
    config: &AppConfig,
    params: SearchParams,
    date: &str,
    edits: &[ValueEdit],
) -> Result<()> {
    let mut search = FundSearch::new(config.edit.validation);
    let pb = ui::new_spinner("Veriler yükleniyor...");
    search.navigate(api, &params).await;
    pb.finish_and_clear();

    if let Some(e) = search.fetch_state.error() {
        eprintln!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
        return Ok(());
    }
    if !search.open_edit_for_date(date) {
        bail!(
            "No returns for {} on {} in the loaded range",
            params.fund_code,
            date
        );
    }

    for edit in edits {
        if !search.edit_value(&edit.description, &edit.input) {
            eprintln!(
                "{}",
                ui::style_text(
                    &format!("Bilinmeyen getiri türü: {}", edit.description),
                    ui::StyleType::Error
                )
            );
        }
    }

    let pb = ui::new_spinner("Kaydediliyor...");
    let result = search.save(api).await;
    pb.finish_and_clear();

    match result {
        Ok(()) => {
            info!(fund = %params.fund_code, %date, "Edit saved");
            println!(
                "{}",
                ui::style_text("Getiriler güncellendi.", ui::StyleType::Success)
            );
            display(&search);
        }
        Err(e) => {
            eprintln!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
            if let Some(session) = &search.edit {
                println!("{}", render_session(session));
            }
        }
    }
    Ok(())
}

/// Prints the loaded days, or the fetch error.
pub fn display(search: &FundSearch) {
    if let Some(e) = search.fetch_state.error() {
        eprintln!(
            "{} {}",
            ui::style_text("Hata!", ui::StyleType::Error),
            ui::style_text(&e.to_string(), ui::StyleType::Error)
        );
        return;
    }
    let Some(days) = search.fund_info.as_ref().filter(|d| !d.is_empty()) else {
        return;
    };

    let first = &days[0];
    println!(
        "\n{}",
        ui::style_text(
            &format!("{} ({})", first.long_name, first.fund_code),
            ui::StyleType::Title
        )
    );
    if let Some(desc) = &first.fund_desc {
        println!("{desc}");
    }

    for (i, day) in days.iter().enumerate() {
        let mut table = ui::new_styled_table();
        table.set_header(
            day.returns
                .iter()
                .map(|r| ui::header_cell(&r.description))
                .collect::<Vec<_>>(),
        );
        table.add_row(
            day.returns
                .iter()
                .map(|r| ui::return_cell(r.value, 4))
                .collect::<Vec<_>>(),
        );
        println!("\n{}", ui::style_text(&ui::format_date_tr(&day.date), ui::StyleType::Title));
        println!("{table}");
        if i < days.len() - 1 {
            ui::print_separator();
        }
    }
}

/// Renders an open edit session, flagging values that will not be saved as numbers.
pub fn render_session(session: &EditSession) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(&format!(
            "{} - {}",
            session.fund_code,
            ui::format_date_tr(&session.date)
        )),
        ui::header_cell("Değer"),
    ]);
    for entry in &session.entries {
        let value = match &entry.value {
            EditValue::Number(v) => ui::return_cell(Some(*v), 4),
            EditValue::Empty => ui::return_cell(None, 4),
            EditValue::Invalid(raw) => {
                Cell::new(format!("{raw:?} (geçersiz)")).fg(comfy_table::Color::Red)
            }
        };
        table.add_row(vec![Cell::new(&entry.description), value]);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fund::{DayReturns, ReturnEntry};

    #[test]
    fn test_value_edit_parsing() {
        let edit: ValueEdit = "Günlük Getiri=1.25".parse().unwrap();
        assert_eq!(edit.description, "Günlük Getiri");
        assert_eq!(edit.input, "1.25");

        let empty: ValueEdit = "Aylık Getiri=".parse().unwrap();
        assert_eq!(empty.input, "");

        assert!("Aylık Getiri".parse::<ValueEdit>().is_err());
    }

    #[test]
    fn test_render_session_flags_invalid_values() {
        let mut session = EditSession::open(&DayReturns {
            fund_code: "TTE".to_string(),
            long_name: String::new(),
            fund_desc: None,
            date: "2024-01-05".to_string(),
            returns: vec![
                ReturnEntry::new("Günlük Getiri", Some(1.5)),
                ReturnEntry::new("Aylık Getiri", None),
            ],
        });
        session.set_value("Aylık Getiri", "abc");

        let output = render_session(&session);
        assert!(output.contains("TTE - 05.01.2024"));
        assert!(output.contains("1.5000%"));
        assert!(output.contains("\"abc\" (geçersiz)"));
    }
}
