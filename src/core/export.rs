//! Semicolon-delimited export of the all-funds table.
//!
//! Numbers use a decimal comma, so fields are separated by `;`. The document
//! starts with a UTF-8 byte-order mark so spreadsheet applications pick the
//! right encoding for Turkish labels.

use crate::core::fund::FundRow;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DELIMITER: &str = ";";
pub const BOM: char = '\u{FEFF}';
pub const FUND_CODE_LABEL: &str = "Fon Kodu";
pub const LONG_NAME_LABEL: &str = "Fon Ünvanı";
const FILE_PREFIX: &str = "fon_getirileri_";

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// Formats a return with two fractional digits and a decimal comma.
pub fn format_value(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.2}").replace('.', ","))
        .unwrap_or_default()
}

/// Renders rows, in the given order, under `category_headers`.
/// An empty row set yields the header line only.
pub fn render(rows: &[FundRow], category_headers: &[String]) -> String {
    let header = [FUND_CODE_LABEL, LONG_NAME_LABEL]
        .into_iter()
        .chain(category_headers.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(DELIMITER);

    let lines = rows.iter().map(|row| {
        let mut fields = vec![quote(&row.fund.fund_code), quote(&row.fund.long_name)];
        fields.extend(
            category_headers
                .iter()
                .map(|h| format_value(row.category_value(h))),
        );
        fields.join(DELIMITER)
    });

    let body = std::iter::once(header)
        .chain(lines)
        .collect::<Vec<_>>()
        .join("\n");
    format!("{BOM}{body}")
}

pub fn file_name(date: NaiveDate) -> String {
    format!("{FILE_PREFIX}{}.csv", date.format("%Y-%m-%d"))
}

/// Writes the export into `dir` and returns the created file path.
pub fn write_to_dir(
    dir: &Path,
    rows: &[FundRow],
    category_headers: &[String],
    date: NaiveDate,
) -> Result<PathBuf> {
    let path = dir.join(file_name(date));
    let document = render(rows, category_headers);
    debug!(rows = rows.len(), path = %path.display(), "Writing export");

    std::fs::write(&path, document)
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;

    info!("Exported {} funds to {}", rows.len(), path.display());
    Ok(path)
}
