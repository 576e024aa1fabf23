use super::{ReportError, ReportResult};
use crate::expenses::ExpenseRecord;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::Path;
use tracing::warn;

const CATEGORY_HEADERS: &[&str] = &["categoria", "categoría", "category"];
const AMOUNT_HEADERS: &[&str] = &["monto", "amount"];

/// Read expenses from a CSV sheet, largest amount first.
///
/// Headers are matched case-insensitively. Rows with no category are skipped.
pub fn read_expenses(path: &Path) -> ReportResult<Vec<ExpenseRecord>> {
    let sheet_error = |source| ReportError::Sheet {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(sheet_error)?;

    let headers = reader.headers().map_err(sheet_error)?.clone();
    let category_idx = find_column(&headers, CATEGORY_HEADERS).ok_or(ReportError::MissingColumn {
        path: path.to_path_buf(),
        column: "Categoria",
    })?;
    let amount_idx = find_column(&headers, AMOUNT_HEADERS).ok_or(ReportError::MissingColumn {
        path: path.to_path_buf(),
        column: "Monto",
    })?;

    let mut expenses = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row.map_err(sheet_error)?;
        // Header is line 1.
        let line = i + 2;

        let category = row.get(category_idx).unwrap_or("");
        let raw_amount = row.get(amount_idx).unwrap_or("");

        if category.is_empty() && raw_amount.is_empty() {
            continue;
        }
        if category.is_empty() {
            warn!(row = line, "Skipping expense without a category");
            continue;
        }

        let amount = parse_amount(raw_amount).ok_or_else(|| ReportError::InvalidAmount {
            row: line,
            value: raw_amount.to_string(),
        })?;

        expenses.push(ExpenseRecord::new(category, amount));
    }

    expenses.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    Ok(expenses)
}

fn find_column(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|header| names.contains(&header.to_lowercase().as_str()))
}

/// Parse a spreadsheet amount such as `1,234.50` or `$ 80`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
