//! Display formatting for statement tables: missing values become zero,
//! amounts are truncated to whole numbers, and numeric cells are rendered
//! with thousands separators. Label cells pass through untouched.

use crate::models::FinancialStatement;

/// A display copy of a table: header row plus string cells
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Normalize a raw cell to a whole-number amount: missing becomes zero,
/// fractions are truncated toward zero
pub fn amount_of(value: Option<f64>) -> i64 {
    value.unwrap_or(0.0) as i64
}

/// Render an integer amount with grouping separators, e.g. 1234567 -> "1,234,567"
pub fn group_digits(value: i64) -> String {
    let negative = value < 0;
    let digits = value.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Produce the display copy of a full statement. The first column carries the
/// line-item label; every other cell is a grouped whole-number amount.
pub fn format_statement(statement: &FinancialStatement) -> FormattedTable {
    let mut headers = Vec::with_capacity(statement.periods.len() + 1);
    headers.push("Line Item".to_string());
    headers.extend(
        statement
            .periods
            .iter()
            .map(|date| date.format("%Y-%m-%d").to_string()),
    );

    let rows = statement
        .rows
        .iter()
        .map(|row| {
            let mut cells = Vec::with_capacity(row.values.len() + 1);
            cells.push(row.name.clone());
            cells.extend(row.values.iter().map(|v| group_digits(amount_of(*v))));
            cells
        })
        .collect();

    FormattedTable { headers, rows }
}
