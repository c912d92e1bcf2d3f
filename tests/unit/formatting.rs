//! Display-formatting properties: grouped integer strings for every numeric
//! cell, labels untouched, missing values shown as zero.

use pretty_assertions::assert_eq;

use fincompare::format::{format_statement, group_digits};
use fincompare::models::StatementType;

use crate::common::statement_with;

#[test]
fn grouped_strings_match_integer_values() {
    let cases: [(i64, &str); 8] = [
        (0, "0"),
        (5, "5"),
        (999, "999"),
        (1_000, "1,000"),
        (1_234_567, "1,234,567"),
        (391_035_000_000, "391,035,000,000"),
        (-7, "-7"),
        (-12_345_678, "-12,345,678"),
    ];
    for (value, expected) in cases {
        assert_eq!(group_digits(value), expected);
    }
}

#[test]
fn statement_display_copy_groups_every_numeric_cell() {
    let statement = statement_with(
        "KO",
        StatementType::BalanceSheet,
        &[(2023, 12, 31), (2022, 12, 31)],
        &[
            ("Total Assets", &[Some(97_703_000_000.0), Some(92_763_000_000.0)]),
            ("Total Liab", &[Some(70_223_000_000.0), None]),
        ],
    );

    let table = format_statement(&statement);
    assert_eq!(table.headers[0], "Line Item");
    assert_eq!(table.headers[1], "2023-12-31");

    // Label cells pass through unchanged, numeric cells are grouped
    assert_eq!(
        table.rows[0],
        vec!["Total Assets", "97,703,000,000", "92,763,000,000"]
    );
    // Missing values normalize to zero before display
    assert_eq!(table.rows[1], vec!["Total Liab", "70,223,000,000", "0"]);
}

#[test]
fn fractional_amounts_truncate_toward_zero() {
    let statement = statement_with(
        "KO",
        StatementType::CashFlow,
        &[(2023, 12, 31)],
        &[
            ("Free Cash Flow", &[Some(1_999.9)]),
            ("Change In Cash", &[Some(-1_999.9)]),
        ],
    );

    let table = format_statement(&statement);
    assert_eq!(table.rows[0][1], "1,999");
    assert_eq!(table.rows[1][1], "-1,999");
}
