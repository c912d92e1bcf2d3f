//! Alignment properties: year intersection, strict-greater performance
//! labels, and silent exclusion of KPIs missing from either statement.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use fincompare::kpi::{align_kpis, extract_series, DefaultKpiCatalog, KpiCatalog};
use fincompare::models::{DateRange, Performance, StatementType};

use crate::common::{aapl_income, msft_income, statement_with};

fn spec_range() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
        NaiveDate::from_ymd_opt(2024, 2, 4).unwrap(),
    )
}

#[test]
fn year_set_is_sorted_intersection_within_range() {
    // AAPL reports 2022..2024; give the other side only 2021..2023
    let other = statement_with(
        "OTHR",
        StatementType::IncomeStatement,
        &[(2023, 3, 31), (2022, 3, 31), (2021, 3, 31)],
        &[(
            "Total Revenue",
            &[Some(90.0), Some(80.0), Some(70.0)],
        )],
    );

    let (records, _) = align_kpis(
        &DefaultKpiCatalog,
        &aapl_income(),
        &other,
        StatementType::IncomeStatement,
        spec_range(),
    );

    let revenue_years: Vec<i32> = records
        .iter()
        .filter(|r| r.kpi == "Total Revenue")
        .map(|r| r.year)
        .collect();
    // 2022 and 2021 fall outside the range, 2024 exists only for AAPL
    assert_eq!(revenue_years, vec![2023]);
}

#[test]
fn performance_label_iff_strictly_greater() {
    let (records, _) = align_kpis(
        &DefaultKpiCatalog,
        &aapl_income(),
        &msft_income(),
        StatementType::IncomeStatement,
        spec_range(),
    );

    assert!(!records.is_empty());
    for record in &records {
        assert_eq!(
            record.performance == Performance::Company1,
            record.value1 > record.value2,
            "KPI {} year {}",
            record.kpi,
            record.year
        );
        assert_eq!(
            record.performance == Performance::Company2,
            record.value2 > record.value1
        );
        assert_eq!(
            record.performance == Performance::Tie,
            record.value1 == record.value2
        );
    }
}

#[test]
fn rows_accumulate_in_kpi_list_order_then_year() {
    let (records, _) = align_kpis(
        &DefaultKpiCatalog,
        &aapl_income(),
        &msft_income(),
        StatementType::IncomeStatement,
        spec_range(),
    );

    let kpis = DefaultKpiCatalog.kpis(StatementType::IncomeStatement);
    let expected: Vec<(String, i32)> = kpis
        .iter()
        .flat_map(|kpi| [2023, 2024].into_iter().map(|year| (kpi.to_string(), year)))
        .collect();
    let actual: Vec<(String, i32)> = records
        .iter()
        .map(|r| (r.kpi.clone(), r.year))
        .collect();
    assert_eq!(actual, expected);
}

#[test]
fn absent_kpi_produces_no_rows_not_zero_fill() {
    // Strip one KPI from the MSFT side entirely
    let mut msft = msft_income();
    msft.rows.retain(|row| row.name != "Operating Income or Loss");

    let (records, trends) = align_kpis(
        &DefaultKpiCatalog,
        &aapl_income(),
        &msft,
        StatementType::IncomeStatement,
        spec_range(),
    );

    assert!(records.iter().all(|r| r.kpi != "Operating Income or Loss"));
    assert!(trends.iter().all(|t| t.kpi != "Operating Income or Loss"));
    // The remaining KPIs are unaffected
    assert!(records.iter().any(|r| r.kpi == "Total Revenue"));
}

#[test]
fn extraction_is_an_explicit_option_not_an_exception() {
    let aapl = aapl_income();
    assert!(extract_series(&aapl, "Total Revenue", spec_range()).is_some());
    assert!(extract_series(&aapl, "Totaal Omzet", spec_range()).is_none());

    // Present KPI with an empty in-range series still reports Some
    let narrow = DateRange::new(
        NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2010, 12, 31).unwrap(),
    );
    let series = extract_series(&aapl, "Total Revenue", narrow).unwrap();
    assert!(series.is_empty());
}
