//! Trend narration properties: mean period-over-period growth comparison
//! per KPI, with a neutral line on equal or undefined means.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use fincompare::kpi::{align_kpis, DefaultKpiCatalog};
use fincompare::models::{DateRange, Performance, StatementType, TrendVerdict};

use crate::common::{aapl_income, msft_income, statement_with};

fn spec_range() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
        NaiveDate::from_ymd_opt(2024, 2, 4).unwrap(),
    )
}

#[test]
fn faster_growing_company_wins_the_trend() {
    let (_, trends) = align_kpis(
        &DefaultKpiCatalog,
        &aapl_income(),
        &msft_income(),
        StatementType::IncomeStatement,
        spec_range(),
    );

    // Revenue 2023 -> 2024: AAPL +2.0%, MSFT +15.7%
    let revenue = trends.iter().find(|t| t.kpi == "Total Revenue").unwrap();
    assert_eq!(revenue.verdict, TrendVerdict::Company2Better);

    // Net income: AAPL -3.4%, MSFT +21.8%
    let net_income = trends.iter().find(|t| t.kpi == "Net Income").unwrap();
    assert_eq!(net_income.verdict, TrendVerdict::Company2Better);
}

#[test]
fn identical_series_are_all_ties_with_a_similar_trend() {
    let periods = [(2024, 12, 31), (2023, 12, 31)];
    let rows: [(&str, &[Option<f64>]); 1] =
        [("Total Revenue", &[Some(500.0), Some(400.0)])];
    let st1 = statement_with("ONE", StatementType::IncomeStatement, &periods, &rows);
    let st2 = statement_with("TWO", StatementType::IncomeStatement, &periods, &rows);

    let (records, trends) = align_kpis(
        &DefaultKpiCatalog,
        &st1,
        &st2,
        StatementType::IncomeStatement,
        spec_range(),
    );

    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.performance == Performance::Tie));

    assert_eq!(trends.len(), 1);
    assert_eq!(trends[0].verdict, TrendVerdict::Similar);
}

#[test]
fn single_point_series_yield_a_neutral_line() {
    // Only one in-range period each: no period-over-period change exists
    let st1 = statement_with(
        "ONE",
        StatementType::IncomeStatement,
        &[(2023, 12, 31)],
        &[("Total Revenue", &[Some(100.0)])],
    );
    let st2 = statement_with(
        "TWO",
        StatementType::IncomeStatement,
        &[(2023, 12, 31)],
        &[("Total Revenue", &[Some(900.0)])],
    );

    let (_, trends) = align_kpis(
        &DefaultKpiCatalog,
        &st1,
        &st2,
        StatementType::IncomeStatement,
        spec_range(),
    );

    assert_eq!(trends.len(), 1);
    assert_eq!(trends[0].verdict, TrendVerdict::Similar);
}

#[test]
fn trend_uses_each_companys_own_series_not_the_intersection() {
    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
    );

    // Company one reports 2023-2024, company two also reports 2022; the
    // table intersects to {2023, 2024} but company two's trend still
    // includes its 2022 -> 2023 collapse.
    let st1 = statement_with(
        "ONE",
        StatementType::IncomeStatement,
        &[(2024, 3, 31), (2023, 3, 31)],
        &[("Total Revenue", &[Some(110.0), Some(100.0)])],
    );
    let st2 = statement_with(
        "TWO",
        StatementType::IncomeStatement,
        &[(2024, 3, 31), (2023, 3, 31), (2022, 3, 31)],
        &[("Total Revenue", &[Some(120.0), Some(100.0), Some(1000.0)])],
    );

    let (records, trends) = align_kpis(
        &DefaultKpiCatalog,
        &st1,
        &st2,
        StatementType::IncomeStatement,
        range,
    );

    let years: Vec<i32> = records.iter().map(|r| r.year).collect();
    assert_eq!(years, vec![2023, 2024]);

    // On intersected years alone company two grows faster (+20% vs +10%),
    // but its own series averages in the -90% drop and loses the trend.
    assert_eq!(trends.len(), 1);
    assert_eq!(trends[0].verdict, TrendVerdict::Company1Better);
}
