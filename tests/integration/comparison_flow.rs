//! End-to-end comparison runs against the in-memory provider.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use fincompare::comparison::ComparisonEngine;
use fincompare::models::{
    ChartType, CompanySelection, ComparisonRequest, DateRange, StatementType, StatementRow,
};

use crate::common::{aapl_income, msft_income, FailingProvider, StubProvider};

fn income_request() -> ComparisonRequest {
    ComparisonRequest {
        company1: CompanySelection::new("Apple", "AAPL"),
        company2: CompanySelection::new("Microsoft", "MSFT"),
        statement_type: StatementType::IncomeStatement,
        chart_type: ChartType::Bar,
        range: DateRange::new(
            NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 4).unwrap(),
        ),
    }
}

#[tokio::test]
async fn apple_vs_microsoft_income_statement_scenario() {
    let provider = StubProvider::new().with(aapl_income()).with(msft_income());
    let engine = ComparisonEngine::new(provider);

    let run = engine.run(income_request()).await.unwrap();

    // Statements come back untouched for the snapshot tables
    assert_eq!(run.statement1.symbol, "AAPL");
    assert_eq!(run.statement2.symbol, "MSFT");

    // The four income-statement KPIs, each over fiscal years 2023 and 2024
    let mut kpis: Vec<&str> = run.kpi_rows.iter().map(|r| r.kpi.as_str()).collect();
    kpis.dedup();
    assert_eq!(
        kpis,
        vec![
            "Total Revenue",
            "Net Income",
            "Gross Profit",
            "Operating Income or Loss",
        ]
    );
    assert_eq!(run.kpi_rows.len(), 8);
    assert!(run
        .kpi_rows
        .iter()
        .all(|r| r.year == 2023 || r.year == 2024));

    // Spot check one row: 2023 revenue, Apple ahead
    let revenue_2023 = run
        .kpi_rows
        .iter()
        .find(|r| r.kpi == "Total Revenue" && r.year == 2023)
        .unwrap();
    assert_eq!(revenue_2023.value1, 383_285_000_000);
    assert_eq!(revenue_2023.value2, 211_915_000_000);
    assert_eq!(
        revenue_2023.performance.label("Apple", "Microsoft"),
        "Apple"
    );

    // One trend line per KPI with data
    assert_eq!(run.trends.len(), 4);

    // Grouped bar chart over both fiscal years, one series per (KPI, company)
    assert_eq!(run.chart.chart_type, ChartType::Bar);
    assert_eq!(run.chart.series.len(), 8);
    assert_eq!(run.chart.years(), vec![2023, 2024]);
    assert_eq!(run.chart.title, "Income Statement KPIs Comparison");
}

#[tokio::test]
async fn fetch_failure_aborts_the_run() {
    let engine = ComparisonEngine::new(FailingProvider);
    let err = engine.run(income_request()).await.unwrap_err();
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn unknown_ticker_aborts_the_run() {
    // Only AAPL is known; the second fetch fails and the run aborts
    let provider = StubProvider::new().with(aapl_income());
    let engine = ComparisonEngine::new(provider);

    let err = engine.run(income_request()).await.unwrap_err();
    assert!(err.to_string().contains("MSFT"));
}

#[tokio::test]
async fn empty_statements_degrade_to_empty_output() {
    let empty1 = fincompare::models::FinancialStatement::new(
        "AAPL",
        StatementType::IncomeStatement,
        vec![],
    );
    let empty2 = fincompare::models::FinancialStatement::new(
        "MSFT",
        StatementType::IncomeStatement,
        vec![],
    );
    let provider = StubProvider::new().with(empty1).with(empty2);
    let engine = ComparisonEngine::new(provider);

    let run = engine.run(income_request()).await.unwrap();
    assert!(run.kpi_rows.is_empty());
    assert!(run.trends.is_empty());
    // The chart degrades to an empty plot rather than a guarded no-op
    assert!(run.chart.is_empty());
}

#[tokio::test]
async fn kpi_with_no_shared_years_emits_trend_but_no_rows() {
    // Give MSFT a revenue row only for 2022, outside any 2023+ overlap
    let mut msft = msft_income();
    msft.periods = vec![NaiveDate::from_ymd_opt(2022, 6, 30).unwrap()];
    for row in &mut msft.rows {
        let last = row.values.last().copied().flatten();
        *row = StatementRow {
            name: row.name.clone(),
            values: vec![last],
        };
    }

    let provider = StubProvider::new().with(aapl_income()).with(msft);
    let engine = ComparisonEngine::new(provider);
    let run = engine.run(income_request()).await.unwrap();

    // Nothing intersects, so the table and chart are empty, but the KPIs
    // exist for both companies and still narrate (as neutral lines, since a
    // single point has no period-over-period change)
    assert!(run.kpi_rows.is_empty());
    assert_eq!(run.trends.len(), 4);
    assert!(run
        .trends
        .iter()
        .all(|t| t.verdict == fincompare::models::TrendVerdict::Similar));
}
