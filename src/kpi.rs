//! KPI extraction and alignment: fixed per-statement KPI name lists, row
//! lookup by exact line-item name, re-indexing by fiscal year, and the
//! two-company year intersection that drives the comparison table.

use std::collections::BTreeMap;

use crate::format::amount_of;
use crate::models::{
    DateRange, FinancialStatement, KpiRecord, Performance, StatementType, TrendStatement,
    TrendVerdict,
};

/// Lookup table of KPI line-item names per statement type. The provider's
/// naming vocabulary is not guaranteed stable, so callers depend on this
/// trait rather than hardcoded lists.
pub trait KpiCatalog {
    fn kpis(&self, statement_type: StatementType) -> &[&str];
}

/// The fixed lists used by the dashboard
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultKpiCatalog;

impl KpiCatalog for DefaultKpiCatalog {
    fn kpis(&self, statement_type: StatementType) -> &[&str] {
        match statement_type {
            StatementType::IncomeStatement => &[
                "Total Revenue",
                "Net Income",
                "Gross Profit",
                "Operating Income or Loss",
            ],
            StatementType::BalanceSheet => &[
                "Total Assets",
                "Total Liab",
                "Total Stockholder Equity",
                "Current Assets",
                "Current Liabilities",
            ],
            StatementType::CashFlow => &[
                "Total Cash From Operating Activities",
                "Free Cash Flow",
                "Capital Expenditures",
                "Change In Cash",
            ],
        }
    }
}

/// One KPI's amounts re-indexed by fiscal year, ascending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpiSeries {
    values: BTreeMap<i32, i64>,
}

impl KpiSeries {
    pub fn get(&self, year: i32) -> Option<i64> {
        self.values.get(&year).copied()
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Mean period-over-period percentage change across the series, in
    /// ascending year order. `None` for series with fewer than two points;
    /// a zero base period yields an infinite (or undefined) change and the
    /// mean carries it, which downstream comparison treats as no winner.
    pub fn mean_growth(&self) -> Option<f64> {
        if self.values.len() < 2 {
            return None;
        }

        let amounts: Vec<f64> = self.values.values().map(|v| *v as f64).collect();
        let changes: Vec<f64> = amounts
            .windows(2)
            .map(|pair| (pair[1] - pair[0]) / pair[0])
            .collect();

        Some(changes.iter().sum::<f64>() / changes.len() as f64)
    }
}

/// Pull one KPI row out of a statement and re-index it by fiscal year,
/// restricted to [start_year, end_year] inclusive. Returns `None` when the
/// line item is absent (provider naming variance); missing cells inside a
/// present row normalize to zero.
pub fn extract_series(
    statement: &FinancialStatement,
    kpi: &str,
    range: DateRange,
) -> Option<KpiSeries> {
    let row = statement.row(kpi)?;

    // Ascending date order so the latest period within a fiscal year wins
    let mut dated: Vec<(chrono::NaiveDate, Option<f64>)> = statement
        .periods
        .iter()
        .copied()
        .zip(row.values.iter().copied())
        .collect();
    dated.sort_unstable_by_key(|(date, _)| *date);

    let mut values = BTreeMap::new();
    for (date, value) in dated {
        let year = chrono::Datelike::year(&date);
        if year >= range.start_year() && year <= range.end_year() {
            values.insert(year, amount_of(value));
        }
    }

    Some(KpiSeries { values })
}

/// Fiscal years present in both series, ascending
pub fn shared_years(series1: &KpiSeries, series2: &KpiSeries) -> Vec<i32> {
    series1
        .years()
        .filter(|year| series2.get(*year).is_some())
        .collect()
}

fn performance_of(value1: i64, value2: i64) -> Performance {
    if value1 > value2 {
        Performance::Company1
    } else if value2 > value1 {
        Performance::Company2
    } else {
        Performance::Tie
    }
}

fn trend_verdict(series1: &KpiSeries, series2: &KpiSeries) -> TrendVerdict {
    match (series1.mean_growth(), series2.mean_growth()) {
        (Some(growth1), Some(growth2)) => match growth1.partial_cmp(&growth2) {
            Some(std::cmp::Ordering::Greater) => TrendVerdict::Company1Better,
            Some(std::cmp::Ordering::Less) => TrendVerdict::Company2Better,
            // Equal means, or an undefined mean from a zero base period
            _ => TrendVerdict::Similar,
        },
        _ => TrendVerdict::Similar,
    }
}

/// Walk the KPI list in order and build the aligned comparison rows plus one
/// trend statement per KPI present in both statements. KPIs absent from
/// either statement contribute nothing; years present in only one company
/// are dropped, not zero-filled.
pub fn align_kpis(
    catalog: &dyn KpiCatalog,
    statement1: &FinancialStatement,
    statement2: &FinancialStatement,
    statement_type: StatementType,
    range: DateRange,
) -> (Vec<KpiRecord>, Vec<TrendStatement>) {
    let mut records = Vec::new();
    let mut trends = Vec::new();

    for kpi in catalog.kpis(statement_type) {
        let Some(series1) = extract_series(statement1, kpi, range) else {
            continue;
        };
        let Some(series2) = extract_series(statement2, kpi, range) else {
            continue;
        };

        for year in shared_years(&series1, &series2) {
            let value1 = series1.get(year).unwrap_or(0);
            let value2 = series2.get(year).unwrap_or(0);
            records.push(KpiRecord {
                kpi: kpi.to_string(),
                year,
                value1,
                value2,
                performance: performance_of(value1, value2),
            });
        }

        // Trend uses each company's own filtered series independently of the
        // year intersection above
        trends.push(TrendStatement {
            kpi: kpi.to_string(),
            verdict: trend_verdict(&series1, &series2),
        });
    }

    (records, trends)
}
