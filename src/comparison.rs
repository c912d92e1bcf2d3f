//! One comparison run: two sequential provider fetches, then a pure
//! alignment step producing the `ComparisonRun` the presentation layer
//! consumes.

use anyhow::Result;
use tracing::info;

use crate::api::StatementProvider;
use crate::kpi::{align_kpis, DefaultKpiCatalog, KpiCatalog};
use crate::models::{ChartSeries, ChartSpec, ComparisonRequest, ComparisonRun, KpiRecord};

/// Drives comparison runs against a statement provider
pub struct ComparisonEngine<P> {
    provider: P,
    catalog: Box<dyn KpiCatalog + Send + Sync>,
}

impl<P: StatementProvider> ComparisonEngine<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            catalog: Box::new(DefaultKpiCatalog),
        }
    }

    /// Swap the KPI vocabulary, e.g. for a provider with different line-item names
    pub fn with_catalog(provider: P, catalog: Box<dyn KpiCatalog + Send + Sync>) -> Self {
        Self { provider, catalog }
    }

    /// Execute one run to completion: fetch both statements (sequentially,
    /// one provider call per company) and build the comparison. A fetch
    /// failure aborts the run and surfaces to the caller.
    pub async fn run(&self, request: ComparisonRequest) -> Result<ComparisonRun> {
        info!(
            "Comparing {} vs {} on {}",
            request.company1.symbol, request.company2.symbol, request.statement_type
        );

        let statement1 = self
            .provider
            .fetch_statement(&request.company1.symbol, request.statement_type)
            .await?;
        let statement2 = self
            .provider
            .fetch_statement(&request.company2.symbol, request.statement_type)
            .await?;

        Ok(compare(
            request,
            statement1,
            statement2,
            self.catalog.as_ref(),
        ))
    }
}

/// The pure half of a run: given both statements, build the KPI table, the
/// trend statements, and the chart specification. No I/O, fully testable.
pub fn compare(
    request: ComparisonRequest,
    statement1: crate::models::FinancialStatement,
    statement2: crate::models::FinancialStatement,
    catalog: &dyn KpiCatalog,
) -> ComparisonRun {
    let (kpi_rows, trends) = align_kpis(
        catalog,
        &statement1,
        &statement2,
        request.statement_type,
        request.range,
    );

    let chart = build_chart(&request, &kpi_rows);

    ComparisonRun {
        request,
        statement1,
        statement2,
        kpi_rows,
        trends,
        chart,
    }
}

/// Derive the chart series from the KPI table: one series per (KPI, company),
/// KPIs in table order, years ascending. An empty table yields an empty
/// chart, not an error.
fn build_chart(request: &ComparisonRequest, rows: &[KpiRecord]) -> ChartSpec {
    let mut series: Vec<ChartSeries> = Vec::new();

    for row in rows {
        let has_kpi = series.iter().any(|s| s.kpi == row.kpi);
        if !has_kpi {
            for company_index in 0..2 {
                series.push(ChartSeries {
                    kpi: row.kpi.clone(),
                    company_index,
                    points: Vec::new(),
                });
            }
        }
        for s in series.iter_mut().filter(|s| s.kpi == row.kpi) {
            let value = if s.company_index == 0 {
                row.value1
            } else {
                row.value2
            };
            s.points.push((row.year, value));
        }
    }

    ChartSpec {
        chart_type: request.chart_type,
        title: format!("{} KPIs Comparison", request.statement_type),
        series,
    }
}
