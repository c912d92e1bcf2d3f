use anyhow::Result;
use chrono::{Duration, NaiveDate, Utc};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::models::{Config, FinancialStatement, StatementRow, StatementType};
use super::{ApiRateLimiter, StatementProvider};

/// Errors surfaced by the fundamentals endpoint
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// How many years of annual periods to request. The comparison filters by
/// fiscal year afterwards, so the fetch window just has to cover the pickers.
const FETCH_YEARS_BACK: i64 = 6;

/// Provider vocabulary: timeseries field name to line-item display name.
/// This mapping is the only place provider naming lives; swapping providers
/// means swapping this table, not the extraction logic.
fn field_vocabulary(statement_type: StatementType) -> &'static [(&'static str, &'static str)] {
    match statement_type {
        StatementType::IncomeStatement => &[
            ("annualTotalRevenue", "Total Revenue"),
            ("annualCostOfRevenue", "Cost Of Revenue"),
            ("annualGrossProfit", "Gross Profit"),
            ("annualOperatingIncome", "Operating Income or Loss"),
            ("annualOperatingExpense", "Total Operating Expenses"),
            ("annualPretaxIncome", "Income Before Tax"),
            ("annualNetIncome", "Net Income"),
            ("annualBasicEPS", "Basic EPS"),
        ],
        StatementType::BalanceSheet => &[
            ("annualTotalAssets", "Total Assets"),
            ("annualCurrentAssets", "Current Assets"),
            ("annualCashAndCashEquivalents", "Cash"),
            ("annualTotalLiabilitiesNetMinorityInterest", "Total Liab"),
            ("annualCurrentLiabilities", "Current Liabilities"),
            ("annualStockholdersEquity", "Total Stockholder Equity"),
            ("annualLongTermDebt", "Long Term Debt"),
            ("annualRetainedEarnings", "Retained Earnings"),
        ],
        StatementType::CashFlow => &[
            (
                "annualOperatingCashFlow",
                "Total Cash From Operating Activities",
            ),
            (
                "annualInvestingCashFlow",
                "Total Cashflows From Investing Activities",
            ),
            (
                "annualFinancingCashFlow",
                "Total Cash From Financing Activities",
            ),
            ("annualCapitalExpenditure", "Capital Expenditures"),
            ("annualFreeCashFlow", "Free Cash Flow"),
            ("annualChangesInCash", "Change In Cash"),
        ],
    }
}

/// Client for the Yahoo fundamentals-timeseries endpoint
pub struct YahooFundamentalsClient {
    client: Client,
    base_url: String,
    rate_limiter: ApiRateLimiter,
}

impl YahooFundamentalsClient {
    /// Create a new fundamentals client
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .user_agent("fincompare/0.1")
            .build()?;

        let rate_limiter = ApiRateLimiter::new(config.rate_limit_per_minute);

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            rate_limiter,
        })
    }

    fn timeseries_url(&self, symbol: &str, statement_type: StatementType) -> Result<Url> {
        let now = Utc::now();
        let period1 = (now - Duration::days(365 * FETCH_YEARS_BACK)).timestamp();
        let period2 = now.timestamp();

        let fields: Vec<&str> = field_vocabulary(statement_type)
            .iter()
            .map(|(field, _)| *field)
            .collect();

        let mut url = Url::parse(&self.base_url)?;
        url.set_path(&format!(
            "/ws/fundamentals-timeseries/v1/finance/timeseries/{}",
            symbol
        ));
        url.query_pairs_mut()
            .append_pair("symbol", symbol)
            .append_pair("type", &fields.join(","))
            .append_pair("period1", &period1.to_string())
            .append_pair("period2", &period2.to_string())
            .append_pair("merge", "false");

        Ok(url)
    }

    /// Make a request and return the raw JSON payload
    async fn make_request(&self, url: Url) -> Result<Value, ProviderError> {
        self.rate_limiter.wait().await;

        debug!("Making request to: {}", url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let json: Value = response.json().await?;
        debug!(
            "API response received: {} bytes",
            serde_json::to_string(&json).unwrap_or_default().len()
        );

        Ok(json)
    }
}

/// Parse one timeseries payload into a statement table. Fields the provider
/// did not report simply produce no row, matching the "row absent" behavior
/// downstream extraction relies on.
fn parse_timeseries(
    symbol: &str,
    statement_type: StatementType,
    data: &Value,
) -> Result<FinancialStatement, ProviderError> {
    let results = data
        .get("timeseries")
        .and_then(|t| t.get("result"))
        .and_then(|r| r.as_array())
        .ok_or_else(|| ProviderError::Malformed("missing timeseries.result".to_string()))?;

    let vocabulary = field_vocabulary(statement_type);

    // Gather per-field observations keyed by period end date
    let mut observations: Vec<(&'static str, Vec<(NaiveDate, f64)>)> = Vec::new();
    for (field, display_name) in vocabulary {
        let mut points = Vec::new();
        for entry in results {
            let Some(values) = entry.get(*field).and_then(|v| v.as_array()) else {
                continue;
            };
            for item in values {
                let Some(date_str) = item.get("asOfDate").and_then(|d| d.as_str()) else {
                    continue;
                };
                let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") else {
                    warn!("Unparseable period end date from provider: {}", date_str);
                    continue;
                };
                let raw = item
                    .get("reportedValue")
                    .and_then(|rv| rv.get("raw"))
                    .and_then(|r| r.as_f64())
                    .or_else(|| item.get("raw").and_then(|r| r.as_f64()));
                if let Some(value) = raw {
                    points.push((date, value));
                }
            }
        }
        if !points.is_empty() {
            observations.push((display_name, points));
        }
    }

    // Columns are the union of period end dates, most recent first
    let mut periods: Vec<NaiveDate> = observations
        .iter()
        .flat_map(|(_, points)| points.iter().map(|(date, _)| *date))
        .collect();
    periods.sort_unstable();
    periods.dedup();
    periods.reverse();

    let mut statement = FinancialStatement::new(symbol, statement_type, periods);
    for (name, points) in observations {
        let values = statement
            .periods
            .iter()
            .map(|period| {
                points
                    .iter()
                    .find(|(date, _)| date == period)
                    .map(|(_, value)| *value)
            })
            .collect();
        statement.rows.push(StatementRow {
            name: name.to_string(),
            values,
        });
    }

    Ok(statement)
}

#[async_trait::async_trait]
impl StatementProvider for YahooFundamentalsClient {
    async fn fetch_statement(
        &self,
        symbol: &str,
        statement_type: StatementType,
    ) -> Result<FinancialStatement> {
        let url = self.timeseries_url(symbol, statement_type)?;
        let data = self.make_request(url).await?;
        let statement = parse_timeseries(symbol, statement_type, &data)?;

        debug!(
            "Retrieved {} with {} line items over {} periods for {}",
            statement_type,
            statement.rows.len(),
            statement.periods.len(),
            symbol
        );
        Ok(statement)
    }
}
