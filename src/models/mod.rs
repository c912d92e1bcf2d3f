use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One selectable company: display name plus provider ticker symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySelection {
    pub name: String,
    pub symbol: String,
}

impl CompanySelection {
    pub fn new(name: &str, symbol: &str) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
        }
    }
}

/// The fixed set of companies offered by the pickers
pub fn popular_companies() -> Vec<CompanySelection> {
    vec![
        CompanySelection::new("Apple", "AAPL"),
        CompanySelection::new("Microsoft", "MSFT"),
        CompanySelection::new("Amazon", "AMZN"),
        CompanySelection::new("Google", "GOOGL"),
        CompanySelection::new("Meta", "META"),
        CompanySelection::new("Tesla", "TSLA"),
        CompanySelection::new("Nvidia", "NVDA"),
        CompanySelection::new("Netflix", "NFLX"),
        CompanySelection::new("Coca-Cola", "KO"),
        CompanySelection::new("JP Morgan", "JPM"),
    ]
}

/// Statement category exposed by the financial data provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementType {
    BalanceSheet,
    IncomeStatement,
    CashFlow,
}

impl StatementType {
    pub const ALL: [StatementType; 3] = [
        StatementType::BalanceSheet,
        StatementType::IncomeStatement,
        StatementType::CashFlow,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StatementType::BalanceSheet => "Balance Sheet",
            StatementType::IncomeStatement => "Income Statement",
            StatementType::CashFlow => "Cash Flow",
        }
    }
}

impl std::fmt::Display for StatementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Chart style selection for the comparison chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartType {
    Bar,
    Line,
    Area,
}

impl ChartType {
    pub const ALL: [ChartType; 3] = [ChartType::Bar, ChartType::Line, ChartType::Area];

    pub fn label(&self) -> &'static str {
        match self {
            ChartType::Bar => "Bar Chart",
            ChartType::Line => "Line Chart",
            ChartType::Area => "Area Chart",
        }
    }
}

/// Date range for restricting fiscal years in the comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn start_year(&self) -> i32 {
        self.start.year()
    }

    pub fn end_year(&self) -> i32 {
        self.end.year()
    }
}

impl Default for DateRange {
    fn default() -> Self {
        // Picker defaults carried over from the original dashboard
        Self {
            start: NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 2, 4).unwrap(),
        }
    }
}

/// One line item row of a statement, aligned to the statement's period columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRow {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// A full financial statement as retrieved from the provider.
///
/// Rows are line items, columns are fiscal-period end dates with the most
/// recent period first (the provider contract). Values may be missing for
/// periods the provider did not report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatement {
    pub symbol: String,
    pub statement_type: StatementType,
    pub periods: Vec<NaiveDate>,
    pub rows: Vec<StatementRow>,
}

impl FinancialStatement {
    pub fn new(symbol: &str, statement_type: StatementType, periods: Vec<NaiveDate>) -> Self {
        Self {
            symbol: symbol.to_string(),
            statement_type,
            periods,
            rows: Vec::new(),
        }
    }

    /// Look up a line item by exact name
    pub fn row(&self, name: &str) -> Option<&StatementRow> {
        self.rows.iter().find(|r| r.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.periods.is_empty()
    }
}

/// Which company a KPI row favors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Performance {
    Company1,
    Company2,
    Tie,
}

impl Performance {
    /// Resolve to a display label given the two company names
    pub fn label<'a>(&self, company1: &'a str, company2: &'a str) -> &'a str {
        match self {
            Performance::Company1 => company1,
            Performance::Company2 => company2,
            Performance::Tie => "Tie",
        }
    }
}

/// One aligned (KPI, fiscal year) row of the comparison table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiRecord {
    pub kpi: String,
    pub year: i32,
    pub value1: i64,
    pub value2: i64,
    pub performance: Performance,
}

/// Trend comparison outcome for one KPI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendVerdict {
    Company1Better,
    Company2Better,
    Similar,
}

/// One narrated trend line per KPI with data for both companies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendStatement {
    pub kpi: String,
    pub verdict: TrendVerdict,
}

impl TrendStatement {
    /// Render the one-line qualitative comparison
    pub fn narrate(&self, company1: &str, company2: &str) -> String {
        match self.verdict {
            TrendVerdict::Company1Better => format!(
                "{} has a better trend in {} than {}.",
                company1, self.kpi, company2
            ),
            TrendVerdict::Company2Better => format!(
                "{} has a better trend in {} than {}.",
                company2, self.kpi, company1
            ),
            TrendVerdict::Similar => format!("Both have similar trends in {}.", self.kpi),
        }
    }
}

/// One chart series: a single company's values for one KPI over fiscal years
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub kpi: String,
    /// 0 = company1, 1 = company2
    pub company_index: usize,
    pub points: Vec<(i32, i64)>,
}

/// Chart specification derived from the KPI table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub chart_type: ChartType,
    pub title: String,
    pub series: Vec<ChartSeries>,
}

impl ChartSpec {
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }

    /// Fiscal years covered by any series, ascending
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|(y, _)| *y))
            .collect();
        years.sort_unstable();
        years.dedup();
        years
    }
}

/// Inputs for one comparison run, collected from the pickers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRequest {
    pub company1: CompanySelection,
    pub company2: CompanySelection,
    pub statement_type: StatementType,
    pub chart_type: ChartType,
    pub range: DateRange,
}

impl Default for ComparisonRequest {
    fn default() -> Self {
        let companies = popular_companies();
        Self {
            company1: companies[0].clone(),
            company2: companies[1].clone(),
            statement_type: StatementType::BalanceSheet,
            chart_type: ChartType::Bar,
            range: DateRange::default(),
        }
    }
}

/// The transient aggregate of one comparison run. Built from scratch on each
/// trigger and discarded once rendered; nothing here outlives the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRun {
    pub request: ComparisonRequest,
    pub statement1: FinancialStatement,
    pub statement2: FinancialStatement,
    pub kpi_rows: Vec<KpiRecord>,
    pub trends: Vec<TrendStatement>,
    pub chart: ChartSpec,
}

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub rate_limit_per_minute: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Ok(Config {
            base_url: std::env::var("FINCOMPARE_BASE_URL")
                .unwrap_or_else(|_| "https://query2.finance.yahoo.com".to_string()),
            request_timeout_secs: std::env::var("FINCOMPARE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            rate_limit_per_minute: std::env::var("RATE_LIMIT_PER_MINUTE")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
        })
    }
}
