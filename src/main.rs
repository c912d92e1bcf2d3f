mod api;
mod comparison;
mod format;
mod kpi;
mod models;
mod ui;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::api::YahooFundamentalsClient;
use crate::comparison::ComparisonEngine;
use crate::format::{format_statement, group_digits, FormattedTable};
use crate::models::{
    popular_companies, ChartType, CompanySelection, ComparisonRequest, ComparisonRun, Config,
    DateRange, StatementType,
};

#[derive(Parser)]
#[command(name = "fincompare", about = "Compare financial statements of two public companies")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one comparison without the TUI and print the result
    Compare {
        /// First company, by display name or ticker symbol
        #[arg(long, default_value = "Apple")]
        company1: String,
        /// Second company, by display name or ticker symbol
        #[arg(long, default_value = "Microsoft")]
        company2: String,
        #[arg(long, value_enum, default_value = "balance-sheet")]
        statement: StatementArg,
        #[arg(long, value_enum, default_value = "bar")]
        chart: ChartArg,
        /// Start of the fiscal-year window (YYYY-MM-DD)
        #[arg(long, default_value = "2023-01-02")]
        start_date: NaiveDate,
        /// End of the fiscal-year window (YYYY-MM-DD)
        #[arg(long, default_value = "2024-02-04")]
        end_date: NaiveDate,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StatementArg {
    BalanceSheet,
    IncomeStatement,
    CashFlow,
}

impl From<StatementArg> for StatementType {
    fn from(arg: StatementArg) -> Self {
        match arg {
            StatementArg::BalanceSheet => StatementType::BalanceSheet,
            StatementArg::IncomeStatement => StatementType::IncomeStatement,
            StatementArg::CashFlow => StatementType::CashFlow,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ChartArg {
    Bar,
    Line,
    Area,
}

impl From<ChartArg> for ChartType {
    fn from(arg: ChartArg) -> Self {
        match arg {
            ChartArg::Bar => ChartType::Bar,
            ChartArg::Line => ChartType::Line,
            ChartArg::Area => ChartType::Area,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => run_tui(),
        Some(Commands::Compare {
            company1,
            company2,
            statement,
            chart,
            start_date,
            end_date,
        }) => {
            let request = ComparisonRequest {
                company1: resolve_company(&company1)?,
                company2: resolve_company(&company2)?,
                statement_type: statement.into(),
                chart_type: chart.into(),
                range: DateRange::new(start_date, end_date),
            };
            run_headless(request)
        }
    }
}

fn run_tui() -> Result<()> {
    // Suppress most logs while the TUI owns the terminal
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::ERROR)
        .with_env_filter("fincompare=error")
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let client = YahooFundamentalsClient::new(&config)?;
    let engine = ComparisonEngine::new(client);

    if let Err(e) = ui::app::run_app(engine) {
        eprintln!("TUI error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn run_headless(request: ComparisonRequest) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fincompare=info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let config = Config::from_env()?;
    let client = YahooFundamentalsClient::new(&config)?;
    let engine = ComparisonEngine::new(client);

    let runtime = tokio::runtime::Runtime::new()?;
    let run = runtime.block_on(engine.run(request))?;

    print_run(&run);
    Ok(())
}

/// Resolve a user-supplied company by display name or ticker, case-insensitive
fn resolve_company(input: &str) -> Result<CompanySelection> {
    let companies = popular_companies();
    if let Some(found) = companies.iter().find(|c| {
        c.name.eq_ignore_ascii_case(input) || c.symbol.eq_ignore_ascii_case(input)
    }) {
        return Ok(found.clone());
    }

    let names: Vec<&str> = companies.iter().map(|c| c.name.as_str()).collect();
    bail!(
        "Unknown company '{}'. Choose one of: {}",
        input,
        names.join(", ")
    )
}

fn print_run(run: &ComparisonRun) {
    let company1 = run.request.company1.name.as_str();
    let company2 = run.request.company2.name.as_str();

    println!("{} Snapshot", run.request.statement_type);
    println!();
    println!("### {}", company1);
    print_table(&format_statement(&run.statement1));
    println!();
    println!("### {}", company2);
    print_table(&format_statement(&run.statement2));

    println!();
    println!("KPI Trend Comparison");
    if run.kpi_rows.is_empty() {
        println!("  (no shared fiscal years in range)");
    } else {
        let kpi_table = FormattedTable {
            headers: vec![
                "KPI".to_string(),
                "Year".to_string(),
                company1.to_string(),
                company2.to_string(),
                "Performance".to_string(),
            ],
            rows: run
                .kpi_rows
                .iter()
                .map(|record| {
                    vec![
                        record.kpi.clone(),
                        record.year.to_string(),
                        group_digits(record.value1),
                        group_digits(record.value2),
                        record.performance.label(company1, company2).to_string(),
                    ]
                })
                .collect(),
        };
        print_table(&kpi_table);
    }

    println!();
    println!("Trend Summary");
    for trend in &run.trends {
        println!("  {}", trend.narrate(company1, company2));
    }

    println!();
    println!(
        "{} ({}, {} series over years {:?})",
        run.chart.title,
        run.request.chart_type.label(),
        run.chart.series.len(),
        run.chart.years()
    );
}

/// Plain fixed-width rendering of a formatted table for headless output
fn print_table(table: &FormattedTable) {
    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.len()).collect();
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let print_row = |cells: &[String]| {
        let line: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths.get(i).copied().unwrap_or(0)))
            .collect();
        println!("  {}", line.join("  "));
    };

    print_row(&table.headers);
    for row in &table.rows {
        print_row(row);
    }
}
