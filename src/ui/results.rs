use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Dataset, GraphType,
        Paragraph, Row, Table},
    Frame,
};

use crate::format::{format_statement, group_digits};
use crate::models::{ChartSpec, ChartType, ComparisonRun, FinancialStatement};
use crate::ui::components::{format_large_number, kpi_color, performance_style, render_placeholder};

/// Stateless rendering of a finished comparison run, plus a scroll offset for
/// the two statement snapshots
pub struct ResultsView {
    scroll: usize,
}

impl ResultsView {
    pub fn new() -> Self {
        Self { scroll: 0 }
    }

    pub fn reset(&mut self) {
        self.scroll = 0;
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => self.scroll += 1,
            KeyCode::Home => self.scroll = 0,
            _ => {}
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, run: &ComparisonRun) {
        let trend_height = run.trends.len() as u16 + 2;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(32),        // Statement snapshots
                Constraint::Percentage(28),        // KPI comparison table
                Constraint::Length(trend_height),  // Trend summary
                Constraint::Min(8),                // Chart
            ])
            .split(area);

        self.render_statements(f, chunks[0], run);
        render_kpi_table(f, chunks[1], run);
        render_trends(f, chunks[2], run);
        render_chart(f, chunks[3], run);
    }

    fn render_statements(&self, f: &mut Frame, area: Rect, run: &ComparisonRun) {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        self.render_statement(f, halves[0], &run.request.company1.name, &run.statement1);
        self.render_statement(f, halves[1], &run.request.company2.name, &run.statement2);
    }

    fn render_statement(
        &self,
        f: &mut Frame,
        area: Rect,
        company: &str,
        statement: &FinancialStatement,
    ) {
        let title = format!("{} - {}", company, statement.statement_type);
        if statement.is_empty() {
            render_placeholder(f, area, "No statement data returned by the provider");
            return;
        }

        let table = format_statement(statement);
        let header = Row::new(table.headers.clone())
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = table
            .rows
            .iter()
            .skip(self.scroll)
            .map(|cells| Row::new(cells.clone()))
            .collect();

        let mut widths = vec![Constraint::Min(28)];
        widths.extend(std::iter::repeat(Constraint::Length(16)).take(statement.periods.len()));

        let widget = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(title))
            .style(Style::default().fg(Color::White));

        f.render_widget(widget, area);
    }
}

fn render_kpi_table(f: &mut Frame, area: Rect, run: &ComparisonRun) {
    let company1 = run.request.company1.name.as_str();
    let company2 = run.request.company2.name.as_str();

    if run.kpi_rows.is_empty() {
        render_placeholder(f, area, "No KPI rows: no shared fiscal years in range");
        return;
    }

    let header = Row::new(vec!["KPI", "Year", company1, company2, "Performance"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = run
        .kpi_rows
        .iter()
        .map(|record| {
            let label = record.performance.label(company1, company2).to_string();
            Row::new(vec![
                Cell::from(record.kpi.clone()),
                Cell::from(record.year.to_string()),
                Cell::from(group_digits(record.value1)),
                Cell::from(group_digits(record.value2)),
                Cell::from(Span::styled(label, performance_style(record.performance))),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(30),
        Constraint::Length(6),
        Constraint::Length(18),
        Constraint::Length(18),
        Constraint::Length(14),
    ];

    let widget = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("KPI Trend Comparison"),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(widget, area);
}

fn render_trends(f: &mut Frame, area: Rect, run: &ComparisonRun) {
    let company1 = run.request.company1.name.as_str();
    let company2 = run.request.company2.name.as_str();

    let lines: Vec<Line> = if run.trends.is_empty() {
        vec![Line::from("No KPIs with data for both companies.")]
    } else {
        run.trends
            .iter()
            .map(|trend| Line::from(trend.narrate(company1, company2)))
            .collect()
    };

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Trend Summary"))
        .style(Style::default().fg(Color::White));

    f.render_widget(paragraph, area);
}

fn render_chart(f: &mut Frame, area: Rect, run: &ComparisonRun) {
    // An empty KPI table degrades to an empty plot rather than a guard
    match run.chart.chart_type {
        ChartType::Bar => render_bar_chart(f, area, &run.chart),
        ChartType::Line => render_line_chart(f, area, &run.chart, symbols::Marker::Braille),
        ChartType::Area => render_line_chart(f, area, &run.chart, symbols::Marker::Block),
    }
}

/// Grouped bars: one group per fiscal year, one bar per (KPI, company).
/// Terminal bars cannot go below zero, so negative amounts clamp to zero and
/// keep their true value as the bar text.
fn render_bar_chart(f: &mut Frame, area: Rect, chart: &ChartSpec) {
    let kpis: Vec<&str> = {
        let mut names: Vec<&str> = Vec::new();
        for series in &chart.series {
            if !names.contains(&series.kpi.as_str()) {
                names.push(series.kpi.as_str());
            }
        }
        names
    };

    let mut widget = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(chart.title.clone()),
        )
        .bar_width(7)
        .bar_gap(1)
        .group_gap(3);

    let year_labels: Vec<String> = chart.years().iter().map(|y| y.to_string()).collect();
    for (year, label) in chart.years().into_iter().zip(&year_labels) {
        let mut bars = Vec::new();
        for series in &chart.series {
            let Some((_, value)) = series.points.iter().find(|(y, _)| *y == year) else {
                continue;
            };
            let kpi_index = kpis.iter().position(|k| *k == series.kpi).unwrap_or(0);
            let mut style = Style::default().fg(kpi_color(kpi_index));
            if series.company_index == 1 {
                style = style.add_modifier(Modifier::DIM);
            }
            bars.push(
                Bar::default()
                    .value((*value).max(0) as u64)
                    .text_value(format_large_number(*value as f64))
                    .style(style),
            );
        }
        widget = widget.data(BarGroup::default().label(Line::from(label.as_str())).bars(&bars));
    }

    f.render_widget(widget, area);
}

fn render_line_chart(f: &mut Frame, area: Rect, chart: &ChartSpec, marker: symbols::Marker) {
    let kpis: Vec<&str> = {
        let mut names: Vec<&str> = Vec::new();
        for series in &chart.series {
            if !names.contains(&series.kpi.as_str()) {
                names.push(series.kpi.as_str());
            }
        }
        names
    };

    // Owned point buffers so the datasets can borrow them
    let series_points: Vec<(String, Style, Vec<(f64, f64)>)> = chart
        .series
        .iter()
        .map(|series| {
            let kpi_index = kpis.iter().position(|k| *k == series.kpi).unwrap_or(0);
            let mut style = Style::default().fg(kpi_color(kpi_index));
            if series.company_index == 1 {
                style = style.add_modifier(Modifier::DIM);
            }
            let name = format!(
                "{} ({})",
                series.kpi,
                if series.company_index == 0 { "1" } else { "2" }
            );
            let points: Vec<(f64, f64)> = series
                .points
                .iter()
                .map(|(year, value)| (*year as f64, *value as f64))
                .collect();
            (name, style, points)
        })
        .collect();

    let datasets: Vec<Dataset> = series_points
        .iter()
        .map(|(name, style, points)| {
            Dataset::default()
                .name(name.as_str())
                .marker(marker)
                .graph_type(GraphType::Line)
                .style(*style)
                .data(points)
        })
        .collect();

    let years = chart.years();
    let (x_min, x_max) = match (years.first(), years.last()) {
        (Some(first), Some(last)) if first != last => (*first as f64, *last as f64),
        (Some(only), _) => (*only as f64 - 1.0, *only as f64 + 1.0),
        _ => (0.0, 1.0),
    };

    let values: Vec<f64> = series_points
        .iter()
        .flat_map(|(_, _, points)| points.iter().map(|(_, v)| *v))
        .collect();
    let y_min = values.iter().copied().fold(0.0_f64, f64::min);
    let y_max = values.iter().copied().fold(0.0_f64, f64::max) * 1.05;
    let y_max = if y_max <= y_min { y_min + 1.0 } else { y_max };

    let x_labels: Vec<Span> = years.iter().map(|y| Span::raw(y.to_string())).collect();
    let y_labels = vec![
        Span::raw(format_large_number(y_min)),
        Span::raw(format_large_number((y_min + y_max) / 2.0)),
        Span::raw(format_large_number(y_max)),
    ];

    let widget = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(chart.title.clone()),
        )
        .x_axis(
            Axis::default()
                .title("Year")
                .style(Style::default().fg(Color::Gray))
                .labels(x_labels)
                .bounds([x_min, x_max]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .labels(y_labels)
                .bounds([y_min, y_max]),
        );

    f.render_widget(widget, area);
}
