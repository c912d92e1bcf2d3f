/// Shared UI helpers for the comparison dashboard
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::Performance;

/// Color palette cycled per KPI so chart series and legends stay consistent
const KPI_PALETTE: [Color; 6] = [
    Color::Cyan,
    Color::Magenta,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Red,
];

pub fn kpi_color(index: usize) -> Color {
    KPI_PALETTE[index % KPI_PALETTE.len()]
}

/// Style for the Performance column: green for company 1, red for company 2,
/// yellow for a tie
pub fn performance_style(performance: Performance) -> Style {
    let color = match performance {
        Performance::Company1 => Color::Green,
        Performance::Company2 => Color::Red,
        Performance::Tie => Color::Yellow,
    };
    Style::default().fg(color)
}

/// Format large amounts for chart labels where full grouping would not fit
pub fn format_large_number(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1_000_000_000_000.0 {
        format!("{:.1}T", value / 1_000_000_000_000.0)
    } else if magnitude >= 1_000_000_000.0 {
        format!("{:.1}B", value / 1_000_000_000.0)
    } else if magnitude >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if magnitude >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format!("{:.0}", value)
    }
}

/// Render error message
pub fn render_error(f: &mut Frame, area: Rect, error: &str) {
    let error_paragraph = Paragraph::new(error)
        .block(Block::default().borders(Borders::ALL).title("Error"))
        .style(Style::default().fg(Color::Red));

    f.render_widget(error_paragraph, area);
}

/// Render a placeholder for views with nothing to show yet
pub fn render_placeholder(f: &mut Frame, area: Rect, message: &str) {
    let paragraph = Paragraph::new(message)
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Gray));

    f.render_widget(paragraph, area);
}
