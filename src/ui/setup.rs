use chrono::{Duration, Months};
use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::{
    popular_companies, ChartType, CompanySelection, ComparisonRequest, StatementType,
};

/// The pickers, in display and focus order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupField {
    Company1,
    Company2,
    Statement,
    Chart,
    StartDate,
    EndDate,
    Compare,
}

const FIELDS: [SetupField; 7] = [
    SetupField::Company1,
    SetupField::Company2,
    SetupField::Statement,
    SetupField::Chart,
    SetupField::StartDate,
    SetupField::EndDate,
    SetupField::Compare,
];

/// Input collector: holds the current selection for the next comparison run.
/// No validation beyond what the pickers themselves enforce.
pub struct SetupView {
    pub request: ComparisonRequest,
    companies: Vec<CompanySelection>,
    focus: usize,
}

impl SetupView {
    pub fn new() -> Self {
        Self {
            request: ComparisonRequest::default(),
            companies: popular_companies(),
            focus: 0,
        }
    }

    pub fn focused_field(&self) -> SetupField {
        FIELDS[self.focus]
    }

    /// Returns true when the Compare action is triggered
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Up => {
                self.focus = if self.focus == 0 {
                    FIELDS.len() - 1
                } else {
                    self.focus - 1
                };
            }
            KeyCode::Down => {
                self.focus = (self.focus + 1) % FIELDS.len();
            }
            KeyCode::Left => self.adjust(-1),
            KeyCode::Right => self.adjust(1),
            KeyCode::PageUp => self.adjust_month(-1),
            KeyCode::PageDown => self.adjust_month(1),
            KeyCode::Enter => {
                if self.focused_field() == SetupField::Compare {
                    return true;
                }
                self.focus = (self.focus + 1) % FIELDS.len();
            }
            _ => {}
        }
        false
    }

    fn adjust(&mut self, direction: i64) {
        match self.focused_field() {
            SetupField::Company1 => {
                self.request.company1 = self.cycle_company(&self.request.company1, direction);
            }
            SetupField::Company2 => {
                self.request.company2 = self.cycle_company(&self.request.company2, direction);
            }
            SetupField::Statement => {
                self.request.statement_type =
                    cycle(&StatementType::ALL, self.request.statement_type, direction);
            }
            SetupField::Chart => {
                self.request.chart_type = cycle(&ChartType::ALL, self.request.chart_type, direction);
            }
            SetupField::StartDate => {
                self.request.range.start += Duration::days(direction);
            }
            SetupField::EndDate => {
                self.request.range.end += Duration::days(direction);
            }
            SetupField::Compare => {}
        }
    }

    fn adjust_month(&mut self, direction: i64) {
        let shift = |date: chrono::NaiveDate| {
            if direction >= 0 {
                date.checked_add_months(Months::new(1)).unwrap_or(date)
            } else {
                date.checked_sub_months(Months::new(1)).unwrap_or(date)
            }
        };
        match self.focused_field() {
            SetupField::StartDate => self.request.range.start = shift(self.request.range.start),
            SetupField::EndDate => self.request.range.end = shift(self.request.range.end),
            _ => {}
        }
    }

    fn cycle_company(&self, current: &CompanySelection, direction: i64) -> CompanySelection {
        let len = self.companies.len() as i64;
        let index = self
            .companies
            .iter()
            .position(|c| c == current)
            .unwrap_or(0) as i64;
        let next = (index + direction).rem_euclid(len) as usize;
        self.companies[next].clone()
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let rows = [
            (
                SetupField::Company1,
                "Company 1",
                self.request.company1.name.clone(),
            ),
            (
                SetupField::Company2,
                "Company 2",
                self.request.company2.name.clone(),
            ),
            (
                SetupField::Statement,
                "Financial Statement",
                self.request.statement_type.label().to_string(),
            ),
            (
                SetupField::Chart,
                "Chart Type",
                self.request.chart_type.label().to_string(),
            ),
            (
                SetupField::StartDate,
                "Start Date",
                self.request.range.start.format("%Y-%m-%d").to_string(),
            ),
            (
                SetupField::EndDate,
                "End Date",
                self.request.range.end.format("%Y-%m-%d").to_string(),
            ),
            (SetupField::Compare, "Compare Companies", String::new()),
        ];

        let mut lines = vec![Line::from("")];
        for (field, label, value) in rows {
            let focused = field == self.focused_field();
            let marker = if focused { "▶ " } else { "  " };
            let label_style = if focused {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            lines.push(Line::from(vec![
                Span::styled(format!("{}{:<22}", marker, label), label_style),
                Span::styled(value, Style::default().fg(Color::Cyan)),
            ]));
            lines.push(Line::from(""));
        }

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Company Comparison"),
            )
            .style(Style::default().fg(Color::White));

        f.render_widget(paragraph, area);
    }
}

fn cycle<T: Copy + PartialEq>(choices: &[T], current: T, direction: i64) -> T {
    let len = choices.len() as i64;
    let index = choices.iter().position(|c| *c == current).unwrap_or(0) as i64;
    choices[(index + direction).rem_euclid(len) as usize]
}
