use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Terminal, Frame,
};
use std::io;
use tracing::warn;

use crate::api::StatementProvider;
use crate::comparison::ComparisonEngine;
use crate::models::ComparisonRun;
use crate::ui::components::render_error;
use crate::ui::results::ResultsView;
use crate::ui::setup::SetupView;

/// The whole dashboard is two states: idle on the setup tab awaiting the
/// trigger, or showing the last finished run on the results tab. Each run
/// recomputes everything from the current selection.
pub struct CompareApp<P> {
    engine: ComparisonEngine<P>,
    runtime: tokio::runtime::Runtime,
    setup: SetupView,
    results: ResultsView,
    run: Option<ComparisonRun>,
    error: Option<String>,
    selected_tab: usize,
    should_quit: bool,
}

impl<P: StatementProvider> CompareApp<P> {
    pub fn new(engine: ComparisonEngine<P>) -> Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            engine,
            runtime,
            setup: SetupView::new(),
            results: ResultsView::new(),
            run: None,
            error: None,
            selected_tab: 0,
            should_quit: false,
        })
    }

    pub fn draw(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tab bar
                Constraint::Min(0),    // Content
                Constraint::Length(3), // Status bar
            ])
            .split(f.area());

        self.render_tab_bar(f, chunks[0]);

        match self.selected_tab {
            0 => self.setup.render(f, chunks[1]),
            _ => self.render_results(f, chunks[1]),
        }

        self.render_status_bar(f, chunks[2]);
    }

    fn render_tab_bar(&self, f: &mut Frame, area: Rect) {
        let titles = vec!["Setup", "Results"];

        let tabs = Tabs::new(titles)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Company Financial Statements Comparison"),
            )
            .style(Style::default().fg(Color::White))
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .select(self.selected_tab);

        f.render_widget(tabs, area);
    }

    fn render_results(&self, f: &mut Frame, area: Rect) {
        if let Some(error) = &self.error {
            render_error(f, area, error);
            return;
        }
        match &self.run {
            Some(run) => self.results.render(f, area, run),
            None => {
                let paragraph = Paragraph::new(vec![
                    Line::from(""),
                    Line::from("No comparison yet."),
                    Line::from(""),
                    Line::from("Pick two companies on the Setup tab and press Enter on"),
                    Line::from("Compare Companies."),
                ])
                .block(Block::default().borders(Borders::ALL).title("Results"))
                .style(Style::default().fg(Color::Gray));
                f.render_widget(paragraph, area);
            }
        }
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let hints = if self.selected_tab == 0 {
            vec![
                Span::styled("↑/↓", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::styled(" field • ", Style::default().fg(Color::Gray)),
                Span::styled("←/→", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::styled(" change • ", Style::default().fg(Color::Gray)),
                Span::styled("Enter", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::styled(" compare • ", Style::default().fg(Color::Gray)),
                Span::styled("Tab", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::styled(" results • ", Style::default().fg(Color::Gray)),
                Span::styled("Q", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::styled(" quit", Style::default().fg(Color::Gray)),
            ]
        } else {
            vec![
                Span::styled("↑/↓", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::styled(" scroll statements • ", Style::default().fg(Color::Gray)),
                Span::styled("Tab", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::styled(" setup • ", Style::default().fg(Color::Gray)),
                Span::styled("Q", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::styled(" quit", Style::default().fg(Color::Gray)),
            ]
        };

        let paragraph = Paragraph::new(vec![Line::from(hints)])
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::White));

        f.render_widget(paragraph, area);
    }

    pub fn handle_key_event(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Tab if self.selected_tab == 1 => {
                self.selected_tab = 0;
            }
            _ => {
                if self.selected_tab == 0 {
                    if key == KeyCode::Tab {
                        self.selected_tab = 1;
                        return;
                    }
                    let triggered = self.setup.handle_key(key);
                    if triggered {
                        self.run_comparison();
                    }
                } else {
                    self.results.handle_key(key);
                }
            }
        }
    }

    /// Run one synchronous comparison to completion. The UI blocks on the two
    /// provider calls; there is no cancellation or background work.
    fn run_comparison(&mut self) {
        let request = self.setup.request.clone();
        match self.runtime.block_on(self.engine.run(request)) {
            Ok(run) => {
                self.run = Some(run);
                self.error = None;
                self.results.reset();
            }
            Err(e) => {
                warn!("Comparison run failed: {}", e);
                self.run = None;
                self.error = Some(format!("Comparison failed: {:#}", e));
            }
        }
        self.selected_tab = 1;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

/// Run the dashboard TUI to completion
pub fn run_app<P: StatementProvider>(engine: ComparisonEngine<P>) -> Result<()> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut app = CompareApp::new(engine)?;

    let result = loop {
        if let Err(e) = terminal.draw(|f| app.draw(f)) {
            break Err(e.into());
        }

        if let Ok(Event::Key(key)) = event::read() {
            if key.kind == KeyEventKind::Press {
                app.handle_key_event(key.code);
                if app.should_quit() {
                    break Ok(());
                }
            }
        }
    };

    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    result
}
