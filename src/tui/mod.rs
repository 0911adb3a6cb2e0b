//! Ratatui-based terminal display sink.
//!
//! Each chart takes over the terminal (alternate screen, raw mode) and stays
//! up until a key is pressed, so `render` blocks like a modal plot window.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::error::AppError;
use crate::plot::{ChartSpec, LineKind, RenderSink};

mod plotters_chart;

use plotters_chart::SalesPlottersChart;

/// Shows charts full screen in the terminal, one at a time.
#[derive(Debug, Default)]
pub struct TerminalSink;

impl TerminalSink {
    pub fn new() -> Self {
        Self
    }
}

impl RenderSink for TerminalSink {
    fn render(&mut self, chart: &ChartSpec) -> Result<(), AppError> {
        let _guard = TerminalGuard::new()?;

        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)
            .map_err(|e| AppError::render(format!("Failed to initialize terminal: {e}")))?;

        wait_for_dismiss(&mut terminal, chart)
    }
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::render(format!("Failed to enable raw terminal mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::render(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

fn wait_for_dismiss<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    chart: &ChartSpec,
) -> Result<(), AppError> {
    let mut needs_redraw = true;
    loop {
        if needs_redraw {
            terminal
                .draw(|f| draw(f, chart))
                .map_err(|e| AppError::render(format!("Terminal draw error: {e}")))?;
            needs_redraw = false;
        }

        if !event::poll(Duration::from_millis(100))
            .map_err(|e| AppError::render(format!("Event poll error: {e}")))?
        {
            continue;
        }

        match event::read().map_err(|e| AppError::render(format!("Event read error: {e}")))? {
            Event::Key(key) if key.kind == KeyEventKind::Press => return Ok(()),
            Event::Resize(_, _) => needs_redraw = true,
            _ => {}
        }
    }
}

fn draw(f: &mut Frame, chart: &ChartSpec) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(1)])
        .split(f.area());

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {} ", chart.title),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(chunks[0]);
    f.render_widget(block, chunks[0]);
    f.render_widget(SalesPlottersChart { chart }, inner);

    f.render_widget(Paragraph::new(legend_line(chart)), chunks[1]);
}

/// Series legend plus the dismiss hint, shown under the chart.
fn legend_line(chart: &ChartSpec) -> Line<'static> {
    let mut spans = Vec::new();
    for series in &chart.series {
        let color = Color::Rgb(series.color.r, series.color.g, series.color.b);
        let glyph = match series.line {
            LineKind::Solid => "── ",
            LineKind::Dashed => "- - ",
        };
        spans.push(Span::styled(glyph, Style::default().fg(color)));
        spans.push(Span::raw(format!("{}   ", series.label)));
    }
    spans.push(Span::styled(
        "press any key to continue",
        Style::default().fg(Color::DarkGray),
    ));
    Line::from(spans)
}
