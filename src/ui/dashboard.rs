use std::collections::VecDeque;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::alert::AlertState;
use crate::config::MonitorParams;

pub struct PricePanel<'a> {
    symbol: &'a str,
    price: Option<f64>,
}

impl<'a> PricePanel<'a> {
    pub fn new(symbol: &'a str, price: Option<f64>) -> Self {
        Self { symbol, price }
    }
}

impl Widget for PricePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let price_str = self
            .price
            .map(|v| format!("{:.2}", v))
            .unwrap_or_else(|| "---".to_string());

        let line = Line::from(vec![
            Span::styled(
                format!("{} Price: ", self.symbol),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                price_str,
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        Paragraph::new(line).block(block).render(area, buf);
    }
}

pub struct AlertPanel {
    state: AlertState,
    zscore: Option<f64>,
    params: MonitorParams,
}

impl AlertPanel {
    pub fn new(state: AlertState, zscore: Option<f64>, params: MonitorParams) -> Self {
        Self {
            state,
            zscore,
            params,
        }
    }
}

/// Message shown for the current alert state.
pub fn alert_message(state: AlertState, zscore: Option<f64>) -> String {
    match (state, zscore) {
        (AlertState::Alerting, Some(z)) => format!("Z-Score Alert: {:.2}", z),
        (AlertState::Normal, Some(z)) => format!("Z-Score Normal: {:.2}", z),
        _ => "Waiting for enough data to compute Z-Score...".to_string(),
    }
}

impl Widget for AlertPanel {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (color, border) = match self.state {
            AlertState::Alerting => (Color::Red, Color::Red),
            AlertState::Normal => (Color::Green, Color::DarkGray),
            AlertState::Waiting => (Color::Blue, Color::DarkGray),
        };

        let lines = vec![
            Line::from(Span::styled(
                alert_message(self.state, self.zscore),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("window: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    self.params.window().to_string(),
                    Style::default().fg(Color::White),
                ),
                Span::styled("  threshold: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("{:.1}", self.params.alert_threshold()),
                    Style::default().fg(Color::White),
                ),
            ]),
        ];

        let block = Block::default()
            .title(" Alert ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct StatusBar<'a> {
    pub symbol_a: &'a str,
    pub symbol_b: &'a str,
    pub paused: bool,
    pub tick_count: usize,
    pub fetch_failures: u64,
    pub last_update: Option<&'a str>,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let pause_status = if self.paused {
            Span::styled(
                " PAUSED ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(" RUNNING ", Style::default().fg(Color::Green))
        };

        let failures_color = if self.fetch_failures > 0 {
            Color::Yellow
        } else {
            Color::DarkGray
        };

        let line = Line::from(vec![
            Span::styled(
                " spread-monitor ",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("| ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{} / {}", self.symbol_a, self.symbol_b),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            pause_status,
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("ticks: {}", self.tick_count),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("fetch errors: {}", self.fetch_failures),
                Style::default().fg(failures_color),
            ),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("updated: {}", self.last_update.unwrap_or("---")),
                Style::default().fg(Color::DarkGray),
            ),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}

/// One-line error strip, blank when there is nothing to report.
pub struct Banner<'a> {
    pub message: Option<&'a str>,
}

impl Widget for Banner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(msg) = self.message else {
            return;
        };
        let line = Line::from(Span::styled(
            format!(" ! {} ", msg),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ));
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

pub struct LogPanel<'a> {
    messages: &'a VecDeque<String>,
}

impl<'a> LogPanel<'a> {
    pub fn new(messages: &'a VecDeque<String>) -> Self {
        Self { messages }
    }
}

impl Widget for LogPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visible = area.height.saturating_sub(2) as usize;
        let start = self.messages.len().saturating_sub(visible);
        let lines: Vec<Line> = self
            .messages
            .iter()
            .skip(start)
            .map(|m| {
                let color = if m.starts_with("[ERR]") {
                    Color::Red
                } else {
                    Color::Gray
                };
                Line::from(Span::styled(m.as_str(), Style::default().fg(color)))
            })
            .collect();

        let block = Block::default()
            .title(" Log ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

pub struct KeybindBar;

impl Widget for KeybindBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            Span::styled(" [Q]", Style::default().fg(Color::Yellow)),
            Span::styled("uit  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[P]", Style::default().fg(Color::Yellow)),
            Span::styled("ause  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[R]", Style::default().fg(Color::Yellow)),
            Span::styled("esume  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[+/-]", Style::default().fg(Color::Yellow)),
            Span::styled(" window  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[ [ / ] ]", Style::default().fg(Color::Yellow)),
            Span::styled(" threshold  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[E]", Style::default().fg(Color::Yellow)),
            Span::styled("xport CSV", Style::default().fg(Color::DarkGray)),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}
