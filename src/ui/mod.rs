pub mod chart;
pub mod dashboard;

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Color;
use ratatui::Frame;

use crate::alert::{self, classify, AlertState};
use crate::config::MonitorParams;
use crate::event::AppEvent;
use crate::model::sample::Tick;
use crate::series::SeriesStore;

use chart::SeriesChart;
use dashboard::{AlertPanel, Banner, KeybindBar, LogPanel, PricePanel, StatusBar};

const MAX_LOG_MESSAGES: usize = 200;
pub const BANNER_TTL: Duration = Duration::from_secs(5);

/// View model of the dashboard. The series itself is read from the store at
/// render time.
pub struct AppState {
    pub symbol_a: String,
    pub symbol_b: String,
    pub params: MonitorParams,
    pub chart_history_len: usize,
    pub alert: AlertState,
    pub last_zscore: Option<f64>,
    pub paused: bool,
    pub fetch_failures: u64,
    pub last_update: Option<String>,
    pub banner: Option<(String, Instant)>,
    pub log_messages: VecDeque<String>,
}

impl AppState {
    pub fn new(
        symbol_a: &str,
        symbol_b: &str,
        params: MonitorParams,
        chart_history_len: usize,
    ) -> Self {
        Self {
            symbol_a: symbol_a.to_string(),
            symbol_b: symbol_b.to_string(),
            params,
            chart_history_len: chart_history_len.max(1),
            alert: AlertState::Waiting,
            last_zscore: None,
            paused: false,
            fetch_failures: 0,
            last_update: None,
            banner: None,
            log_messages: VecDeque::new(),
        }
    }

    pub fn push_log(&mut self, msg: String) {
        self.log_messages.push_back(msg);
        if self.log_messages.len() > MAX_LOG_MESSAGES {
            self.log_messages.pop_front();
        }
    }

    /// Banner text if it has not expired at `now`.
    pub fn banner_message(&self, now: Instant) -> Option<&str> {
        self.banner
            .as_ref()
            .filter(|(_, until)| now < *until)
            .map(|(msg, _)| msg.as_str())
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::TickCompleted(report) => {
                if report.alert == AlertState::Alerting && self.alert != AlertState::Alerting {
                    self.push_log(format!(
                        "[ALERT] tick {} z={:.2}",
                        report.sample.tick,
                        report.sample.zscore.unwrap_or_default()
                    ));
                }
                self.alert = report.alert;
                self.last_zscore = report.sample.zscore;
                self.last_update = Some(chrono::Local::now().format("%H:%M:%S").to_string());
            }
            AppEvent::FetchFailed(msg) => {
                self.fetch_failures += 1;
                self.push_log(format!("[ERR] fetch failed: {}", msg));
                self.banner = Some((
                    format!("Price fetch failed: {}", msg),
                    Instant::now() + BANNER_TTL,
                ));
            }
            AppEvent::ParamsChanged(params) => {
                self.params = params;
                self.alert = classify(self.last_zscore, params.alert_threshold());
                self.push_log(format!(
                    "window={} threshold={:.1} (from next tick)",
                    params.window(),
                    params.alert_threshold()
                ));
            }
            AppEvent::Exported { path, rows } => {
                self.push_log(format!("exported {} rows to {}", rows, path.display()));
            }
            AppEvent::LogMessage(msg) => {
                self.push_log(msg);
            }
            AppEvent::Error(msg) => {
                self.push_log(format!("[ERR] {}", msg));
            }
        }
    }
}

pub fn render(frame: &mut Frame, state: &AppState, store: &SeriesStore) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(1), // banner
            Constraint::Length(3), // latest prices
            Constraint::Min(8),    // price charts
            Constraint::Min(6),    // spread chart
            Constraint::Min(8),    // z-score chart + alert
            Constraint::Length(5), // log
            Constraint::Length(1), // keybinds
        ])
        .split(frame.area());

    frame.render_widget(
        StatusBar {
            symbol_a: &state.symbol_a,
            symbol_b: &state.symbol_b,
            paused: state.paused,
            tick_count: store.len(),
            fetch_failures: state.fetch_failures,
            last_update: state.last_update.as_deref(),
        },
        outer[0],
    );

    frame.render_widget(
        Banner {
            message: state.banner_message(Instant::now()),
        },
        outer[1],
    );

    let latest = store.latest();
    let halves = |area: Rect| {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area)
    };

    let price_row = halves(outer[2]);
    frame.render_widget(
        PricePanel::new(&state.symbol_a, latest.map(|s| s.price_a)),
        price_row[0],
    );
    frame.render_widget(
        PricePanel::new(&state.symbol_b, latest.map(|s| s.price_b)),
        price_row[1],
    );

    let start = store.len().saturating_sub(state.chart_history_len);
    let first_tick = start as Tick;

    let chart_row = halves(outer[3]);
    frame.render_widget(
        SeriesChart::from_values(&state.symbol_a, &store.price_a()[start..], first_tick),
        chart_row[0],
    );
    frame.render_widget(
        SeriesChart::from_values(&state.symbol_b, &store.price_b()[start..], first_tick),
        chart_row[1],
    );

    frame.render_widget(
        SeriesChart::from_values(
            format!("Spread ({} - {})", state.symbol_a, state.symbol_b),
            &store.spread()[start..],
            first_tick,
        )
        .color(Color::Magenta),
        outer[4],
    );

    let z_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(50)])
        .split(outer[5]);
    let threshold = state.params.alert_threshold();
    let zscores = store.zscore();
    let z_start = start.min(zscores.len());
    let alert_ticks = alert::alert_ticks_since(store, z_start as Tick, threshold);
    frame.render_widget(
        SeriesChart::new(
            "Z-Score (alerts in red)",
            zscores[z_start..].to_vec(),
            z_start as Tick,
        )
        .color(Color::Yellow)
        .guides(vec![threshold, 0.0, -threshold])
        .markers(&alert_ticks)
        .precision(3),
        z_row[0],
    );
    frame.render_widget(
        AlertPanel::new(state.alert, state.last_zscore, state.params),
        z_row[1],
    );

    frame.render_widget(LogPanel::new(&state.log_messages), outer[6]);
    frame.render_widget(KeybindBar, outer[7]);
}
