use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use crossterm::event::{Event, KeyEventKind};
use ratatui::DefaultTerminal;

use spread_monitor::binance::{BinanceRestClient, PriceSampler};
use spread_monitor::config::Config;
use spread_monitor::event::AppEvent;
use spread_monitor::export;
use spread_monitor::input::{parse_key_event, UiCommand};
use spread_monitor::monitor::{next_deadline, SpreadMonitor};
use spread_monitor::ui::{self, AppState};

fn handle_command<S: PriceSampler>(
    cmd: UiCommand,
    monitor: &mut SpreadMonitor<S>,
    app_state: &mut AppState,
    config: &Config,
) {
    let params = monitor.params();
    let changed = match cmd {
        UiCommand::Pause => {
            app_state.paused = true;
            app_state.apply(AppEvent::LogMessage("paused".to_string()));
            None
        }
        UiCommand::Resume => {
            app_state.paused = false;
            app_state.apply(AppEvent::LogMessage("resumed".to_string()));
            None
        }
        UiCommand::WindowUp => Some(params.step_window(1)),
        UiCommand::WindowDown => Some(params.step_window(-1)),
        UiCommand::ThresholdUp => Some(params.step_threshold(1)),
        UiCommand::ThresholdDown => Some(params.step_threshold(-1)),
        UiCommand::Export => {
            let path = &config.export.path;
            match export::export_to_path(monitor.store(), path) {
                Ok(rows) => app_state.apply(AppEvent::Exported {
                    path: path.clone(),
                    rows,
                }),
                Err(e) => {
                    tracing::error!(error = %format!("{:#}", e), "CSV export failed");
                    app_state.apply(AppEvent::Error(format!("export failed: {:#}", e)));
                }
            }
            None
        }
        UiCommand::Quit => None,
    };

    if let Some(next) = changed.filter(|p| *p != params) {
        monitor.set_params(next);
        app_state.apply(AppEvent::ParamsChanged(next));
    }
}

async fn run<S: PriceSampler>(
    terminal: &mut DefaultTerminal,
    monitor: &mut SpreadMonitor<S>,
    app_state: &mut AppState,
    config: &Config,
) -> Result<()> {
    let poll_interval = Duration::from_millis(config.monitor.poll_interval_ms);
    let refresh = Duration::from_millis(config.ui.refresh_rate_ms);
    let mut next_tick = Instant::now();

    loop {
        terminal.draw(|frame| ui::render(frame, app_state, monitor.store()))?;

        // Handle input (non-blocking, never past the next tick deadline)
        let wait = next_tick.saturating_duration_since(Instant::now()).min(refresh);
        if crossterm::event::poll(wait)? {
            if let Event::Key(key) = crossterm::event::read()? {
                if key.kind == KeyEventKind::Press {
                    match parse_key_event(&key) {
                        Some(UiCommand::Quit) => {
                            tracing::info!("User quit");
                            break;
                        }
                        Some(cmd) => handle_command(cmd, monitor, app_state, config),
                        None => {}
                    }
                }
            }
        }

        let now = Instant::now();
        if now >= next_tick {
            next_tick = next_deadline(next_tick, now, poll_interval);
            if !app_state.paused {
                // The tick runs to completion before the loop continues.
                match monitor.tick().await {
                    Ok(report) => app_state.apply(AppEvent::TickCompleted(report)),
                    Err(e) => app_state.apply(AppEvent::FetchFailed(e.to_string())),
                }
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (required by rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("failed to install rustls crypto provider"))?;

    // Load config
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!("Make sure config/default.toml exists or set SPREAD_MONITOR_CONFIG");
            std::process::exit(1);
        }
    };

    // Init tracing (log to file so it doesn't interfere with TUI)
    let log_file = std::fs::File::create("spread-monitor.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                config
                    .logging
                    .level
                    .parse()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    let params = config.monitor_params()?;
    let (symbol_a, symbol_b) = config.binance.symbols();
    tracing::info!(
        symbol_a = %symbol_a,
        symbol_b = %symbol_b,
        rest_url = %config.binance.rest_base_url,
        window = params.window(),
        alert_threshold = params.alert_threshold(),
        "Starting spread-monitor"
    );

    let client = BinanceRestClient::new(
        &config.binance.rest_base_url,
        config.binance.request_timeout_ms,
    )
    .context("failed to create Binance client")?;

    // Verify connectivity; a failed ping is reported but does not stop the session
    let ping_event = match client.ping().await {
        Ok(()) => {
            tracing::info!("Binance ping OK");
            AppEvent::LogMessage("Binance ping OK".to_string())
        }
        Err(e) => {
            tracing::warn!(error = %format!("{:#}", e), "Binance ping failed");
            AppEvent::Error(format!("Binance ping failed: {:#}", e))
        }
    };

    let mut monitor = SpreadMonitor::new(client, &symbol_a, &symbol_b, params);

    let (sym_a, sym_b) = monitor.symbols();
    let mut app_state = AppState::new(sym_a, sym_b, params, config.ui.chart_history_len);
    app_state.apply(AppEvent::LogMessage(format!(
        "spread-monitor started | {} - {} | window {} | threshold {:.1}",
        sym_a,
        sym_b,
        params.window(),
        params.alert_threshold()
    )));
    app_state.apply(ping_event);

    // TUI main loop
    let mut terminal = ratatui::init();
    let result = run(&mut terminal, &mut monitor, &mut app_state, &config).await;
    ratatui::restore();

    tracing::info!(ticks = monitor.store().len(), "Session ended");
    result
}
