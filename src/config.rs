use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::AppError;

pub const WINDOW_RANGE: (usize, usize) = (10, 100);
pub const THRESHOLD_RANGE: (f64, f64) = (1.0, 3.0);
const THRESHOLD_STEP: f64 = 0.1;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub binance: BinanceConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BinanceConfig {
    pub rest_base_url: String,
    pub symbol_a: String,
    pub symbol_b: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    pub window: usize,
    pub alert_threshold: f64,
    pub poll_interval_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            window: 30,
            alert_threshold: 2.0,
            poll_interval_ms: 1_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    pub refresh_rate_ms: u64,
    pub chart_history_len: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_ms: 100,
            chart_history_len: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    pub path: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("quant_dashboard_data.csv"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

fn default_request_timeout_ms() -> u64 {
    5_000
}

/// Validated z-score parameters in effect for the next tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorParams {
    window: usize,
    alert_threshold: f64,
}

impl MonitorParams {
    pub fn new(window: usize, alert_threshold: f64) -> Result<Self, AppError> {
        if window == 0 {
            return Err(AppError::Config("monitor.window must be >= 1".to_string()));
        }
        if !alert_threshold.is_finite() || alert_threshold < 0.0 {
            return Err(AppError::Config(format!(
                "monitor.alert_threshold must be a finite value >= 0, got {}",
                alert_threshold
            )));
        }
        Ok(Self {
            window,
            alert_threshold,
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn alert_threshold(&self) -> f64 {
        self.alert_threshold
    }

    /// Move the window by `delta`, clamped to the dashboard range.
    pub fn step_window(self, delta: isize) -> Self {
        let (lo, hi) = WINDOW_RANGE;
        let window = self.window.saturating_add_signed(delta).clamp(lo, hi);
        Self { window, ..self }
    }

    /// Move the threshold by `steps` tenths, clamped to the dashboard range.
    pub fn step_threshold(self, steps: i32) -> Self {
        let (lo, hi) = THRESHOLD_RANGE;
        let raw = self.alert_threshold + steps as f64 * THRESHOLD_STEP;
        // Keep one decimal so repeated steps don't accumulate float noise.
        let alert_threshold = ((raw * 10.0).round() / 10.0).clamp(lo, hi);
        Self {
            alert_threshold,
            ..self
        }
    }
}

impl BinanceConfig {
    /// Upper-cased `(symbol_a, symbol_b)`.
    pub fn symbols(&self) -> (String, String) {
        (
            self.symbol_a.trim().to_ascii_uppercase(),
            self.symbol_b.trim().to_ascii_uppercase(),
        )
    }

    fn validate(&self) -> Result<(), AppError> {
        url::Url::parse(&self.rest_base_url).map_err(|e| {
            AppError::Config(format!(
                "binance.rest_base_url '{}' is invalid: {}",
                self.rest_base_url, e
            ))
        })?;
        let (a, b) = self.symbols();
        if a.is_empty() || b.is_empty() {
            return Err(AppError::Config(
                "binance.symbol_a and binance.symbol_b must be set".to_string(),
            ));
        }
        if a == b {
            return Err(AppError::Config(format!(
                "binance.symbol_a and binance.symbol_b are both '{}'",
                a
            )));
        }
        if self.request_timeout_ms == 0 {
            return Err(AppError::Config(
                "binance.request_timeout_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_path = std::env::var("SPREAD_MONITOR_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config/default.toml"));
        Self::load_from_path(&config_path)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&config_str)
            .with_context(|| format!("failed to load {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).context("failed to parse config toml")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.binance.validate()?;
        self.monitor_params()?;
        if self.monitor.poll_interval_ms == 0 {
            return Err(AppError::Config(
                "monitor.poll_interval_ms must be > 0".to_string(),
            ));
        }
        if self.ui.refresh_rate_ms == 0 {
            return Err(AppError::Config("ui.refresh_rate_ms must be > 0".to_string()));
        }
        Ok(())
    }

    pub fn monitor_params(&self) -> Result<MonitorParams, AppError> {
        MonitorParams::new(self.monitor.window, self.monitor.alert_threshold)
    }
}
