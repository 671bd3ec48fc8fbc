use std::fmt;

use crate::model::sample::Tick;
use crate::series::SeriesStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertState {
    /// Window not yet filled.
    Waiting,
    Normal,
    Alerting,
}

impl AlertState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "WAITING",
            Self::Normal => "NORMAL",
            Self::Alerting => "ALERT",
        }
    }
}

impl fmt::Display for AlertState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A z-score exactly at the threshold is still Normal.
pub fn classify(zscore: Option<f64>, threshold: f64) -> AlertState {
    match zscore {
        None => AlertState::Waiting,
        Some(z) if z.abs() > threshold => AlertState::Alerting,
        Some(_) => AlertState::Normal,
    }
}

/// Ticks whose recorded z-score alerts under `threshold`.
pub fn alert_ticks(store: &SeriesStore, threshold: f64) -> Vec<Tick> {
    alert_ticks_since(store, 0, threshold)
}

/// Like [`alert_ticks`], but only scans ticks from `from` onward.
pub fn alert_ticks_since(store: &SeriesStore, from: Tick, threshold: f64) -> Vec<Tick> {
    let zscores = store.zscore();
    let start = (from as usize).min(zscores.len());
    zscores[start..]
        .iter()
        .enumerate()
        .filter(|(_, z)| classify(**z, threshold) == AlertState::Alerting)
        .map(|(i, _)| (start + i) as Tick)
        .collect()
}
