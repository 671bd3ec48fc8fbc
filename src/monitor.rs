use std::time::{Duration, Instant};

use crate::alert::{classify, AlertState};
use crate::binance::PriceSampler;
use crate::config::MonitorParams;
use crate::error::FetchError;
use crate::model::sample::Sample;
use crate::series::SeriesStore;
use crate::stats;

/// Outcome of one completed tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub sample: Sample,
    pub alert: AlertState,
    pub params: MonitorParams,
}

/// Drives one monitoring session: fetch both prices, append, score, classify.
///
/// `tick` takes `&mut self`, so two ticks can never run against the same
/// store at once.
pub struct SpreadMonitor<S> {
    sampler: S,
    symbol_a: String,
    symbol_b: String,
    store: SeriesStore,
    params: MonitorParams,
    last_alert: AlertState,
}

impl<S: PriceSampler> SpreadMonitor<S> {
    pub fn new(
        sampler: S,
        symbol_a: impl Into<String>,
        symbol_b: impl Into<String>,
        params: MonitorParams,
    ) -> Self {
        Self {
            sampler,
            symbol_a: symbol_a.into(),
            symbol_b: symbol_b.into(),
            store: SeriesStore::new(),
            params,
            last_alert: AlertState::Waiting,
        }
    }

    pub fn store(&self) -> &SeriesStore {
        &self.store
    }

    pub fn symbols(&self) -> (&str, &str) {
        (&self.symbol_a, &self.symbol_b)
    }

    pub fn params(&self) -> MonitorParams {
        self.params
    }

    /// Takes effect from the next tick. Recorded z-scores are left as they are.
    pub fn set_params(&mut self, params: MonitorParams) {
        if params != self.params {
            tracing::info!(
                window = params.window(),
                alert_threshold = params.alert_threshold(),
                "Monitor parameters changed"
            );
            self.params = params;
        }
    }

    /// Alert state of the newest recorded z-score under the current threshold.
    pub fn current_alert(&self) -> AlertState {
        let zscore = self.store.latest().and_then(|s| s.zscore);
        classify(zscore, self.params.alert_threshold())
    }

    /// Run one tick. Both prices are fetched before anything is appended, so a
    /// failed fetch leaves the store untouched.
    pub async fn tick(&mut self) -> Result<TickReport, FetchError> {
        let fetched = tokio::try_join!(
            self.sampler.fetch(&self.symbol_a),
            self.sampler.fetch(&self.symbol_b)
        );
        let (price_a, price_b) = match fetched {
            Ok(prices) => prices,
            Err(e) => {
                tracing::warn!(
                    symbol_a = %self.symbol_a,
                    symbol_b = %self.symbol_b,
                    error = %e,
                    timeout = e.is_timeout(),
                    "Price fetch failed, skipping tick"
                );
                return Err(e);
            }
        };
        Ok(self.ingest(price_a, price_b))
    }

    /// Append an already-validated price pair and score it.
    pub fn ingest(&mut self, price_a: f64, price_b: f64) -> TickReport {
        let tick = self.store.append(price_a, price_b);
        let zscore = stats::update(&mut self.store, self.params.window());
        let alert = classify(zscore, self.params.alert_threshold());

        tracing::debug!(tick, price_a, price_b, ?zscore, %alert, "Tick appended");
        if alert != self.last_alert {
            match alert {
                AlertState::Alerting => tracing::warn!(
                    tick,
                    zscore = zscore.unwrap_or_default(),
                    alert_threshold = self.params.alert_threshold(),
                    "Z-score alert"
                ),
                _ => tracing::info!(tick, from = %self.last_alert, to = %alert, "Alert state changed"),
            }
            self.last_alert = alert;
        }

        TickReport {
            sample: Sample {
                tick,
                price_a,
                price_b,
                spread: price_a - price_b,
                zscore,
            },
            alert,
            params: self.params,
        }
    }
}

/// Deadline after `prev` for a fixed cadence. Deadlines missed while a tick
/// was running are skipped rather than replayed back to back.
pub fn next_deadline(prev: Instant, now: Instant, interval: Duration) -> Instant {
    let next = prev + interval;
    if next <= now {
        now + interval
    } else {
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_deadline_keeps_cadence_when_on_time() {
        let t0 = Instant::now();
        let step = Duration::from_millis(1_000);
        assert_eq!(next_deadline(t0, t0 + Duration::from_millis(10), step), t0 + step);
    }

    #[test]
    fn next_deadline_skips_missed_slots() {
        let t0 = Instant::now();
        let step = Duration::from_millis(1_000);
        let late = t0 + Duration::from_millis(3_500);
        assert_eq!(next_deadline(t0, late, step), late + step);
    }
}
