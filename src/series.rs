use crate::model::sample::{Sample, Tick};

/// Append-only store of the four aligned series of one monitoring session.
///
/// `append` extends price A, price B and spread together. The z-score slot of
/// the newest tick is filled once by [`crate::stats::update`] within the same
/// tick, after which all four series have equal length again.
#[derive(Debug, Clone, Default)]
pub struct SeriesStore {
    price_a: Vec<f64>,
    price_b: Vec<f64>,
    spread: Vec<f64>,
    zscore: Vec<Option<f64>>,
}

impl SeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one pair of prices and return the tick assigned to it.
    pub fn append(&mut self, price_a: f64, price_b: f64) -> Tick {
        debug_assert!(
            !self.has_pending_zscore(),
            "append before previous tick's z-score was recorded"
        );
        let tick = self.spread.len() as Tick;
        self.price_a.push(price_a);
        self.price_b.push(price_b);
        self.spread.push(price_a - price_b);
        tick
    }

    /// Fill the z-score slot of the newest tick. Returns `false` (and records
    /// nothing) when there is no unscored tick.
    pub(crate) fn record_zscore(&mut self, zscore: Option<f64>) -> bool {
        if !self.has_pending_zscore() {
            return false;
        }
        self.zscore.push(zscore);
        true
    }

    pub(crate) fn has_pending_zscore(&self) -> bool {
        self.zscore.len() < self.spread.len()
    }

    pub fn len(&self) -> usize {
        self.spread.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spread.is_empty()
    }

    /// Last `n` spread values, or the whole spread series if it is shorter.
    pub fn tail(&self, n: usize) -> &[f64] {
        let start = self.spread.len().saturating_sub(n);
        &self.spread[start..]
    }

    pub fn latest(&self) -> Option<Sample> {
        let len = self.spread.len();
        if len == 0 {
            return None;
        }
        self.sample((len - 1) as Tick)
    }

    pub fn sample(&self, tick: Tick) -> Option<Sample> {
        let i = usize::try_from(tick).ok()?;
        Some(Sample {
            tick,
            price_a: *self.price_a.get(i)?,
            price_b: *self.price_b.get(i)?,
            spread: *self.spread.get(i)?,
            zscore: self.zscore.get(i).copied().flatten(),
        })
    }

    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        (0..self.spread.len()).filter_map(|i| self.sample(i as Tick))
    }

    pub fn price_a(&self) -> &[f64] {
        &self.price_a
    }

    pub fn price_b(&self) -> &[f64] {
        &self.price_b
    }

    pub fn spread(&self) -> &[f64] {
        &self.spread
    }

    pub fn zscore(&self) -> &[Option<f64>] {
        &self.zscore
    }
}
