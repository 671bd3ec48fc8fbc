/// Logical time of a sample: 0-based, one per appended price pair.
pub type Tick = u64;

/// One fully-formed row of the monitored series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub tick: Tick,
    pub price_a: f64,
    pub price_b: f64,
    pub spread: f64,
    /// `None` until the rolling window has filled.
    pub zscore: Option<f64>,
}
