use crate::series::SeriesStore;

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Standard deviation with divisor `n` (the window is the whole population).
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    let variance = values
        .iter()
        .map(|v| {
            let d = *v - mean;
            d * d
        })
        .sum::<f64>()
        / values.len() as f64;
    Some(variance.sqrt())
}

/// Z-score of the newest spread value against the trailing `window` values.
///
/// Returns `None` while fewer than `window` values exist. A flat window has
/// no deviation and scores exactly `0.0`.
pub fn compute_zscore(spread: &[f64], window: usize) -> Option<f64> {
    if window == 0 || spread.len() < window {
        return None;
    }
    let recent = &spread[spread.len() - window..];
    let latest = *recent.last()?;
    // Rounding in the mean leaves a tiny sigma for values like 0.1, so check
    // identity directly.
    if recent.iter().all(|v| *v == latest) {
        return Some(0.0);
    }
    let mu = mean(recent)?;
    let sigma = population_std_dev(recent)?;
    if sigma == 0.0 {
        return Some(0.0);
    }
    Some((latest - mu) / sigma)
}

/// Score the newest tick of `store` and record the result in its z-score
/// series. Recomputes over the window from scratch every call.
pub fn update(store: &mut SeriesStore, window: usize) -> Option<f64> {
    let zscore = compute_zscore(store.spread(), window);
    if !store.record_zscore(zscore) {
        tracing::warn!(len = store.len(), "z-score update with no pending tick");
    }
    zscore
}
