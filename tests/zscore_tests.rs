use spread_monitor::alert::AlertState;
use spread_monitor::config::MonitorParams;
use spread_monitor::monitor::SpreadMonitor;
use spread_monitor::stats::{compute_zscore, mean, population_std_dev};

mod common;
use common::ScriptedSampler;

#[test]
/// Verifies the textbook window [1,2,3,4,5]:
/// mean 3, population std sqrt(2), latest 5 gives z = sqrt(2).
fn zscore_matches_population_formula() {
    let spread = [1.0, 2.0, 3.0, 4.0, 5.0];
    assert!((mean(&spread).unwrap() - 3.0).abs() < 1e-12);
    assert!((population_std_dev(&spread).unwrap() - 2.0_f64.sqrt()).abs() < 1e-12);

    let z = compute_zscore(&spread, 5).unwrap();
    assert!((z - 1.414_213_562_373_095).abs() < 1e-9, "z={}", z);
}

#[test]
/// Verifies a flat window scores exactly 0.0 instead of NaN or an error.
fn zero_variance_window_scores_zero() {
    let spread = vec![5.0; 30];
    let z = compute_zscore(&spread, 30);
    assert_eq!(z, Some(0.0));
    assert!(!z.unwrap().is_nan());
}

#[test]
/// Verifies a flat window scores exactly 0.0 for values that are not exact
/// binary fractions, where the computed mean carries rounding error.
fn zero_variance_window_with_decimal_prices_scores_zero() {
    let cases = [
        (0.1, 10),
        (0.1, 30),
        (61_800.37, 10),
        (61_800.37, 30),
        (64_123.91, 30),
    ];
    for (value, window) in cases {
        let spread = vec![value; window];
        assert_eq!(
            compute_zscore(&spread, window),
            Some(0.0),
            "value={} window={}",
            value,
            window
        );
    }
}

#[test]
/// Verifies a flat decimal spread never alerts, even under a small threshold.
fn flat_decimal_spread_stays_normal() {
    let mut m = SpreadMonitor::new(
        ScriptedSampler::default(),
        "A",
        "B",
        MonitorParams::new(10, 0.5).unwrap(),
    );
    let mut last = None;
    for _ in 0..20 {
        last = Some(m.ingest(64_923.91, 3_123.54));
    }
    let report = last.unwrap();
    assert_eq!(report.sample.zscore, Some(0.0));
    assert_eq!(report.alert, AlertState::Normal);
}

#[test]
/// Verifies a flat tail is enough even when older values varied.
fn zero_variance_only_considers_window() {
    let mut spread = vec![1.0, 9.0, -4.0];
    spread.extend(std::iter::repeat(5.0).take(10));
    assert_eq!(compute_zscore(&spread, 10), Some(0.0));
}

#[test]
/// Verifies z-score is undefined for the first W-1 ticks and defined from tick W on.
fn zscore_undefined_until_window_fills() {
    const W: usize = 10;
    let mut m = SpreadMonitor::new(
        ScriptedSampler::default(),
        "A",
        "B",
        MonitorParams::new(W, 2.0).unwrap(),
    );

    for i in 0..(3 * W) {
        let report = m.ingest(100.0 + (i % 7) as f64, 50.0);
        if i + 1 < W {
            assert_eq!(report.sample.zscore, None, "tick {} should be undefined", i);
        } else {
            assert!(report.sample.zscore.is_some(), "tick {} should be defined", i);
        }
    }

    let undefined = m.store().zscore().iter().filter(|z| z.is_none()).count();
    assert_eq!(undefined, W - 1);
}

#[test]
/// Verifies the score is a pure function of (series, window).
fn compute_zscore_is_repeatable() {
    let spread: Vec<f64> = (0..50).map(|i| ((i * 37) % 11) as f64 - 4.5).collect();
    let first = compute_zscore(&spread, 20);
    for _ in 0..5 {
        assert_eq!(compute_zscore(&spread, 20), first);
    }
}

#[test]
/// Verifies the store's recorded z-score equals a fresh recomputation over its spread prefix.
fn recorded_zscores_match_recomputation() {
    const W: usize = 4;
    let mut m = SpreadMonitor::new(
        ScriptedSampler::default(),
        "A",
        "B",
        MonitorParams::new(W, 2.0).unwrap(),
    );
    for i in 0..20 {
        m.ingest(10.0 + (i as f64).sqrt(), 3.0 + (i % 3) as f64);
    }
    let spread = m.store().spread();
    for (i, recorded) in m.store().zscore().iter().enumerate() {
        assert_eq!(*recorded, compute_zscore(&spread[..=i], W));
    }
}
