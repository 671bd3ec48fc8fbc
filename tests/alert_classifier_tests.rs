use spread_monitor::alert::{alert_ticks, alert_ticks_since, classify, AlertState};
use spread_monitor::config::MonitorParams;
use spread_monitor::monitor::SpreadMonitor;

mod common;
use common::ScriptedSampler;

#[test]
/// Verifies the strict threshold: equal is Normal, just above is Alerting, both signs.
fn threshold_boundary_is_strict() {
    let threshold = 2.0;
    let eps = 1e-9;
    assert_eq!(classify(Some(threshold), threshold), AlertState::Normal);
    assert_eq!(classify(Some(-threshold), threshold), AlertState::Normal);
    assert_eq!(classify(Some(threshold + eps), threshold), AlertState::Alerting);
    assert_eq!(classify(Some(-threshold - eps), threshold), AlertState::Alerting);
}

#[test]
/// Verifies an undefined z-score is Waiting regardless of threshold.
fn undefined_zscore_is_waiting() {
    assert_eq!(classify(None, 0.0), AlertState::Waiting);
    assert_eq!(classify(None, 3.0), AlertState::Waiting);
}

#[test]
/// Verifies classification is memoryless: alerts can flicker tick to tick.
fn classification_has_no_hysteresis() {
    let seq = [2.5, 1.9, 2.1, 0.0, -3.0];
    let states: Vec<AlertState> = seq.iter().map(|z| classify(Some(*z), 2.0)).collect();
    assert_eq!(
        states,
        vec![
            AlertState::Alerting,
            AlertState::Normal,
            AlertState::Alerting,
            AlertState::Normal,
            AlertState::Alerting,
        ]
    );
}

#[test]
/// Verifies the monitor reports Waiting, then flags a spread jump after the window fills.
fn monitor_flags_spread_jump() {
    let mut m = SpreadMonitor::new(
        ScriptedSampler::default(),
        "A",
        "B",
        MonitorParams::new(5, 1.5).unwrap(),
    );
    for a in [10.0, 10.1, 9.9, 10.0] {
        let report = m.ingest(a, 1.0);
        assert_eq!(report.alert, AlertState::Waiting);
    }

    let report = m.ingest(20.0, 1.0);
    assert_eq!(report.alert, AlertState::Alerting);
    assert_eq!(m.current_alert(), AlertState::Alerting);
}

#[test]
/// Verifies historical alert points follow the current threshold.
fn alert_ticks_use_current_threshold() {
    let mut m = SpreadMonitor::new(
        ScriptedSampler::default(),
        "A",
        "B",
        MonitorParams::new(5, 2.0).unwrap(),
    );
    for a in [1.0, 2.0, 3.0, 4.0, 5.0] {
        m.ingest(a, 0.0);
    }
    // Tick 4 scored sqrt(2) ~= 1.414.
    assert!(alert_ticks(m.store(), 2.0).is_empty());
    assert_eq!(alert_ticks(m.store(), 1.0), vec![4]);
}

#[test]
/// Verifies the windowed scan keeps absolute tick numbers and skips older alerts.
fn alert_ticks_since_only_reports_recent_ticks() {
    let mut m = SpreadMonitor::new(
        ScriptedSampler::default(),
        "A",
        "B",
        MonitorParams::new(5, 1.0).unwrap(),
    );
    // Ticks 4 and 9 both score sqrt(2) ~= 1.414.
    for a in [1.0, 2.0, 3.0, 4.0, 5.0, 1.0, 2.0, 3.0, 4.0, 5.0] {
        m.ingest(a, 0.0);
    }
    let all = alert_ticks(m.store(), 1.0);
    assert!(all.contains(&4) && all.contains(&9));

    let recent = alert_ticks_since(m.store(), 7, 1.0);
    assert!(recent.iter().all(|t| *t >= 7));
    assert!(recent.contains(&9));
    assert!(alert_ticks_since(m.store(), 100, 1.0).is_empty());
}
