use std::path::PathBuf;

use crate::config::MonitorParams;
use crate::monitor::TickReport;

#[derive(Debug, Clone)]
pub enum AppEvent {
    TickCompleted(TickReport),
    FetchFailed(String),
    ParamsChanged(MonitorParams),
    Exported { path: PathBuf, rows: usize },
    LogMessage(String),
    Error(String),
}
