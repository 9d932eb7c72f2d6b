use crate::models::{DiagnosticsMap, GtinSummary, HourlyBucket, StationStatus};
use parking_lot::Mutex;
use std::sync::Arc;

pub type Shared<T> = Arc<Mutex<T>>;

pub fn new_state<T>(value: T) -> Shared<T> {
    Arc::new(Mutex::new(value))
}

/// Everything the views are derived from. Only the reconciler mutates it
/// after the snapshot seeds it.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub todays_summary: Vec<GtinSummary>,
    pub yesterdays_summary: Vec<GtinSummary>,
    pub hourly: Vec<HourlyBucket>,
    pub stations: Vec<StationStatus>,
    pub diagnostics: DiagnosticsMap,
}
