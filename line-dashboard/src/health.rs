use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardHealth {
    pub uptime_seconds: u64,
    pub push_status: String,
    pub push_reconnects: u32,
    pub events_applied: u64,
    pub events_dropped: u64,
    pub stations_tracked: u32,
    pub gtins_today: u32,
}

/// Push-channel connection state and event counters, shared between the
/// MQTT listener, the event consumer and the HTTP layer.
#[derive(Clone)]
pub struct ConnectionTracker {
    start_time: Instant,
    push_reconnects: Arc<AtomicU32>,
    push_status: Arc<Mutex<String>>,
    events_applied: Arc<AtomicU64>,
    events_dropped: Arc<AtomicU64>,
}

impl ConnectionTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            push_reconnects: Arc::new(AtomicU32::new(0)),
            push_status: Arc::new(Mutex::new("connecting".to_string())),
            events_applied: Arc::new(AtomicU64::new(0)),
            events_dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn mark_connected(&self) {
        *self.push_status.lock() = "connected".to_string();
    }

    pub fn mark_disconnected(&self) {
        *self.push_status.lock() = "disconnected".to_string();
    }

    pub fn increment_reconnects(&self) {
        self.push_reconnects.fetch_add(1, Ordering::Relaxed);
        *self.push_status.lock() = "reconnecting".to_string();
    }

    pub fn record_applied(&self) {
        self.events_applied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self) {
        self.events_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn push_status(&self) -> String {
        self.push_status.lock().clone()
    }

    pub fn get_health(&self, stations_tracked: usize, gtins_today: usize) -> DashboardHealth {
        DashboardHealth {
            uptime_seconds: self.start_time.elapsed().as_secs(),
            push_status: self.push_status(),
            push_reconnects: self.push_reconnects.load(Ordering::Relaxed),
            events_applied: self.events_applied.load(Ordering::Relaxed),
            events_dropped: self.events_dropped.load(Ordering::Relaxed),
            stations_tracked: stations_tracked as u32,
            gtins_today: gtins_today as u32,
        }
    }
}

impl Default for ConnectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        let tracker = ConnectionTracker::new();
        assert_eq!(tracker.push_status(), "connecting");
        tracker.mark_connected();
        tracker.increment_reconnects();
        tracker.increment_reconnects();
        let health = tracker.get_health(3, 7);
        assert_eq!(health.push_status, "reconnecting");
        assert_eq!(health.push_reconnects, 2);
        assert_eq!(health.stations_tracked, 3);
        tracker.mark_disconnected();
        assert_eq!(tracker.push_status(), "disconnected");
    }

    #[test]
    fn test_counters_shared_between_clones() {
        let tracker = ConnectionTracker::new();
        let listener_side = tracker.clone();
        listener_side.record_applied();
        listener_side.record_applied();
        listener_side.record_dropped();
        let health = tracker.get_health(0, 0);
        assert_eq!((health.events_applied, health.events_dropped), (2, 1));
    }
}
