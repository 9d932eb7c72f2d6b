/**
 * DASHBOARD - reconciled state, load status and tab handling.
 *
 * `Dashboard` is the synchronous state machine: it never awaits, so it can
 * sit behind a parking_lot mutex. `DashboardHandle` does the async work
 * (snapshot load, yesterday fetch) outside the lock and feeds results back.
 *
 * Push events go through `DashboardHandle::apply`, called from a single
 * consumer task, so two events are never reconciled concurrently. Events
 * arriving while a snapshot is loading are held back and replayed, in
 * arrival order, on top of the seeded snapshot.
 */

use crate::api::SummaryApi;
use crate::clock::Clock;
use crate::config::PushConf;
use crate::error::{ApiError, LoadError};
use crate::health::{ConnectionTracker, DashboardHealth};
use crate::loader::{load_snapshot, load_yesterday, LoadPlan, Snapshot};
use crate::models::{GtinSummary, ScanEvent};
use crate::push::{spawn_push_listener, PushEvent};
use crate::reconcile::{
    fold_scan_into_gtin_summary, fold_scan_into_hourly, upsert_station_diagnostics, upsert_station_status,
};
use crate::session::{CancelToken, SessionGuard};
use crate::state::{new_state, DashboardState, Shared};
use crate::views::{hourly_view, station_view, summary_view, DashboardViews};
use serde::{Deserialize, Serialize};
use std::mem;
use std::str::FromStr;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

pub const LOAD_ERROR_MESSAGE: &str = "Failed to load data. Is the API running?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Today,
    Yesterday,
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "today" => Ok(Tab::Today),
            "yesterday" => Ok(Tab::Yesterday),
            other => Err(format!("unknown tab '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed(String),
}

/// Outcome of handing one push event to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    Dropped,
    /// Held until the running load has seeded the state.
    Queued,
}

/// What the caller has to do after a tab switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabFetch {
    Nothing,
    Yesterday,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum YesterdayCache {
    Empty,
    InFlight,
    Loaded,
}

#[derive(Debug)]
pub struct Dashboard {
    state: DashboardState,
    status: LoadStatus,
    active_tab: Tab,
    yesterday: YesterdayCache,
    preloading_yesterday: bool,
    pending: Vec<(PushEvent, u8)>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            state: DashboardState::default(),
            status: LoadStatus::Loading,
            active_tab: Tab::Today,
            yesterday: YesterdayCache::Empty,
            preloading_yesterday: false,
            pending: Vec::new(),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    /// A preloading plan claims the yesterday cache up front so a tab
    /// switch during the load does not fetch it a second time.
    pub fn begin_load(&mut self, plan: LoadPlan) {
        self.status = LoadStatus::Loading;
        if plan.preload_yesterday && self.yesterday == YesterdayCache::Empty {
            self.yesterday = YesterdayCache::InFlight;
            self.preloading_yesterday = true;
        }
    }

    /// Seed state from a finished load, then replay the events held back
    /// while it ran. Returns how many were replayed.
    ///
    /// A cancelled load changes nothing: it must not flash an error on a
    /// fast restart. Held events stay queued for the next load.
    pub fn finish_load(&mut self, result: Result<Snapshot, LoadError>) -> usize {
        let preloading = mem::take(&mut self.preloading_yesterday);
        match result {
            Ok(snapshot) => {
                self.state.todays_summary = snapshot.todays_summary;
                self.state.hourly = snapshot.hourly;
                self.state.stations = snapshot.stations;
                if let Some(yesterday) = snapshot.yesterdays_summary {
                    self.state.yesterdays_summary = yesterday;
                    self.yesterday = YesterdayCache::Loaded;
                }
                self.status = LoadStatus::Ready;
            }
            Err(e) => {
                if preloading && self.yesterday == YesterdayCache::InFlight {
                    self.yesterday = YesterdayCache::Empty;
                }
                match e {
                    LoadError::Cancelled => {
                        debug!(held = self.pending.len(), "snapshot load cancelled");
                        return 0;
                    }
                    LoadError::Failed(e) => {
                        error!(error = %e, "failed to load snapshot");
                        self.status = LoadStatus::Failed(LOAD_ERROR_MESSAGE.to_string());
                    }
                }
            }
        }

        let pending = mem::take(&mut self.pending);
        let replayed = pending.len();
        for (event, local_hour) in pending {
            self.fold(event, local_hour);
        }
        if replayed > 0 {
            debug!(replayed, "replayed events held during load");
        }
        replayed
    }

    /// Hand one push event to the dashboard. Invalid events are dropped
    /// right away; valid ones wait while a load is running.
    pub fn apply(&mut self, event: PushEvent, local_hour: u8) -> Applied {
        if !accepts(&event) {
            return Applied::Dropped;
        }
        if self.status == LoadStatus::Loading {
            self.pending.push((event, local_hour));
            return Applied::Queued;
        }
        self.fold(event, local_hour);
        Applied::Applied
    }

    fn fold(&mut self, event: PushEvent, local_hour: u8) {
        let state = &mut self.state;
        match event {
            PushEvent::Scan(scan) => {
                state.todays_summary = fold_scan_into_gtin_summary(mem::take(&mut state.todays_summary), &scan);
                state.hourly = fold_scan_into_hourly(mem::take(&mut state.hourly), &scan, local_hour);
            }
            PushEvent::StationStatus(status) => {
                state.stations = upsert_station_status(mem::take(&mut state.stations), status);
            }
            PushEvent::StationDiagnostics(update) => {
                state.diagnostics =
                    upsert_station_diagnostics(mem::take(&mut state.diagnostics), &update.station_id, update.diagnostics);
            }
        }
    }

    /// Switch tabs. Asks for the yesterday fetch only while nothing is
    /// cached or in flight.
    pub fn select_tab(&mut self, tab: Tab) -> TabFetch {
        self.active_tab = tab;
        if tab == Tab::Yesterday && self.yesterday == YesterdayCache::Empty {
            self.yesterday = YesterdayCache::InFlight;
            return TabFetch::Yesterday;
        }
        TabFetch::Nothing
    }

    /// Store the on-demand fetch result. A failure leaves the cache empty so
    /// the next activation can try again, unless a load filled it meanwhile.
    pub fn finish_yesterday(&mut self, result: Result<Vec<GtinSummary>, ApiError>) {
        match result {
            Ok(rows) => {
                self.state.yesterdays_summary = rows;
                self.yesterday = YesterdayCache::Loaded;
            }
            Err(e) => {
                warn!(error = %e, "failed to load yesterday's summary");
                if self.yesterday != YesterdayCache::Loaded {
                    self.yesterday = YesterdayCache::Empty;
                }
            }
        }
    }

    pub fn pending_events(&self) -> usize {
        self.pending.len()
    }

    pub fn views(&self, now: OffsetDateTime) -> DashboardViews {
        let rows = match self.active_tab {
            Tab::Today => &self.state.todays_summary,
            Tab::Yesterday => &self.state.yesterdays_summary,
        };
        DashboardViews {
            status: self.status.clone(),
            active_tab: self.active_tab,
            summary: summary_view(self.active_tab, rows),
            hourly: hourly_view(&self.state.hourly),
            stations: station_view(&self.state.stations, &self.state.diagnostics, now),
        }
    }
}

fn accepts(event: &PushEvent) -> bool {
    match event {
        PushEvent::Scan(scan) => {
            if scan.key().is_none() {
                debug!("scan without gtin dropped");
                return false;
            }
            true
        }
        PushEvent::StationStatus(status) => !status.station_id.trim().is_empty(),
        PushEvent::StationDiagnostics(update) => !update.station_id.trim().is_empty(),
    }
}

/// Cloneable async front of a [`Dashboard`].
#[derive(Clone)]
pub struct DashboardHandle {
    dashboard: Shared<Dashboard>,
    api: Arc<dyn SummaryApi>,
    clock: Arc<dyn Clock>,
    tracker: ConnectionTracker,
    live: SessionGuard,
    changes: Arc<watch::Sender<u64>>,
}

impl DashboardHandle {
    pub fn new(api: Arc<dyn SummaryApi>, clock: Arc<dyn Clock>) -> Self {
        let (changes, _rx) = watch::channel(0);
        Self {
            dashboard: new_state(Dashboard::new()),
            api,
            clock,
            tracker: ConnectionTracker::new(),
            live: SessionGuard::new(),
            changes: Arc::new(changes),
        }
    }

    pub fn tracker(&self) -> &ConnectionTracker {
        &self.tracker
    }

    /// Receiver bumped after every state change.
    pub fn subscribe_changes(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    fn changed(&self) {
        self.changes.send_modify(|rev| *rev = rev.wrapping_add(1));
    }

    pub async fn load(&self, cancel: &CancelToken, plan: LoadPlan) {
        self.dashboard.lock().begin_load(plan);
        self.changed();
        let result = load_snapshot(self.api.as_ref(), self.clock.as_ref(), cancel, plan).await;
        let cancelled = matches!(result, Err(LoadError::Cancelled));
        let replayed = self.dashboard.lock().finish_load(result);
        for _ in 0..replayed {
            self.tracker.record_applied();
        }
        if !cancelled {
            self.changed();
        }
    }

    /// Fold one event, bucketing scans by the clock's current local hour.
    pub fn apply(&self, event: PushEvent) {
        let local_hour = self.clock.local_hour();
        let outcome = self.dashboard.lock().apply(event, local_hour);
        match outcome {
            Applied::Applied => {
                self.tracker.record_applied();
                self.changed();
            }
            Applied::Dropped => self.tracker.record_dropped(),
            Applied::Queued => {}
        }
    }

    pub async fn select_tab(&self, tab: Tab) {
        let fetch = self.dashboard.lock().select_tab(tab);
        self.changed();
        if fetch == TabFetch::Yesterday {
            info!("fetching yesterday's summary");
            let result = load_yesterday(self.api.as_ref(), self.clock.as_ref()).await;
            self.dashboard.lock().finish_yesterday(result);
            self.changed();
        }
    }

    pub fn views(&self) -> DashboardViews {
        let now = self.clock.now_utc();
        self.dashboard.lock().views(now)
    }

    pub fn health(&self) -> DashboardHealth {
        let dashboard = self.dashboard.lock();
        let state = dashboard.state();
        self.tracker.get_health(state.stations.len(), state.todays_summary.len())
    }

    /// Start the push subscription and its consumer. Runs once per handle;
    /// later calls return `None`.
    pub fn start_live_updates(&self, cfg: PushConf, api_key: Option<String>) -> Option<LiveUpdates> {
        self.live.run_once(|| {
            let (tx, mut rx) = mpsc::channel::<PushEvent>(256);
            let listener = spawn_push_listener(cfg, api_key, self.tracker.clone(), tx);
            let handle = self.clone();
            let consumer = tokio::spawn(async move {
                while let Some(event) = rx.recv().await {
                    handle.apply(event);
                }
            });
            LiveUpdates { listener, consumer }
        })
    }

    /// Convenience for callers holding a raw scan (tests, replay tools).
    pub fn apply_scan(&self, scan: ScanEvent) {
        self.apply(PushEvent::Scan(scan));
    }
}

/// Tasks behind the live subscription.
pub struct LiveUpdates {
    listener: JoinHandle<()>,
    consumer: JoinHandle<()>,
}

impl LiveUpdates {
    pub fn stop(self) {
        self.listener.abort();
        self.consumer.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::clock::FixedClock;
    use crate::models::{HourlyRate, StationDiagnostics, StationDiagnosticsUpdate, StationStatus};
    use std::time::Duration;
    use time::macros::{datetime, offset};

    fn scan(gtin: &str, description: &str, pounds: f64) -> ScanEvent {
        ScanEvent {
            gtin: Some(gtin.into()),
            application_description: Some(description.into()),
            total_pounds: pounds,
            ..Default::default()
        }
    }

    fn ready() -> Dashboard {
        let mut dashboard = Dashboard::new();
        dashboard.finish_load(Ok(Snapshot::default()));
        dashboard
    }

    fn station(id: &str, status: &str) -> StationStatus {
        StationStatus {
            station_id: id.into(),
            current_status: Some(status.into()),
            ip_address: None,
            last_seen: None,
        }
    }

    fn setup(api: FakeApi) -> (DashboardHandle, Arc<FakeApi>, Arc<FixedClock>) {
        let api = Arc::new(api);
        let clock = Arc::new(FixedClock::new(datetime!(2024-03-05 15:20 UTC), offset!(-5)));
        (DashboardHandle::new(api.clone(), clock.clone()), api, clock)
    }

    #[test]
    fn test_failed_load_sets_error_and_clears_loading() {
        let mut dashboard = Dashboard::new();
        dashboard.finish_load(Err(LoadError::Failed(ApiError::Status { path: "/x".into(), status: 503 })));
        assert_eq!(dashboard.status(), &LoadStatus::Failed(LOAD_ERROR_MESSAGE.into()));
    }

    #[test]
    fn test_cancelled_load_sets_no_error() {
        let mut dashboard = Dashboard::new();
        dashboard.finish_load(Err(LoadError::Cancelled));
        assert_eq!(dashboard.status(), &LoadStatus::Loading);
    }

    #[test]
    fn test_scan_updates_summary_and_hourly_together() {
        let mut dashboard = ready();
        assert_eq!(dashboard.apply(PushEvent::Scan(scan("A", "Mozzarella", 10.0)), 10), Applied::Applied);
        assert_eq!(dashboard.apply(PushEvent::Scan(ScanEvent::default()), 10), Applied::Dropped);
        let state = dashboard.state();
        assert_eq!(state.todays_summary.len(), 1);
        assert_eq!(state.hourly.len(), 1);
        assert_eq!(state.hourly[0].total_cases, 1);
    }

    #[test]
    fn test_yesterday_tab_requests_fetch_once() {
        let mut dashboard = Dashboard::new();
        assert_eq!(dashboard.select_tab(Tab::Yesterday), TabFetch::Yesterday);
        // still in flight
        assert_eq!(dashboard.select_tab(Tab::Today), TabFetch::Nothing);
        assert_eq!(dashboard.select_tab(Tab::Yesterday), TabFetch::Nothing);
        dashboard.finish_yesterday(Err(ApiError::Status { path: "/y".into(), status: 500 }));
        assert_eq!(dashboard.select_tab(Tab::Yesterday), TabFetch::Yesterday);
        dashboard.finish_yesterday(Ok(Vec::new()));
        assert_eq!(dashboard.select_tab(Tab::Yesterday), TabFetch::Nothing);
    }

    #[test]
    fn test_events_during_load_replay_on_snapshot() {
        let mut dashboard = Dashboard::new();
        dashboard.begin_load(LoadPlan::default());
        assert_eq!(dashboard.apply(PushEvent::Scan(scan("A", "Asiago", 5.0)), 9), Applied::Queued);
        assert_eq!(dashboard.apply(PushEvent::StationStatus(station("S1", "Online")), 9), Applied::Queued);
        assert_eq!(dashboard.apply(PushEvent::StationStatus(station(" ", "Online")), 9), Applied::Dropped);
        assert_eq!(dashboard.pending_events(), 2);

        let snapshot = Snapshot {
            todays_summary: vec![GtinSummary {
                gtin: "A".into(),
                item_code: "IC".into(),
                application_description: "Asiago".into(),
                total_cases: 3,
                total_pounds: 30.0,
            }],
            stations: vec![station("S1", "Offline")],
            ..Snapshot::default()
        };
        assert_eq!(dashboard.finish_load(Ok(snapshot)), 2);
        assert_eq!(dashboard.pending_events(), 0);

        let state = dashboard.state();
        assert_eq!(state.todays_summary[0].total_cases, 4);
        assert_eq!(state.todays_summary[0].total_pounds, 35.0);
        assert_eq!(state.hourly[0].hour, 9);
        // the live status arrived after the snapshot was taken
        assert_eq!(state.stations[0].current_status.as_deref(), Some("Online"));
    }

    #[test]
    fn test_cancelled_load_keeps_held_events() {
        let mut dashboard = Dashboard::new();
        dashboard.begin_load(LoadPlan::default());
        dashboard.apply(PushEvent::Scan(scan("A", "Asiago", 5.0)), 9);
        assert_eq!(dashboard.finish_load(Err(LoadError::Cancelled)), 0);
        assert_eq!(dashboard.pending_events(), 1);

        dashboard.begin_load(LoadPlan::default());
        assert_eq!(dashboard.finish_load(Ok(Snapshot::default())), 1);
        assert_eq!(dashboard.state().todays_summary.len(), 1);
    }

    #[test]
    fn test_preloading_load_claims_yesterday_cache() {
        let mut dashboard = Dashboard::new();
        dashboard.begin_load(LoadPlan::default());
        assert_eq!(dashboard.select_tab(Tab::Yesterday), TabFetch::Nothing);

        // a failed load hands the fetch back to the tab
        dashboard.finish_load(Err(LoadError::Failed(ApiError::Status { path: "/x".into(), status: 503 })));
        assert_eq!(dashboard.select_tab(Tab::Yesterday), TabFetch::Yesterday);
    }

    #[test]
    fn test_failed_tab_fetch_keeps_loaded_yesterday() {
        let mut dashboard = Dashboard::new();
        dashboard.begin_load(LoadPlan { preload_yesterday: false });
        assert_eq!(dashboard.select_tab(Tab::Yesterday), TabFetch::Yesterday);
        dashboard.finish_load(Ok(Snapshot { yesterdays_summary: Some(Vec::new()), ..Snapshot::default() }));
        dashboard.finish_yesterday(Err(ApiError::Status { path: "/y".into(), status: 500 }));
        assert_eq!(dashboard.select_tab(Tab::Yesterday), TabFetch::Nothing);
    }

    #[tokio::test]
    async fn test_yesterday_fetched_once_across_tab_switches() {
        let (handle, api, _clock) = setup(FakeApi::default());
        handle.load(&CancelToken::new(), LoadPlan { preload_yesterday: false }).await;

        for _ in 0..4 {
            handle.select_tab(Tab::Yesterday).await;
            handle.select_tab(Tab::Today).await;
        }
        handle.select_tab(Tab::Yesterday).await;

        assert_eq!(api.summary_calls_for("240304"), 1);
        assert_eq!(handle.views().active_tab, Tab::Yesterday);
    }

    #[tokio::test]
    async fn test_preloaded_yesterday_never_refetched() {
        let (handle, api, _clock) = setup(FakeApi::default());
        handle.load(&CancelToken::new(), LoadPlan::default()).await;
        handle.select_tab(Tab::Yesterday).await;
        handle.select_tab(Tab::Yesterday).await;
        assert_eq!(api.summary_calls_for("240304"), 1);
    }

    #[tokio::test]
    async fn test_live_scans_bucket_by_arrival_hour() {
        let api = FakeApi::default();
        *api.hourly.lock() = vec![HourlyRate { hour: 15, total_cases: 4, total_pounds: 40.0 }];
        let (handle, _api, clock) = setup(api);
        handle.load(&CancelToken::new(), LoadPlan::default()).await;

        // 15:20 UTC is 10:20 local: lands on the converted snapshot bucket
        handle.apply_scan(scan("A", "Mozzarella", 10.0));
        clock.advance(time::Duration::hours(1));
        handle.apply_scan(scan("A", "Mozzarella", 5.0));

        let views = handle.views();
        assert_eq!(views.hourly[10].total_cases, 5);
        assert_eq!(views.hourly[10].total_pounds, 50.0);
        assert_eq!(views.hourly[11].total_cases, 1);
        assert_eq!(views.summary.rows[0].total_cases, 2);
        assert_eq!(handle.health().events_applied, 2);
    }

    #[tokio::test]
    async fn test_diagnostics_before_status_renders_placeholders() {
        let (handle, _api, _clock) = setup(FakeApi::default());
        handle.load(&CancelToken::new(), LoadPlan::default()).await;
        handle.apply(PushEvent::StationDiagnostics(StationDiagnosticsUpdate {
            station_id: "S4".into(),
            diagnostics: StationDiagnostics {
                uptime_seconds: 90,
                cpu_usage_percent: 3.0,
                memory_usage_mb: 100.0,
                scans_since_boot: 12,
            },
        }));
        let views = handle.views();
        let row = &views.stations.rows[0];
        assert_eq!(row.station_id, "S4");
        assert_eq!(row.status, "Unknown");
        assert_eq!(row.ip_address, "N/A");
        assert_eq!(row.scans_since_boot, "12");

        handle.apply(PushEvent::StationStatus(StationStatus {
            station_id: "S4".into(),
            current_status: Some("Online".into()),
            ip_address: Some("10.1.1.4".into()),
            last_seen: None,
        }));
        assert_eq!(handle.views().stations.rows[0].status, "Online");
    }

    #[tokio::test]
    async fn test_changes_are_signalled() {
        let (handle, _api, _clock) = setup(FakeApi::default());
        handle.load(&CancelToken::new(), LoadPlan::default()).await;
        let mut rx = handle.subscribe_changes();
        handle.apply_scan(scan("A", "Mozzarella", 1.0));
        assert!(rx.has_changed().unwrap());
        let _ = rx.borrow_and_update();
        handle.apply_scan(ScanEvent::default());
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_tab_switch_during_preload_fetches_yesterday_once() {
        let api = FakeApi::default();
        *api.delay.lock() = Some(Duration::from_millis(100));
        let (handle, api, _clock) = setup(api);

        let loading = {
            let handle = handle.clone();
            tokio::spawn(async move { handle.load(&CancelToken::new(), LoadPlan::default()).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.select_tab(Tab::Yesterday).await;
        handle.select_tab(Tab::Today).await;
        handle.select_tab(Tab::Yesterday).await;
        loading.await.unwrap();
        handle.select_tab(Tab::Yesterday).await;

        assert_eq!(api.summary_calls_for("240304"), 1);
    }

    #[tokio::test]
    async fn test_live_events_during_load_survive_snapshot() {
        let api = FakeApi::default();
        *api.delay.lock() = Some(Duration::from_millis(100));
        let (handle, _api, _clock) = setup(api);

        let loading = {
            let handle = handle.clone();
            tokio::spawn(async move { handle.load(&CancelToken::new(), LoadPlan::default()).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.apply_scan(scan("A", "Asiago", 5.0));
        handle.apply(PushEvent::StationStatus(station("S1", "Online")));
        assert_eq!(handle.health().events_applied, 0);
        loading.await.unwrap();

        let views = handle.views();
        assert_eq!(views.summary.rows.len(), 1);
        assert_eq!(views.stations.rows[0].station_id, "S1");
        // 15:20 UTC is 10:20 local
        assert_eq!(views.hourly[10].total_cases, 1);
        assert_eq!(handle.health().events_applied, 2);
    }

    #[tokio::test]
    async fn test_live_updates_start_once_per_handle() {
        let (handle, _api, _clock) = setup(FakeApi::default());
        // nothing listens on port 1: the listener just keeps retrying
        let cfg = PushConf { host: "127.0.0.1".into(), port: 1, ..PushConf::default() };

        let live = handle.start_live_updates(cfg.clone(), None);
        assert!(live.is_some());
        assert!(handle.start_live_updates(cfg, Some("key".into())).is_none());
        if let Some(live) = live {
            live.stop();
        }
    }

    #[test]
    fn test_tab_parsing() {
        assert_eq!("Yesterday".parse::<Tab>(), Ok(Tab::Yesterday));
        assert_eq!("today".parse::<Tab>(), Ok(Tab::Today));
        assert!("tomorrow".parse::<Tab>().is_err());
    }
}
