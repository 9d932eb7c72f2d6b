//! Presentation views, derived from state on every render.
//!
//! Nothing here owns domain data; the same input always yields the same
//! rows, whatever order the collections arrived in.

use crate::dashboard::{LoadStatus, Tab};
use crate::models::{DiagnosticsMap, GtinSummary, HourlyBucket, StationStatus};
use crate::reconcile::{compare_text, sort_by_description};
use serde::Serialize;
use std::collections::BTreeSet;
use time::OffsetDateTime;

pub const NO_PRODUCTION: &str = "No production data for this day.";
pub const NO_STATIONS: &str = "No stations are currently being monitored.";
const UNKNOWN_STATUS: &str = "Unknown";
const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Serialize)]
pub struct DashboardViews {
    pub status: LoadStatus,
    pub active_tab: Tab,
    pub summary: SummaryView,
    pub hourly: Vec<HourlyRow>,
    pub stations: StationView,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryView {
    pub tab: Tab,
    pub rows: Vec<SummaryRow>,
    pub placeholder: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub gtin: String,
    pub item_code: String,
    pub description: String,
    pub total_cases: u32,
    pub total_pounds: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyRow {
    pub hour: u8,
    pub label: String,
    pub total_cases: u32,
    pub total_pounds: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StationView {
    pub rows: Vec<StationRow>,
    pub placeholder: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StationRow {
    pub station_id: String,
    pub status: String,
    /// Lowercased status for badge styling, `unknown` when absent.
    pub status_class: String,
    pub ip_address: String,
    pub last_seen: String,
    pub uptime: String,
    pub cpu_usage: String,
    pub memory_usage: String,
    pub scans_since_boot: String,
}

pub fn summary_view(tab: Tab, summary: &[GtinSummary]) -> SummaryView {
    let mut sorted = summary.to_vec();
    sort_by_description(&mut sorted);

    let rows: Vec<SummaryRow> = sorted
        .into_iter()
        .map(|s| SummaryRow {
            gtin: s.gtin,
            item_code: s.item_code,
            description: s.application_description,
            total_cases: s.total_cases,
            total_pounds: format!("{:.2}", s.total_pounds),
        })
        .collect();

    let placeholder = rows.is_empty().then_some(NO_PRODUCTION);
    SummaryView { tab, rows, placeholder }
}

/// Always 24 rows, 0..=23, zero-filled. Duplicate hours are summed.
pub fn hourly_view(buckets: &[HourlyBucket]) -> Vec<HourlyRow> {
    let mut hours = [(0u32, 0f64); 24];
    for bucket in buckets.iter().filter(|b| b.hour < 24) {
        let slot = &mut hours[usize::from(bucket.hour)];
        slot.0 += bucket.total_cases;
        slot.1 += bucket.total_pounds;
    }

    (0u8..24)
        .zip(hours)
        .map(|(hour, (total_cases, total_pounds))| HourlyRow {
            hour,
            label: hour_label(hour),
            total_cases,
            total_pounds,
        })
        .collect()
}

/// 12-hour clock label: `12 AM`, `1 AM`, … `12 PM`, … `11 PM`.
pub fn hour_label(hour: u8) -> String {
    match hour {
        0 => "12 AM".to_string(),
        12 => "12 PM".to_string(),
        h if h < 12 => format!("{h} AM"),
        h => format!("{} PM", h - 12),
    }
}

/// Stations joined with their diagnostics, sorted by id. A station known
/// from only one side still gets a row.
pub fn station_view(stations: &[StationStatus], diagnostics: &DiagnosticsMap, now: OffsetDateTime) -> StationView {
    let ids: BTreeSet<&str> = stations
        .iter()
        .map(|s| s.station_id.as_str())
        .chain(diagnostics.keys().map(String::as_str))
        .collect();

    let mut rows: Vec<StationRow> = ids
        .into_iter()
        .map(|id| {
            let status = stations.iter().find(|s| s.station_id == id);
            let diag = diagnostics.get(id);
            let current = status.and_then(|s| s.current_status.as_deref()).filter(|s| !s.is_empty());

            StationRow {
                station_id: id.to_string(),
                status: current.unwrap_or(UNKNOWN_STATUS).to_string(),
                status_class: current.map(str::to_lowercase).unwrap_or_else(|| "unknown".into()),
                ip_address: status
                    .and_then(|s| s.ip_address.as_deref())
                    .filter(|ip| !ip.is_empty())
                    .unwrap_or(NOT_AVAILABLE)
                    .to_string(),
                last_seen: format_time_ago(status.and_then(|s| s.last_seen), now),
                uptime: diag.map_or_else(na, |d| format_uptime(d.uptime_seconds)),
                cpu_usage: diag.map_or_else(na, |d| format!("{:.1}%", d.cpu_usage_percent)),
                memory_usage: diag.map_or_else(na, |d| format!("{:.0} MB", d.memory_usage_mb)),
                scans_since_boot: diag.map_or_else(na, |d| d.scans_since_boot.to_string()),
            }
        })
        .collect();

    rows.sort_by(|a, b| compare_text(&a.station_id, &b.station_id));
    let placeholder = rows.is_empty().then_some(NO_STATIONS);
    StationView { rows, placeholder }
}

fn na() -> String {
    NOT_AVAILABLE.to_string()
}

/// Coarse relative time: `never`, `just now`, `42s ago`, `5m ago`, `3h ago`, `2d ago`.
pub fn format_time_ago(last_seen: Option<OffsetDateTime>, now: OffsetDateTime) -> String {
    let Some(last_seen) = last_seen else {
        return "never".to_string();
    };

    let seconds = (now - last_seen).whole_seconds();
    if seconds < 5 {
        return "just now".to_string();
    }
    if seconds < 60 {
        return format!("{seconds}s ago");
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    format!("{}d ago", hours / 24)
}

pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;
    match (days, hours) {
        (0, 0) => format!("{minutes}m"),
        (0, _) => format!("{hours}h {minutes}m"),
        _ => format!("{days}d {hours}h {minutes}m"),
    }
}
