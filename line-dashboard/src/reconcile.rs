//! Live update reconciliation.
//!
//! Each fold takes the previous collection by value plus one event and
//! returns the next collection. None of them can fail: events without a
//! usable key are dropped and the input comes back untouched.

use crate::models::{
    DiagnosticsMap, GtinSummary, HourlyBucket, ScanEvent, StationDiagnostics, StationStatus,
    DESCRIPTION_PLACEHOLDER, ITEM_CODE_PLACEHOLDER,
};
use std::cmp::Ordering;
use tracing::debug;

/// Count one scan towards its GTIN and re-sort the collection by
/// description.
pub fn fold_scan_into_gtin_summary(mut summary: Vec<GtinSummary>, scan: &ScanEvent) -> Vec<GtinSummary> {
    let Some(gtin) = scan.key() else {
        debug!("scan without gtin dropped");
        return summary;
    };

    match summary.iter_mut().find(|s| s.gtin == gtin) {
        Some(entry) => {
            entry.total_cases += 1;
            entry.total_pounds += scan.pounds();
        }
        None => summary.push(GtinSummary {
            gtin: gtin.to_string(),
            item_code: non_blank(scan.item_code.as_deref()).unwrap_or(ITEM_CODE_PLACEHOLDER).to_string(),
            application_description: non_blank(scan.application_description.as_deref())
                .unwrap_or(DESCRIPTION_PLACEHOLDER)
                .to_string(),
            total_cases: 1,
            total_pounds: scan.pounds(),
        }),
    }

    sort_by_description(&mut summary);
    summary
}

/// Count one scan towards the local hour it arrived in.
///
/// `local_hour` is the viewer's wall-clock hour at arrival; any timestamp
/// carried by the scan is ignored.
pub fn fold_scan_into_hourly(mut hourly: Vec<HourlyBucket>, scan: &ScanEvent, local_hour: u8) -> Vec<HourlyBucket> {
    if scan.key().is_none() || local_hour > 23 {
        return hourly;
    }

    match hourly.iter_mut().find(|b| b.hour == local_hour) {
        Some(bucket) => {
            bucket.total_cases += 1;
            bucket.total_pounds += scan.pounds();
        }
        None => hourly.push(HourlyBucket { hour: local_hour, total_cases: 1, total_pounds: scan.pounds() }),
    }
    hourly
}

/// Replace (or add) the whole status record for a station.
pub fn upsert_station_status(mut stations: Vec<StationStatus>, status: StationStatus) -> Vec<StationStatus> {
    if status.station_id.trim().is_empty() {
        debug!("station status without stationId dropped");
        return stations;
    }

    match stations.iter_mut().find(|s| s.station_id == status.station_id) {
        Some(existing) => *existing = status,
        None => stations.push(status),
    }
    stations
}

/// Replace (or add) the diagnostics for a station. Stations with no status
/// entry yet are accepted.
pub fn upsert_station_diagnostics(
    mut diagnostics: DiagnosticsMap,
    station_id: &str,
    diag: StationDiagnostics,
) -> DiagnosticsMap {
    if station_id.trim().is_empty() {
        debug!("station diagnostics without stationId dropped");
        return diagnostics;
    }
    diagnostics.insert(station_id.to_string(), diag);
    diagnostics
}

pub fn sort_by_description(summary: &mut [GtinSummary]) {
    summary.sort_by(|a, b| compare_text(&a.application_description, &b.application_description));
}

/// Case-insensitive lexical order, case-sensitive on ties.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
