//! Wire records shared by the REST snapshot and the push channel.
//!
//! Every record uses the backend's camelCase field names. Descriptive fields
//! that the backend may leave null are filled with display placeholders at
//! the edge so the rest of the crate never deals with `Option` for them.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use time::OffsetDateTime;

pub const ITEM_CODE_PLACEHOLDER: &str = "N/A";
pub const DESCRIPTION_PLACEHOLDER: &str = "Unknown Item";

/// Daily production totals for one GTIN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GtinSummary {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub gtin: String,
    #[serde(default = "item_code_placeholder", deserialize_with = "item_code_or_placeholder")]
    pub item_code: String,
    #[serde(default = "description_placeholder", deserialize_with = "description_or_placeholder")]
    pub application_description: String,
    #[serde(default)]
    pub total_cases: u32,
    #[serde(default)]
    pub total_pounds: f64,
}

/// Production totals for one local hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyBucket {
    pub hour: u8,
    pub total_cases: u32,
    pub total_pounds: f64,
}

/// Hourly row as served by `hourly-rate`; `hour` is a UTC hour.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyRate {
    pub hour: i64,
    #[serde(default)]
    pub total_cases: u32,
    #[serde(default)]
    pub total_pounds: f64,
}

/// One production scan as pushed by `ReceiveScanUpdate`.
///
/// The backend sends more fields (station, serial, timestamps); only the
/// ones reconciliation needs are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanEvent {
    #[serde(default)]
    pub gtin: Option<String>,
    #[serde(default)]
    pub item_code: Option<String>,
    #[serde(default)]
    pub application_description: Option<String>,
    #[serde(default)]
    pub total_pounds: f64,
}

impl ScanEvent {
    /// GTIN this scan counts towards, if it carries a usable one.
    pub fn key(&self) -> Option<&str> {
        self.gtin.as_deref().map(str::trim).filter(|g| !g.is_empty())
    }

    /// Weight added by this scan. Garbage weights count as zero so totals
    /// never decrease.
    pub fn pounds(&self) -> f64 {
        if self.total_pounds.is_finite() && self.total_pounds > 0.0 {
            self.total_pounds
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationStatus {
    pub station_id: String,
    #[serde(default)]
    pub current_status: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default, with = "timestamp")]
    pub last_seen: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDiagnostics {
    #[serde(default)]
    pub uptime_seconds: u64,
    #[serde(default)]
    pub cpu_usage_percent: f64,
    #[serde(default, rename = "memoryUsageMB")]
    pub memory_usage_mb: f64,
    #[serde(default)]
    pub scans_since_boot: u64,
}

/// Diagnostics notification: the station key travels next to the metrics.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDiagnosticsUpdate {
    pub station_id: String,
    #[serde(flatten)]
    pub diagnostics: StationDiagnostics,
}

pub type DiagnosticsMap = HashMap<String, StationDiagnostics>;

fn item_code_placeholder() -> String {
    ITEM_CODE_PLACEHOLDER.to_string()
}

fn description_placeholder() -> String {
    DESCRIPTION_PLACEHOLDER.to_string()
}

fn or_placeholder<'de, D>(deserializer: D, placeholder: &str) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| placeholder.to_string()))
}

fn item_code_or_placeholder<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    or_placeholder(d, ITEM_CODE_PLACEHOLDER)
}

fn description_or_placeholder<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    or_placeholder(d, DESCRIPTION_PLACEHOLDER)
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

/// Lenient `lastSeen` handling: RFC 3339 first, then an offset-less ISO
/// timestamp read as UTC. Anything else is treated as "never seen".
mod timestamp {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::format_description::well_known::{Iso8601, Rfc3339};
    use time::{OffsetDateTime, PrimitiveDateTime};

    pub fn serialize<S: Serializer>(value: &Option<OffsetDateTime>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => {
                let txt = ts.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
                s.serialize_some(&txt)
            }
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<OffsetDateTime>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(raw.as_deref().and_then(parse))
    }

    pub fn parse(raw: &str) -> Option<OffsetDateTime> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        OffsetDateTime::parse(raw, &Rfc3339)
            .ok()
            .or_else(|| PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT).ok().map(|dt| dt.assume_utc()))
    }
}
