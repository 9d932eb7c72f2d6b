//! Snapshot loader: the initial, all-or-nothing fetch.

use crate::api::SummaryApi;
use crate::clock::Clock;
use crate::error::{ApiError, LoadError};
use crate::models::{GtinSummary, HourlyBucket, HourlyRate, StationStatus};
use crate::production_date::{production_date, today_and_yesterday, utc_hour_to_local};
use crate::session::CancelToken;
use time::Date;
use tracing::{info, warn};

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub production_date: String,
    pub todays_summary: Vec<GtinSummary>,
    /// `None` when yesterday is left to the on-demand tab fetch.
    pub yesterdays_summary: Option<Vec<GtinSummary>>,
    pub hourly: Vec<HourlyBucket>,
    pub stations: Vec<StationStatus>,
}

#[derive(Debug, Clone, Copy)]
pub struct LoadPlan {
    pub preload_yesterday: bool,
}

impl Default for LoadPlan {
    fn default() -> Self {
        Self { preload_yesterday: true }
    }
}

/// Fetch today's GTIN summary, yesterday's (per `plan`), today's hourly
/// rate and the station statuses concurrently.
///
/// Any failing request fails the whole load. If `cancel` fires first the
/// result is [`LoadError::Cancelled`], never `Failed`.
pub async fn load_snapshot(
    api: &dyn SummaryApi,
    clock: &dyn Clock,
    cancel: &CancelToken,
    plan: LoadPlan,
) -> Result<Snapshot, LoadError> {
    let (today, yesterday) = today_and_yesterday(clock);
    let today_key = production_date(today);
    let yesterday_key = production_date(yesterday);

    let fetch = async {
        tokio::try_join!(
            api.summary_by_gtin(&today_key),
            async {
                if plan.preload_yesterday {
                    api.summary_by_gtin(&yesterday_key).await.map(Some)
                } else {
                    Ok(None)
                }
            },
            api.hourly_rate(&today_key),
            api.station_statuses(),
        )
    };

    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(LoadError::Cancelled),
        result = fetch => result,
    };

    let (todays_summary, yesterdays_summary, rates, stations) = match result {
        Ok(parts) => parts,
        // a request torn down by cancellation is not a genuine failure
        Err(_) if cancel.is_cancelled() => return Err(LoadError::Cancelled),
        Err(e) => return Err(LoadError::Failed(e)),
    };

    let reference = clock.now_utc().date();
    let hourly = normalize_hourly(&rates, reference, clock);

    info!(
        date = %today_key,
        gtins = todays_summary.len(),
        hours = hourly.len(),
        stations = stations.len(),
        "snapshot loaded"
    );

    Ok(Snapshot { production_date: today_key, todays_summary, yesterdays_summary, hourly, stations })
}

/// Secondary fetch behind the "yesterday" tab.
pub async fn load_yesterday(api: &dyn SummaryApi, clock: &dyn Clock) -> Result<Vec<GtinSummary>, ApiError> {
    let (_, yesterday) = today_and_yesterday(clock);
    api.summary_by_gtin(&production_date(yesterday)).await
}

/// Convert UTC-hour rows into local-hour buckets, once, at load time.
/// Rows that map onto the same local hour are merged; out-of-range hours
/// are dropped.
pub fn normalize_hourly(rates: &[HourlyRate], reference: Date, clock: &dyn Clock) -> Vec<HourlyBucket> {
    let mut buckets: Vec<HourlyBucket> = Vec::with_capacity(rates.len().min(24));

    for rate in rates {
        let Ok(utc_hour) = u8::try_from(rate.hour) else {
            warn!(hour = rate.hour, "hourly row with invalid hour dropped");
            continue;
        };
        if utc_hour > 23 {
            warn!(hour = rate.hour, "hourly row with invalid hour dropped");
            continue;
        }

        let hour = utc_hour_to_local(reference, utc_hour, clock);
        match buckets.iter_mut().find(|b| b.hour == hour) {
            Some(bucket) => {
                bucket.total_cases += rate.total_cases;
                bucket.total_pounds += rate.total_pounds;
            }
            None => buckets.push(HourlyBucket { hour, total_cases: rate.total_cases, total_pounds: rate.total_pounds }),
        }
    }

    buckets.sort_by_key(|b| b.hour);
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::clock::FixedClock;
    use std::sync::atomic::Ordering;
    use std::time::Duration;
    use time::macros::{date, datetime, offset};

    fn row(gtin: &str, description: &str, cases: u32) -> GtinSummary {
        GtinSummary {
            gtin: gtin.into(),
            item_code: "IC".into(),
            application_description: description.into(),
            total_cases: cases,
            total_pounds: f64::from(cases) * 10.0,
        }
    }

    fn clock() -> FixedClock {
        FixedClock::new(datetime!(2024-03-05 15:00 UTC), offset!(-5))
    }

    #[tokio::test]
    async fn test_snapshot_uses_local_dates_and_converts_hours() {
        let api = FakeApi::default()
            .with_summary("240305", vec![row("1", "Mozzarella", 3)])
            .with_summary("240304", vec![row("2", "Ricotta", 9)]);
        *api.hourly.lock() = vec![
            HourlyRate { hour: 14, total_cases: 2, total_pounds: 20.0 },
            HourlyRate { hour: 13, total_cases: 1, total_pounds: 5.0 },
        ];

        let snapshot = load_snapshot(&api, &clock(), &CancelToken::new(), LoadPlan::default()).await.unwrap();

        assert_eq!(snapshot.production_date, "240305");
        assert_eq!(snapshot.todays_summary[0].gtin, "1");
        assert_eq!(snapshot.yesterdays_summary.unwrap()[0].gtin, "2");
        assert_eq!(
            snapshot.hourly,
            vec![
                HourlyBucket { hour: 8, total_cases: 1, total_pounds: 5.0 },
                HourlyBucket { hour: 9, total_cases: 2, total_pounds: 20.0 },
            ]
        );
        assert_eq!(api.hourly_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.station_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_lazy_plan_skips_yesterday() {
        let api = FakeApi::default();
        let plan = LoadPlan { preload_yesterday: false };
        let snapshot = load_snapshot(&api, &clock(), &CancelToken::new(), plan).await.unwrap();
        assert!(snapshot.yesterdays_summary.is_none());
        assert_eq!(api.summary_calls_for("240304"), 0);
        assert_eq!(api.summary_calls_for("240305"), 1);
    }

    #[tokio::test]
    async fn test_any_failure_fails_the_load() {
        let api = FakeApi::default().with_summary("240305", vec![row("1", "Mozzarella", 3)]);
        *api.fail_summary_for.lock() = Some("240304".into());

        let err = load_snapshot(&api, &clock(), &CancelToken::new(), LoadPlan::default()).await.unwrap_err();
        assert!(matches!(err, LoadError::Failed(ApiError::Status { status: 500, .. })));
        assert!(!err.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancel_is_not_a_failure() {
        let api = FakeApi::default();
        *api.delay.lock() = Some(Duration::from_secs(30));
        let cancel = CancelToken::new();

        let canceller = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                cancel.cancel();
            })
        };

        let err = load_snapshot(&api, &clock(), &cancel, LoadPlan::default()).await.unwrap_err();
        canceller.await.unwrap();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_error_after_cancel_reported_as_cancelled() {
        let api = FakeApi::default();
        *api.fail_summary_for.lock() = Some("240305".into());
        let cancel = CancelToken::new();
        cancel.cancel();

        let err = load_snapshot(&api, &clock(), &cancel, LoadPlan::default()).await.unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_load_yesterday_uses_previous_local_day() {
        let api = FakeApi::default().with_summary("240304", vec![row("2", "Ricotta", 9)]);
        let rows = load_yesterday(&api, &clock()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(api.summary_calls_for("240304"), 1);
    }

    #[test]
    fn test_normalize_merges_and_drops_bad_hours() {
        let clock = FixedClock::new(datetime!(2024-03-05 12:00 UTC), offset!(UTC));
        let rates = vec![
            HourlyRate { hour: 5, total_cases: 1, total_pounds: 1.0 },
            HourlyRate { hour: 5, total_cases: 2, total_pounds: 2.0 },
            HourlyRate { hour: 24, total_cases: 9, total_pounds: 9.0 },
            HourlyRate { hour: -1, total_cases: 9, total_pounds: 9.0 },
        ];
        let buckets = normalize_hourly(&rates, date!(2024-03-05), &clock);
        assert_eq!(buckets, vec![HourlyBucket { hour: 5, total_cases: 3, total_pounds: 3.0 }]);
    }
}
