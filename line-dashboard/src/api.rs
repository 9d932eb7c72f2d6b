/**
 * REST client for the production API.
 *
 * Three read-only endpoints, all under /api/dashboard, all guarded by the
 * X-Api-Key header. The trait is the seam the loader and the dashboard
 * depend on; tests plug in in-memory fakes.
 */

use crate::config::ApiConf;
use crate::error::ApiError;
use crate::models::{GtinSummary, HourlyRate, StationStatus};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

#[async_trait]
pub trait SummaryApi: Send + Sync {
    /// GTIN totals for a `yyMMdd` production date.
    async fn summary_by_gtin(&self, production_date: &str) -> Result<Vec<GtinSummary>, ApiError>;

    /// Hourly totals for a `yyMMdd` production date, hours in UTC.
    async fn hourly_rate(&self, production_date: &str) -> Result<Vec<HourlyRate>, ApiError>;

    async fn station_statuses(&self) -> Result<Vec<StationStatus>, ApiError>;
}

pub struct HttpSummaryApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSummaryApi {
    pub fn new(cfg: &ApiConf) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &cfg.api_key {
            let value = HeaderValue::from_str(key).map_err(|_| ApiError::ApiKey)?;
            headers.insert("X-Api-Key", value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(cfg.timeout_secs.max(1)))
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self { client, base_url: cfg.base_url.trim_end_matches('/').to_string() })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: String) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| ApiError::Transport { path: path.clone(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { path, status: status.as_u16() });
        }

        response.json::<T>().await.map_err(|source| ApiError::Body { path, source })
    }
}

#[async_trait]
impl SummaryApi for HttpSummaryApi {
    async fn summary_by_gtin(&self, production_date: &str) -> Result<Vec<GtinSummary>, ApiError> {
        self.get_json(format!("/api/dashboard/summary-by-gtin/{production_date}")).await
    }

    async fn hourly_rate(&self, production_date: &str) -> Result<Vec<HourlyRate>, ApiError> {
        self.get_json(format!("/api/dashboard/hourly-rate/{production_date}")).await
    }

    async fn station_statuses(&self) -> Result<Vec<StationStatus>, ApiError> {
        self.get_json("/api/dashboard/station-statuses".to_string()).await
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory API with per-endpoint call counters.

    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    pub struct FakeApi {
        pub summaries: Mutex<HashMap<String, Vec<GtinSummary>>>,
        pub hourly: Mutex<Vec<HourlyRate>>,
        pub stations: Mutex<Vec<StationStatus>>,
        pub fail_summary_for: Mutex<Option<String>>,
        pub delay: Mutex<Option<Duration>>,
        pub summary_calls: Mutex<Vec<String>>,
        pub hourly_calls: AtomicUsize,
        pub station_calls: AtomicUsize,
    }

    impl FakeApi {
        pub fn with_summary(self, date: &str, rows: Vec<GtinSummary>) -> Self {
            self.summaries.lock().insert(date.to_string(), rows);
            self
        }

        pub fn summary_calls_for(&self, date: &str) -> usize {
            self.summary_calls.lock().iter().filter(|d| d.as_str() == date).count()
        }

        async fn pause(&self) {
            let delay = *self.delay.lock();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
        }
    }

    #[async_trait]
    impl SummaryApi for FakeApi {
        async fn summary_by_gtin(&self, production_date: &str) -> Result<Vec<GtinSummary>, ApiError> {
            self.summary_calls.lock().push(production_date.to_string());
            self.pause().await;
            if self.fail_summary_for.lock().as_deref() == Some(production_date) {
                return Err(ApiError::Status {
                    path: format!("/api/dashboard/summary-by-gtin/{production_date}"),
                    status: 500,
                });
            }
            Ok(self.summaries.lock().get(production_date).cloned().unwrap_or_default())
        }

        async fn hourly_rate(&self, _production_date: &str) -> Result<Vec<HourlyRate>, ApiError> {
            self.hourly_calls.fetch_add(1, Ordering::SeqCst);
            self.pause().await;
            Ok(self.hourly.lock().clone())
        }

        async fn station_statuses(&self) -> Result<Vec<StationStatus>, ApiError> {
            self.station_calls.fetch_add(1, Ordering::SeqCst);
            self.pause().await;
            Ok(self.stations.lock().clone())
        }
    }
}
