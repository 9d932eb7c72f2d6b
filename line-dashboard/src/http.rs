/**
 * HTTP VIEW API - the derived dashboard views as JSON.
 *
 * - GET  /health            liveness, always open
 * - GET  /system/health     push-channel state and event counters
 * - GET  /views             every view at once
 * - GET  /views/summary     GTIN summary of the active tab
 * - GET  /views/hourly      24 hourly rows
 * - GET  /views/stations    station rows joined with diagnostics
 * - POST /tabs/{tab}        switch tab (yesterday is fetched once)
 *
 * Every route but /health requires x-api-key when server.api_key is set.
 */

use crate::dashboard::{DashboardHandle, Tab};
use crate::health::DashboardHealth;
use crate::views::{DashboardViews, HourlyRow, StationView, SummaryView};
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: DashboardHandle,
    pub api_key: Option<Arc<str>>,
}

/// `/health` is always open; everything else needs the configured key when
/// one is set.
pub fn api_key_allows(path: &str, provided: Option<&str>, expected: Option<&str>) -> bool {
    if path == "/health" {
        return true;
    }
    match expected.filter(|k| !k.is_empty()) {
        None => true,
        Some(expected) => provided == Some(expected),
    }
}

async fn require_api_key(State(app): State<AppState>, req: Request, next: Next) -> Result<Response, StatusCode> {
    let provided = req.headers().get("x-api-key").and_then(|v| v.to_str().ok());
    if !api_key_allows(req.uri().path(), provided, app.api_key.as_deref()) {
        warn!(path = %req.uri().path(), "rejected request without valid api key");
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(next.run(req).await)
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/system/health", get(get_system_health))
        .route("/views", get(get_views))
        .route("/views/summary", get(get_summary))
        .route("/views/hourly", get(get_hourly))
        .route("/views/stations", get(get_stations))
        .route("/tabs/{tab}", post(select_tab))
        .layer(middleware::from_fn_with_state(app_state.clone(), require_api_key))
        .with_state(app_state)
}

// GET /system/health
async fn get_system_health(State(app): State<AppState>) -> Json<DashboardHealth> {
    Json(app.dashboard.health())
}

// GET /views
async fn get_views(State(app): State<AppState>) -> Json<DashboardViews> {
    Json(app.dashboard.views())
}

// GET /views/summary
async fn get_summary(State(app): State<AppState>) -> Json<SummaryView> {
    Json(app.dashboard.views().summary)
}

// GET /views/hourly
async fn get_hourly(State(app): State<AppState>) -> Json<Vec<HourlyRow>> {
    Json(app.dashboard.views().hourly)
}

// GET /views/stations
async fn get_stations(State(app): State<AppState>) -> Json<StationView> {
    Json(app.dashboard.views().stations)
}

// POST /tabs/{tab}
async fn select_tab(State(app): State<AppState>, Path(tab): Path<String>) -> Result<Json<SummaryView>, StatusCode> {
    let tab: Tab = tab.parse().map_err(|_| StatusCode::NOT_FOUND)?;
    app.dashboard.select_tab(tab).await;
    Ok(Json(app.dashboard.views().summary))
}
