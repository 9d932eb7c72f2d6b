/**
 * LINE DASHBOARD - entry point.
 *
 * Boot order: env + config, snapshot load, push subscription, terminal
 * redraw loop, then the HTTP view API until ctrl-c.
 */

use anyhow::Context;
use line_dashboard::api::HttpSummaryApi;
use line_dashboard::clock::SystemClock;
use line_dashboard::config::load_config;
use line_dashboard::dashboard::DashboardHandle;
use line_dashboard::http::{build_router, AppState};
use line_dashboard::loader::LoadPlan;
use line_dashboard::render::render_dashboard;
use line_dashboard::session::CancelToken;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("line_dashboard=info")))
        .init();

    let cfg = load_config().await.context("loading dashboard config")?;
    let clock = Arc::new(SystemClock::new(cfg.display.fallback_offset()?));
    let api = Arc::new(HttpSummaryApi::new(&cfg.api).context("building REST client")?);
    let dashboard = DashboardHandle::new(api, clock);
    let cancel = CancelToken::new();

    let plan = LoadPlan { preload_yesterday: cfg.display.preload_yesterday };
    let loader = {
        let dashboard = dashboard.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { dashboard.load(&cancel, plan).await })
    };

    let live = dashboard.start_live_updates(cfg.push.clone(), cfg.api.api_key.clone());

    if cfg.display.redraw {
        let dashboard = dashboard.clone();
        let mut changes = dashboard.subscribe_changes();
        tokio::spawn(async move {
            while changes.changed().await.is_ok() {
                let text = render_dashboard(&dashboard.views());
                // clear screen, cursor home
                print!("\x1b[2J\x1b[H{text}");
            }
        });
    }

    let app_state = AppState {
        dashboard,
        api_key: cfg.server.api_key.as_deref().map(Arc::from),
    };
    let app = build_router(app_state);

    let listener = TcpListener::bind(&cfg.server.listen)
        .await
        .with_context(|| format!("binding {}", cfg.server.listen))?;
    info!(addr = %cfg.server.listen, "view api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "ctrl-c handler failed");
            }
            info!("shutting down");
            cancel.cancel();
        })
        .await
        .context("serving view api")?;

    if let Some(live) = live {
        live.stop();
    }
    let _ = loader.await;
    Ok(())
}
