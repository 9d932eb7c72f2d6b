use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use time::UtcOffset;
use tokio::fs;
use tracing::{info, warn};

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DashboardConfig {
    pub api: ApiConf,
    pub push: PushConf,
    pub server: ServerConf,
    pub display: DisplayConf,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConf {
    pub base_url: String,     // ex: "https://localhost:7256"
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PushConf {
    pub host: String,
    pub port: u16,
    pub client_id: Option<String>,
    pub topic_prefix: String,
    pub keep_alive_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConf {
    pub listen: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DisplayConf {
    /// Offset used when the OS local offset cannot be read.
    pub utc_offset_hours: i8,
    /// Fetch yesterday with the snapshot instead of on first tab activation.
    pub preload_yesterday: bool,
    /// Redraw the text dashboard on stdout after every change.
    pub redraw: bool,
}

impl Default for ApiConf {
    fn default() -> Self {
        Self { base_url: "https://localhost:7256".into(), api_key: None, timeout_secs: 15 }
    }
}

impl Default for PushConf {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 1883,
            client_id: None,
            topic_prefix: "dashboardHub".into(),
            keep_alive_secs: 15,
        }
    }
}

impl Default for ServerConf {
    fn default() -> Self {
        Self { listen: "0.0.0.0:8080".into(), api_key: None }
    }
}

impl Default for DisplayConf {
    fn default() -> Self {
        Self { utc_offset_hours: 0, preload_yesterday: true, redraw: true }
    }
}

impl DisplayConf {
    pub fn fallback_offset(&self) -> Result<UtcOffset, ConfigError> {
        UtcOffset::from_hms(self.utc_offset_hours, 0, 0)
            .map_err(|_| ConfigError::Offset(self.utc_offset_hours))
    }
}

impl DashboardConfig {
    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("LINE_DASHBOARD_API_URL") {
            if !url.trim().is_empty() {
                self.api.base_url = url;
            }
        }
        if let Ok(key) = std::env::var("LINE_DASHBOARD_API_KEY") {
            if !key.trim().is_empty() {
                self.api.api_key = Some(key);
            }
        }
    }
}

pub fn parse_config(txt: &str, path: &str) -> Result<DashboardConfig, ConfigError> {
    if txt.trim().is_empty() {
        return Ok(DashboardConfig::default());
    }
    serde_yaml::from_str(txt).map_err(|source| ConfigError::Parse { path: path.to_string(), source })
}

pub async fn load_config() -> Result<DashboardConfig, ConfigError> {
    let path = std::env::var("LINE_DASHBOARD_CONFIG").unwrap_or_else(|_| "dashboard.yaml".into());
    let mut cfg = if Path::new(&path).exists() {
        let txt = fs::read_to_string(&path)
            .await
            .map_err(|source| ConfigError::Read { path: path.clone(), source })?;
        info!(%path, "loaded dashboard config");
        parse_config(&txt, &path)?
    } else {
        warn!(%path, "no config file, using defaults");
        DashboardConfig::default()
    };
    cfg.apply_env();
    cfg.display.fallback_offset()?;
    Ok(cfg)
}
