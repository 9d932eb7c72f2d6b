use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{path} answered {status}")]
    Status { path: String, status: u16 },
    #[error("invalid body from {path}: {source}")]
    Body {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid API key header value")]
    ApiKey,
}

/// Outcome of a snapshot load that did not produce data.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The caller gave up before the load settled. Not a user-facing error.
    #[error("snapshot load cancelled")]
    Cancelled,
    #[error("snapshot load failed: {0}")]
    Failed(#[from] ApiError),
}

impl LoadError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, LoadError::Cancelled)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("utc_offset_hours {0} is out of range")]
    Offset(i8),
}

#[derive(Debug, Error)]
pub enum PushError {
    #[error("unknown notification topic {0}")]
    UnknownTopic(String),
    #[error("invalid {notification} payload: {source}")]
    Payload {
        notification: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
