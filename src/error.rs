use thiserror::Error;

/// Errors surfaced by the library half of flowtimer.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("unsupported session length: {0} minutes (expected one of 5, 10, 15, 30, 60, 90, 120)")]
    UnsupportedDuration(u32),

    #[error("invalid session length {0:?}: expected minutes, e.g. 30 or 30min")]
    InvalidDuration(String),

    #[error("chime failed: {0}")]
    Chime(#[source] std::io::Error),

    #[error("config io error at {path}: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("log file unavailable at {path}: {source}")]
    Log {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config could not be encoded: {0}")]
    ConfigEncode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FlowError>;
