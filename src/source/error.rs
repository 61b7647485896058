use thiserror::Error;

/// Why a fetch produced no batch.
///
/// The `Display` output is what the status bar shows, so keep messages short.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("upstream returned HTTP {status}")]
    Status { status: u16 },

    #[error("could not parse response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return FetchError::Timeout;
        }
        if let Some(status) = err.status() {
            return FetchError::Status {
                status: status.as_u16(),
            };
        }
        FetchError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}
