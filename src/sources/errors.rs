// 3rd party crates
use thiserror::Error;

// Current module imports
use super::types::{IpFamily, QueryKind};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Network error from {service}: {error}")]
    Network {
        service: String,
        error: reqwest::Error,
    },

    #[error("Unusual response status from {service}: {status}")]
    Status {
        service: String,
        status: reqwest::StatusCode,
    },

    #[error("Request to {service} timed out")]
    Timeout { service: String },

    #[error("Invalid response from {service}: {response:?}")]
    InvalidResponse { service: String, response: String },

    #[error("IP version mismatch from {service}: expected {expected}, got {got}")]
    VersionMismatch {
        service: String,
        expected: IpFamily,
        got: IpFamily,
    },

    #[error("{service} has no {family} endpoint")]
    Unsupported { service: String, family: IpFamily },
}

impl SourceError {
    /// Maps the failure onto the outcome reported to the pinger.
    pub fn kind(&self) -> QueryKind {
        match self {
            SourceError::Network { error, .. } if error.is_timeout() => QueryKind::Timeout,
            SourceError::Network { .. } | SourceError::Status { .. } => QueryKind::NetworkError,
            SourceError::Timeout { .. } => QueryKind::Timeout,
            SourceError::InvalidResponse { .. } | SourceError::VersionMismatch { .. } => {
                QueryKind::InvalidResponse
            }
            SourceError::Unsupported { .. } => QueryKind::Unsupported,
        }
    }
}
