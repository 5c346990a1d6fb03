// 3rd party crates
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid log level: {0}. Must be one of: error, warn, info, debug, trace")]
    InvalidLogLevel(String),
    #[error("Request timeout must be greater than 0")]
    InvalidTimeout,
    #[error("Unknown source '{0}'")]
    UnknownSource(String),
    #[error("No sources are enabled")]
    NoSourcesEnabled,
}
