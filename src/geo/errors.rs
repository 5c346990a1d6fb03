// Standard library
use std::path::PathBuf;

// 3rd party crates
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocateError {
    #[error("invalid ip address")]
    InvalidAddress,

    #[error("geo lookup failed: {0}")]
    Lookup(String),

    #[error("could not open geo database {path:?}: {reason}")]
    Open { path: PathBuf, reason: String },
}
