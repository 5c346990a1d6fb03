// 3rd party crates
use thiserror::Error;
use tokio::task::JoinError;

// Project imports
use crate::sources::IpFamily;

#[derive(Debug, Error)]
pub enum PingError {
    #[error("BUG: {source_name} reported {address:?} as a valid {family} address")]
    ContractViolation {
        source_name: String,
        address: String,
        family: IpFamily,
    },

    #[error("Source task failed: {0}")]
    Task(#[from] JoinError),

    #[error("Could not write to the output: {0}")]
    Output(#[from] std::io::Error),
}
