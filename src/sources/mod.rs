//! Source adapters
//!
//! Each adapter asks one "what is my IP" provider for the host's public
//! address. Adapters are stateless and never fail outright: transport errors,
//! timeouts and malformed answers are classified into a [`QueryKind`] and
//! returned inside a [`QueryResult`], so a broken provider only means "no
//! contribution" for the run.

pub mod constants;
pub mod errors;
pub mod functions;
pub mod impls;
pub mod traits;
pub mod types;

pub use functions::{build_client, default_sources};
pub use traits::IpSource;
pub use types::{IpFamily, QueryKind, QueryResult};
