// 3rd party crates
use async_trait::async_trait;
use tokio::time::Instant;

// Current module imports
use super::types::{IpFamily, QueryResult};

/// A "what is my IP" provider.
///
/// Implementations perform at most one request per call and never fail:
/// every problem is folded into the returned [`QueryResult`]. A result of kind
/// `Ok` must carry an address that parses and belongs to `family`.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Short provider name used in logs and results.
    fn name(&self) -> &str;

    /// Queries the provider, giving up at `deadline`.
    async fn fetch(&self, deadline: Instant, family: IpFamily) -> QueryResult;
}
