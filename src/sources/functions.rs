// Standard library
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

// 3rd party crates
use reqwest::Client;
use tracing::debug;

// Project imports
use crate::settings::types::SourceConfig;

// Current module imports
use super::constants::{IP_SERVICES, USER_AGENT};
use super::errors::SourceError;
use super::traits::IpSource;
use super::types::{HttpSource, IpFamily};

/// Builds the HTTP client shared by every source.
pub fn build_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(10))
        .build()
}

/// Creates the built-in sources, applying any per-source overrides.
pub fn default_sources(client: &Client, overrides: &[SourceConfig]) -> Vec<Arc<dyn IpSource>> {
    IP_SERVICES
        .iter()
        .filter_map(|service| {
            let source = HttpSource::new(service, client.clone());
            match overrides.iter().find(|o| o.name == service.name) {
                Some(o) if !o.enabled => {
                    debug!("Source {} is disabled", service.name);
                    None
                }
                Some(o) => Some(source.with_urls(o.v4_url.clone(), o.v6_url.clone())),
                None => Some(source),
            }
        })
        .map(|source| Arc::new(source) as Arc<dyn IpSource>)
        .collect()
}

/// Parses `text` as an address of the requested family.
pub fn validate_address(service: &str, text: &str, family: IpFamily) -> Result<IpAddr, SourceError> {
    let text = text.trim();
    let invalid = || SourceError::InvalidResponse {
        service: service.to_string(),
        response: text.to_string(),
    };

    if text.is_empty() {
        return Err(invalid());
    }
    let ip: IpAddr = text.parse::<IpAddr>().map_err(|_| invalid())?.to_canonical();

    let got = IpFamily::of(&ip);
    if got != family {
        return Err(SourceError::VersionMismatch {
            service: service.to_string(),
            expected: family,
            got,
        });
    }
    Ok(ip)
}
