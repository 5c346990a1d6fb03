// Standard library
use std::fmt;

// 3rd party crates
use reqwest::Client;
use serde::Deserialize;

/// Address family requested for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpFamily {
    V4,
    V6,
}

impl fmt::Display for IpFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpFamily::V4 => write!(f, "IPv4"),
            IpFamily::V6 => write!(f, "IPv6"),
        }
    }
}

/// Classified outcome of a single source request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Ok,
    Timeout,
    NetworkError,
    InvalidResponse,
    /// The provider has no endpoint for the requested family.
    Unsupported,
    /// The request was stopped because the run already had its answer.
    Cancelled,
}

/// One outcome from one source, consumed exactly once by the pinger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    pub source: String,
    pub address: String,
    pub kind: QueryKind,
}

/// How a provider encodes the address in its response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// The body is the bare address.
    PlainText,
    /// `{"ip":"118.209.50.85","country":"Australia","cc":"AU"}`
    MyIpCom,
    /// `{"success":true,"ip":"100.100.0.0","type":"IPv4"}`
    MyIpIo,
}

/// Static description of an IP echo provider.
#[derive(Debug, Clone, Copy)]
pub struct IpService {
    pub name: &'static str,
    pub v4_url: &'static str,
    pub v6_url: Option<&'static str>,
    pub format: ResponseFormat,
}

/// Source adapter that queries one provider over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpSource {
    pub name: String,
    pub v4_url: String,
    pub v6_url: Option<String>,
    pub format: ResponseFormat,
    pub client: Client,
}

/// Response body of api.myip.com.
#[derive(Debug, Deserialize)]
pub struct MyIpComResponse {
    pub ip: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, rename = "cc")]
    pub iso_code: String,
}

/// Response body of my-ip.io.
#[derive(Debug, Deserialize)]
pub struct MyIpIoResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub ip: String,
    #[serde(default, rename = "type")]
    pub kind: String,
}
