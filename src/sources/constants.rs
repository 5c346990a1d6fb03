// Project imports
use super::types::{IpService, ResponseFormat};

/// Built-in providers, queried concurrently on every run.
pub const IP_SERVICES: [IpService; 4] = [
    // https://www.ipify.org
    IpService {
        name: "ipify.org",
        v4_url: "https://api.ipify.org",
        v6_url: Some("https://api6.ipify.org"),
        format: ResponseFormat::PlainText,
    },
    // https://www.myip.com, a single endpoint answering with either family
    IpService {
        name: "myip.com",
        v4_url: "https://api.myip.com",
        v6_url: Some("https://api.myip.com"),
        format: ResponseFormat::MyIpCom,
    },
    // https://www.my-ip.io
    IpService {
        name: "my-ip.io",
        v4_url: "https://api4.my-ip.io/ip.json",
        v6_url: Some("https://api6.my-ip.io/ip.json"),
        format: ResponseFormat::MyIpIo,
    },
    // https://seeip.org
    IpService {
        name: "seeip.org",
        v4_url: "https://ip4.seeip.org",
        v6_url: Some("https://ip6.seeip.org"),
        format: ResponseFormat::PlainText,
    },
];

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
