// Standard library
use std::net::IpAddr;

// 3rd party crates
use async_trait::async_trait;
use reqwest::Client;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, trace};

// Current module imports
use super::errors::SourceError;
use super::functions::validate_address;
use super::traits::IpSource;
use super::types::{
    HttpSource, IpFamily, IpService, MyIpComResponse, MyIpIoResponse, QueryKind, QueryResult,
    ResponseFormat,
};

impl IpFamily {
    /// Family of an address, treating IPv4-mapped IPv6 addresses as IPv4.
    pub fn of(ip: &IpAddr) -> Self {
        match ip.to_canonical() {
            IpAddr::V4(_) => IpFamily::V4,
            IpAddr::V6(_) => IpFamily::V6,
        }
    }
}

impl QueryResult {
    pub fn ok(source: &str, address: impl Into<String>) -> Self {
        Self {
            source: source.to_string(),
            address: address.into(),
            kind: QueryKind::Ok,
        }
    }

    pub fn failed(source: &str, kind: QueryKind) -> Self {
        Self {
            source: source.to_string(),
            address: String::new(),
            kind,
        }
    }

    /// True when the result contributes an address to the run.
    pub fn is_usable(&self) -> bool {
        self.kind == QueryKind::Ok && !self.address.is_empty()
    }
}

impl HttpSource {
    pub fn new(service: &IpService, client: Client) -> Self {
        Self {
            name: service.name.to_string(),
            v4_url: service.v4_url.to_string(),
            v6_url: service.v6_url.map(str::to_string),
            format: service.format,
            client,
        }
    }

    /// Replaces the endpoints, keeping the provider's name and body format.
    pub fn with_urls(mut self, v4_url: Option<String>, v6_url: Option<String>) -> Self {
        if let Some(url) = v4_url {
            self.v4_url = url;
        }
        if let Some(url) = v6_url {
            self.v6_url = Some(url);
        }
        self
    }

    fn url(&self, family: IpFamily) -> Option<&str> {
        match family {
            IpFamily::V4 => Some(self.v4_url.as_str()),
            IpFamily::V6 => self.v6_url.as_deref(),
        }
    }

    async fn request(&self, family: IpFamily) -> Result<IpAddr, SourceError> {
        let url = self.url(family).ok_or_else(|| SourceError::Unsupported {
            service: self.name.clone(),
            family,
        })?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|error| SourceError::Network {
                service: self.name.clone(),
                error,
            })?;

        if !response.status().is_success() {
            return Err(SourceError::Status {
                service: self.name.clone(),
                status: response.status(),
            });
        }

        let body = response.text().await.map_err(|error| SourceError::Network {
            service: self.name.clone(),
            error,
        })?;

        let address = self.parse_body(&body, family)?;
        validate_address(&self.name, &address, family)
    }

    /// Extracts the address text from a response body.
    fn parse_body(&self, body: &str, family: IpFamily) -> Result<String, SourceError> {
        let invalid = || SourceError::InvalidResponse {
            service: self.name.clone(),
            response: body.trim().to_string(),
        };

        match self.format {
            ResponseFormat::PlainText => Ok(body.trim().to_string()),
            ResponseFormat::MyIpCom => {
                let result: MyIpComResponse = serde_json::from_str(body).map_err(|_| invalid())?;
                trace!(
                    "{} places {} in {} ({})",
                    self.name,
                    result.ip,
                    result.country,
                    result.iso_code
                );
                Ok(result.ip)
            }
            ResponseFormat::MyIpIo => {
                let result: MyIpIoResponse = serde_json::from_str(body).map_err(|_| invalid())?;
                if !result.success {
                    return Err(invalid());
                }
                let got = match result.kind.to_ascii_lowercase().as_str() {
                    "ipv4" => IpFamily::V4,
                    "ipv6" => IpFamily::V6,
                    _ => return Err(invalid()),
                };
                if got != family {
                    return Err(SourceError::VersionMismatch {
                        service: self.name.clone(),
                        expected: family,
                        got,
                    });
                }
                Ok(result.ip)
            }
        }
    }
}

#[async_trait]
impl IpSource for HttpSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, deadline: Instant, family: IpFamily) -> QueryResult {
        let outcome = match timeout_at(deadline, self.request(family)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(SourceError::Timeout {
                service: self.name.clone(),
            }),
        };

        match outcome {
            Ok(ip) => {
                debug!("{} answered {}", self.name, ip);
                QueryResult::ok(&self.name, ip.to_string())
            }
            Err(e) => {
                let kind = e.kind();
                if kind == QueryKind::Timeout {
                    info!("{}: timeout", self.name);
                } else {
                    debug!("{}", e);
                }
                QueryResult::failed(&self.name, kind)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source(server: &MockServer, format: ResponseFormat) -> HttpSource {
        let service = IpService {
            name: "mock",
            v4_url: "http://unused.invalid",
            v6_url: None,
            format,
        };
        HttpSource::new(&service, Client::new()).with_urls(
            Some(format!("{}/v4", server.uri())),
            Some(format!("{}/v6", server.uri())),
        )
    }

    fn deadline() -> Instant {
        Instant::now() + Duration::from_secs(5)
    }

    async fn respond(server: &MockServer, route: &str, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(template)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_plain_text_v4() {
        let server = MockServer::start().await;
        respond(&server, "/v4", ResponseTemplate::new(200).set_body_string("1.1.1.1\n")).await;

        let result = source(&server, ResponseFormat::PlainText)
            .fetch(deadline(), IpFamily::V4)
            .await;
        assert_eq!(result, QueryResult::ok("mock", "1.1.1.1"));
        assert!(result.is_usable());
    }

    #[tokio::test]
    async fn test_plain_text_not_an_ip() {
        let server = MockServer::start().await;
        respond(&server, "/v4", ResponseTemplate::new(200).set_body_string("<html>")).await;

        let result = source(&server, ResponseFormat::PlainText)
            .fetch(deadline(), IpFamily::V4)
            .await;
        assert_eq!(result.kind, QueryKind::InvalidResponse);
        assert!(result.address.is_empty());
    }

    #[tokio::test]
    async fn test_empty_body() {
        let server = MockServer::start().await;
        respond(&server, "/v4", ResponseTemplate::new(200)).await;

        let result = source(&server, ResponseFormat::PlainText)
            .fetch(deadline(), IpFamily::V4)
            .await;
        assert_eq!(result.kind, QueryKind::InvalidResponse);
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let server = MockServer::start().await;
        respond(&server, "/v4", ResponseTemplate::new(503).set_body_string("1.1.1.1")).await;

        let result = source(&server, ResponseFormat::PlainText)
            .fetch(deadline(), IpFamily::V4)
            .await;
        assert_eq!(result, QueryResult::failed("mock", QueryKind::NetworkError));
    }

    #[tokio::test]
    async fn test_v6_endpoint_returning_v4() {
        let server = MockServer::start().await;
        respond(&server, "/v6", ResponseTemplate::new(200).set_body_string("1.1.1.1")).await;

        let result = source(&server, ResponseFormat::PlainText)
            .fetch(deadline(), IpFamily::V6)
            .await;
        assert_eq!(result.kind, QueryKind::InvalidResponse);
    }

    #[tokio::test]
    async fn test_deadline_exceeded() {
        let server = MockServer::start().await;
        respond(
            &server,
            "/v4",
            ResponseTemplate::new(200)
                .set_body_string("1.1.1.1")
                .set_delay(Duration::from_secs(3)),
        )
        .await;

        let deadline = Instant::now() + Duration::from_millis(200);
        let result = source(&server, ResponseFormat::PlainText)
            .fetch(deadline, IpFamily::V4)
            .await;
        assert_eq!(result, QueryResult::failed("mock", QueryKind::Timeout));
    }

    #[tokio::test]
    async fn test_myipcom_json() {
        let server = MockServer::start().await;
        respond(
            &server,
            "/v6",
            ResponseTemplate::new(200)
                .set_body_string(r#"{"ip":"2606:4700:4700::1111","country":"Australia","cc":"AU"}"#),
        )
        .await;

        let result = source(&server, ResponseFormat::MyIpCom)
            .fetch(deadline(), IpFamily::V6)
            .await;
        assert_eq!(result, QueryResult::ok("mock", "2606:4700:4700::1111"));
    }

    #[tokio::test]
    async fn test_myipcom_malformed_json() {
        let server = MockServer::start().await;
        respond(&server, "/v4", ResponseTemplate::new(200).set_body_string(r#"{"ip":"#)).await;

        let result = source(&server, ResponseFormat::MyIpCom)
            .fetch(deadline(), IpFamily::V4)
            .await;
        assert_eq!(result.kind, QueryKind::InvalidResponse);
    }

    #[tokio::test]
    async fn test_myipio_json() {
        let server = MockServer::start().await;
        respond(
            &server,
            "/v4",
            ResponseTemplate::new(200)
                .set_body_string(r#"{"success":true,"ip":"100.100.0.1","type":"IPv4"}"#),
        )
        .await;

        let result = source(&server, ResponseFormat::MyIpIo)
            .fetch(deadline(), IpFamily::V4)
            .await;
        assert_eq!(result, QueryResult::ok("mock", "100.100.0.1"));
    }

    #[tokio::test]
    async fn test_myipio_unsuccessful() {
        let server = MockServer::start().await;
        respond(
            &server,
            "/v4",
            ResponseTemplate::new(200)
                .set_body_string(r#"{"success":false,"ip":"100.100.0.1","type":"IPv4"}"#),
        )
        .await;

        let result = source(&server, ResponseFormat::MyIpIo)
            .fetch(deadline(), IpFamily::V4)
            .await;
        assert_eq!(result.kind, QueryKind::InvalidResponse);
    }

    #[tokio::test]
    async fn test_myipio_type_mismatch() {
        let server = MockServer::start().await;
        respond(
            &server,
            "/v6",
            ResponseTemplate::new(200)
                .set_body_string(r#"{"success":true,"ip":"100.100.0.1","type":"IPv4"}"#),
        )
        .await;

        let result = source(&server, ResponseFormat::MyIpIo)
            .fetch(deadline(), IpFamily::V6)
            .await;
        assert_eq!(result.kind, QueryKind::InvalidResponse);
    }

    #[tokio::test]
    async fn test_missing_v6_endpoint() {
        let service = IpService {
            name: "v4-only",
            v4_url: "http://127.0.0.1:9",
            v6_url: None,
            format: ResponseFormat::PlainText,
        };
        let result = HttpSource::new(&service, Client::new())
            .fetch(deadline(), IpFamily::V6)
            .await;
        assert_eq!(result, QueryResult::failed("v4-only", QueryKind::Unsupported));
    }

    #[test]
    fn test_family_of_mapped_address() {
        let ip: IpAddr = "::ffff:1.2.3.4".parse().unwrap();
        assert_eq!(IpFamily::of(&ip), IpFamily::V4);
        let ip: IpAddr = "::1".parse().unwrap();
        assert_eq!(IpFamily::of(&ip), IpFamily::V6);
    }
}
