use async_trait::async_trait;
use reqwest::{Client, Url};
use std::{fmt::Debug, time::Duration};
use tracing::{debug, warn};

use crate::error::{FetchError, FetchOutcome};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// One GET, raw body back. Implementations must not retry or cache.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn get(&self, url: &Url) -> FetchOutcome<String>;
}

/// reqwest-backed transport shared by every client in the process.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    http: Client,
    timeout: Duration,
}

impl HttpGateway {
    pub fn new(timeout: Duration) -> Self {
        Self { http: Client::new(), timeout }
    }

    /// Like [`Transport::get`] but with an optional per-call timeout.
    pub async fn get_with_timeout(
        &self,
        url: &Url,
        timeout: Option<Duration>,
    ) -> FetchOutcome<String> {
        let timeout = timeout.unwrap_or(self.timeout);
        debug!(url = %redact(url), ?timeout, "GET");

        let res = self
            .http
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(transport_error)?;

        let status = res.status();
        let body = res.text().await.map_err(transport_error)?;

        if !status.is_success() {
            warn!(%status, url = %redact(url), "request failed");
            return Err(FetchError::Network(format!(
                "request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        if body.trim().is_empty() {
            warn!(url = %redact(url), "successful response without a body");
            return Err(FetchError::EmptyBody);
        }

        Ok(body)
    }
}

impl Default for HttpGateway {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl Transport for HttpGateway {
    async fn get(&self, url: &Url) -> FetchOutcome<String> {
        self.get_with_timeout(url, None).await
    }
}

fn transport_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::timeout();
    }
    // The URL carries the API key; keep it out of user-visible text.
    let err = err.without_url();
    if err.is_connect() {
        FetchError::Network(format!("connection failed: {err}"))
    } else {
        FetchError::Network(err.to_string())
    }
}

/// URL with the `key` query parameter masked, for logs.
pub(crate) fn redact(url: &Url) -> String {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "key" { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();

    let mut redacted = url.clone();
    if !pairs.is_empty() {
        redacted.query_pairs_mut().clear().extend_pairs(pairs);
    }
    redacted.to_string()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn url(server: &MockServer, p: &str) -> Url {
        Url::parse(&format!("{}{}", server.uri(), p)).unwrap()
    }

    #[tokio::test]
    async fn success_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
            .mount(&server)
            .await;

        let body = HttpGateway::default().get(&url(&server, "/ping")).await.unwrap();
        assert_eq!(body, "pong");
    }

    #[tokio::test]
    async fn non_success_status_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key invalid"))
            .expect(1)
            .mount(&server)
            .await;

        let err = HttpGateway::default().get(&url(&server, "/current.json")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NetworkError);
        let msg = err.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("API key invalid"));

        server.verify().await;
    }

    #[tokio::test]
    async fn server_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let err = HttpGateway::default().get(&url(&server, "/forecast.json")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NetworkError);
        assert!(err.to_string().contains("503"));

        server.verify().await;
    }

    #[tokio::test]
    async fn repeated_gets_each_hit_the_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
            .expect(2)
            .mount(&server)
            .await;

        let gateway = HttpGateway::default();
        assert_eq!(gateway.get(&url(&server, "/ping")).await.unwrap(), "pong");
        assert_eq!(gateway.get(&url(&server, "/ping")).await.unwrap(), "pong");

        server.verify().await;
    }

    #[tokio::test]
    async fn empty_body_is_not_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let err = HttpGateway::default().get(&url(&server, "/current.json")).await.unwrap_err();
        assert_eq!(err, FetchError::EmptyBody);
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let gateway = HttpGateway::new(Duration::from_millis(50));
        let err = gateway.get(&url(&server, "/slow")).await.unwrap_err();
        assert_eq!(err, FetchError::timeout());
    }

    #[tokio::test]
    async fn per_call_timeout_overrides_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&server)
            .await;

        let gateway = HttpGateway::new(Duration::from_millis(20));
        let body = gateway
            .get_with_timeout(&url(&server, "/slow"), Some(Duration::from_secs(5)))
            .await
            .unwrap();
        assert_eq!(body, "late");
    }

    #[tokio::test]
    async fn refused_connection_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("http://{addr}/current.json?key=secret")).unwrap();
        let err = HttpGateway::default().get(&url).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NetworkError);
        assert!(!err.to_string().contains("secret"));
    }

    #[tokio::test]
    async fn query_is_sent_as_given() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/current.json"))
            .and(query_param("q", "São Paulo, BR"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let url = Url::parse_with_params(
            &format!("{}/current.json", server.uri()),
            &[("q", "São Paulo, BR")],
        )
        .unwrap();
        assert_eq!(HttpGateway::default().get(&url).await.unwrap(), "{}");
    }

    #[test]
    fn redact_masks_api_key() {
        let url = Url::parse("http://example.com/current.json?q=Paris&key=secret").unwrap();
        let shown = redact(&url);
        assert!(shown.contains("q=Paris"));
        assert!(!shown.contains("secret"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "é".repeat(150);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);
    }
}
