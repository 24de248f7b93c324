use crate::{
    client::{send_ping, Transport},
    config::{Config, Endpoints},
    errors::{NetworkError, PingError, ValidationError},
    types::{PingAllResult, PingResult, Service},
    validator::{normalize_sitemap_url, validate_sitemap_url},
};
use std::time::Duration;
use tracing::{info, instrument, warn};

#[derive(Debug)]
pub struct Pinger<T> {
    transport: T,
    endpoints: Endpoints,
    timeout: Duration,
}

impl<T: Transport> Pinger<T> {
    pub fn new(transport: T, config: Config) -> Self {
        Self {
            transport,
            endpoints: config.endpoints,
            timeout: config.timeout,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validate `sitemap_url` and submit it to one service. Nothing is sent
    /// when validation fails, and network failures are returned as-is.
    #[instrument(skip(self))]
    pub async fn ping_service(
        &self,
        service: Service,
        sitemap_url: &str,
    ) -> Result<PingResult, PingError> {
        validate_sitemap_url(sitemap_url)?;
        let sitemap_url = normalize_sitemap_url(sitemap_url);

        Ok(self.ping_validated(service, &sitemap_url).await?)
    }

    pub async fn ping_google(&self, sitemap_url: &str) -> Result<PingResult, PingError> {
        self.ping_service(Service::Google, sitemap_url).await
    }

    pub async fn ping_bing(&self, sitemap_url: &str) -> Result<PingResult, PingError> {
        self.ping_service(Service::Bing, sitemap_url).await
    }

    /// Ping Google and Bing at the same time and wait for both.
    ///
    /// Only a validation failure is returned as an error. A service that
    /// fails is reported as a failed [`PingResult`] without affecting the other.
    #[instrument(skip(self))]
    pub async fn ping_all(&self, sitemap_url: &str) -> Result<PingAllResult, ValidationError> {
        validate_sitemap_url(sitemap_url)?;
        let sitemap_url = normalize_sitemap_url(sitemap_url);

        let (google, bing) = tokio::join!(
            self.ping_validated(Service::Google, &sitemap_url),
            self.ping_validated(Service::Bing, &sitemap_url),
        );

        Ok(PingAllResult {
            google: settle(Service::Google, &sitemap_url, google),
            bing: settle(Service::Bing, &sitemap_url, bing),
        })
    }

    async fn ping_validated(
        &self,
        service: Service,
        sitemap_url: &str,
    ) -> Result<PingResult, NetworkError> {
        let endpoint = self.endpoints.get(service);
        let response = send_ping(&self.transport, endpoint, sitemap_url, self.timeout).await?;
        info!(%service, status = response.status_code, "ping accepted");
        Ok(PingResult::success(
            service,
            sitemap_url,
            response.status_code,
        ))
    }
}

fn settle(
    service: Service,
    sitemap_url: &str,
    outcome: Result<PingResult, NetworkError>,
) -> PingResult {
    outcome.unwrap_or_else(|err| {
        warn!(%service, ?err, "ping failed");
        PingResult::failure(service, sitemap_url, err.message())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::NetworkErrorKind,
        test_helper::{test_pinger, MockTransport, Reply, BING_ENDPOINT, GOOGLE_ENDPOINT},
    };

    const SITEMAP: &str = "https://example.com/sitemap.xml";

    #[tokio::test]
    async fn test_ping_google_success() {
        let pinger = test_pinger(MockTransport::new());

        let result = pinger
            .ping_service(Service::Google, SITEMAP)
            .await
            .unwrap();

        assert!(result.succeeded());
        assert_eq!(result.service(), Service::Google);
        assert_eq!(result.status_code(), Some(200));
        assert_eq!(result.error_message(), None);
        assert_eq!(result.submitted_url(), SITEMAP);

        let calls = pinger.transport().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].url,
            "https://google.test/ping?sitemap=https%3A%2F%2Fexample.com%2Fsitemap.xml"
        );
    }

    #[tokio::test]
    async fn test_ping_bing_uses_bing_endpoint() {
        let pinger = test_pinger(MockTransport::new());

        let result = pinger.ping_bing(SITEMAP).await.unwrap();

        assert_eq!(result.service(), Service::Bing);
        let calls = pinger.transport().calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].url.starts_with(BING_ENDPOINT));
    }

    #[tokio::test]
    async fn test_ping_service_normalizes_url() {
        let pinger = test_pinger(MockTransport::new());

        let result = pinger.ping_google("  https://example.com/sitemap.xml\n").await.unwrap();

        assert_eq!(result.submitted_url(), SITEMAP);
        assert!(pinger.transport().calls()[0].url.ends_with("sitemap.xml"));
    }

    #[tokio::test]
    async fn test_ping_service_rejects_localhost_without_request() {
        let pinger = test_pinger(MockTransport::new());

        let err = pinger
            .ping_service(Service::Google, "http://localhost/sitemap.xml")
            .await
            .unwrap_err();

        assert!(matches!(err, PingError::Validation(_)), "{err:?}");
        assert!(pinger.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn test_ping_service_propagates_network_error() {
        let pinger = test_pinger(
            MockTransport::new().reply(GOOGLE_ENDPOINT, Reply::Status(404)),
        );

        let err = pinger.ping_google(SITEMAP).await.unwrap_err();

        let PingError::Network(err) = err else {
            panic!("expected network error, got {err:?}");
        };
        assert_eq!(err.status_code(), Some(404));
        assert!(err.message().contains("Client error (404)"));
    }

    #[tokio::test]
    async fn test_ping_all_both_succeed() {
        let pinger = test_pinger(MockTransport::new());

        let result = pinger.ping_all(SITEMAP).await.unwrap();

        assert!(result.all_succeeded());
        assert_eq!(result.google.service(), Service::Google);
        assert_eq!(result.bing.service(), Service::Bing);
        assert_eq!(result.google.status_code(), Some(200));
        assert_eq!(result.bing.status_code(), Some(200));
        assert_eq!(pinger.transport().calls().len(), 2);
    }

    #[tokio::test]
    async fn test_ping_all_partial_failure() {
        let pinger = test_pinger(
            MockTransport::new()
                .reply(GOOGLE_ENDPOINT, Reply::Status(200))
                .reply(BING_ENDPOINT, Reply::Status(500)),
        );

        let result = pinger.ping_all(SITEMAP).await.unwrap();

        assert!(result.google.succeeded());
        assert!(!result.bing.succeeded());
        // failures folded by ping_all never carry a status code
        assert_eq!(result.bing.status_code(), None);
        assert!(result
            .bing
            .error_message()
            .is_some_and(|msg| msg.contains("Server error (500)")));
        assert!(!result.all_succeeded());
    }

    #[tokio::test]
    async fn test_ping_all_both_fail() {
        let pinger = test_pinger(
            MockTransport::new()
                .reply(GOOGLE_ENDPOINT, Reply::Fail(NetworkError::connection_refused()))
                .reply(
                    BING_ENDPOINT,
                    Reply::Fail(NetworkError::timeout(Duration::from_secs(30))),
                ),
        );

        let result = pinger.ping_all(SITEMAP).await.unwrap();

        assert!(!result.google.succeeded());
        assert!(!result.bing.succeeded());
        assert_eq!(
            result.google.error_message(),
            Some("Connection refused - server is not accepting connections")
        );
        assert_eq!(
            result.bing.error_message(),
            Some("Request timeout - server did not respond within 30 seconds")
        );
        assert_eq!(result.google.submitted_url(), SITEMAP);
        assert_eq!(result.bing.submitted_url(), SITEMAP);
    }

    #[tokio::test]
    async fn test_ping_all_empty_message_becomes_unknown_error() {
        let pinger = test_pinger(MockTransport::new().reply(
            BING_ENDPOINT,
            Reply::Fail(NetworkError::new(NetworkErrorKind::Other, "")),
        ));

        let result = pinger.ping_all(SITEMAP).await.unwrap();

        assert!(result.google.succeeded());
        assert_eq!(result.bing.error_message(), Some("Unknown error"));
    }

    #[tokio::test]
    async fn test_ping_all_rejects_invalid_url_before_any_request() {
        let pinger = test_pinger(MockTransport::new());

        for url in ["", "ftp://example.com/sitemap.xml", "http://192.168.0.10/sitemap.xml"] {
            assert!(pinger.ping_all(url).await.is_err(), "{url}");
        }
        assert!(pinger.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn test_ping_all_runs_concurrently() {
        let delay = Duration::from_millis(200);
        let pinger = test_pinger(MockTransport::new().with_delay(delay));

        let started = std::time::Instant::now();
        let result = pinger.ping_all(SITEMAP).await.unwrap();
        let elapsed = started.elapsed();

        assert!(result.all_succeeded());
        let calls = pinger.transport().calls();
        assert_eq!(calls.len(), 2);
        let gap = if calls[0].started > calls[1].started {
            calls[0].started - calls[1].started
        } else {
            calls[1].started - calls[0].started
        };
        assert!(gap < Duration::from_millis(50), "calls started {gap:?} apart");
        // serialised calls would take at least twice the delay
        assert!(elapsed < delay * 2, "ping_all took {elapsed:?}");
    }
}
