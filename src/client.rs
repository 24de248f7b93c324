use crate::{
    errors::{NetworkError, NetworkErrorKind},
    http::build_client,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest_middleware::ClientWithMiddleware;
use std::{
    convert::identity,
    error::Error as StdError,
    fmt::Write as _,
    future::Future,
    io,
    time::Duration,
};
use tracing::{debug, instrument, warn};
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Characters left as-is by JavaScript's `encodeURIComponent`, which is what
/// search engines expect in the `sitemap` parameter.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status_code: u16,
    pub body: String,
}

/// A single outbound GET.
pub trait Transport {
    fn fetch(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<HttpResponse, NetworkError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: ClientWithMiddleware,
}

impl HttpTransport {
    pub fn new() -> reqwest::Result<Self> {
        Ok(Self::with_client(build_client(identity)?))
    }

    pub fn with_client(client: ClientWithMiddleware) -> Self {
        Self { client }
    }

    async fn get(&self, url: &str) -> Result<HttpResponse, reqwest_middleware::Error> {
        let response = self.client.get(url).send().await?;
        let status_code = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status_code, body })
    }
}

impl Transport for HttpTransport {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<HttpResponse, NetworkError> {
        // dropping the request future on expiry aborts the connection
        match tokio::time::timeout(timeout, self.get(url)).await {
            Ok(Ok(response)) => {
                debug!(status = response.status_code, "received response");
                Ok(response)
            }
            Ok(Err(err)) => {
                let err = classify_error(url, &err);
                warn!(?err, "request failed");
                Err(err)
            }
            Err(_elapsed) => {
                warn!(?timeout, "request timed out");
                Err(NetworkError::timeout(timeout))
            }
        }
    }
}

fn classify_error(request_url: &str, err: &reqwest_middleware::Error) -> NetworkError {
    let reqwest_err = match err {
        reqwest_middleware::Error::Reqwest(err) => err,
        reqwest_middleware::Error::Middleware(err) => {
            return NetworkError::other(format!("{err:#}"))
        }
    };

    if reqwest_err.is_timeout() {
        // only reachable when a lower layer times out before our own timer
        return NetworkError::new(
            NetworkErrorKind::Timeout,
            "Request timeout - server did not respond in time",
        );
    }

    let mut source: Option<&(dyn StdError + 'static)> = Some(reqwest_err);
    while let Some(err) = source {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::ConnectionRefused {
                return NetworkError::connection_refused();
            }
        }
        if err.to_string().contains("dns error") {
            let host = Url::parse(request_url)
                .ok()
                .and_then(|url| url.host_str().map(str::to_owned))
                .unwrap_or_else(|| request_url.to_owned());
            return NetworkError::dns(&host);
        }
        source = err.source();
    }

    NetworkError::other(report(reqwest_err))
}

fn report(mut err: &(dyn StdError + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let _ = write!(s, ": {}", src);
        err = src;
    }
    s
}

/// Build `<endpoint>?sitemap=<encoded sitemap url>`.
pub fn ping_url(endpoint: &str, sitemap_url: &str) -> String {
    let separator = if endpoint.contains('?') { '&' } else { '?' };
    format!(
        "{endpoint}{separator}sitemap={}",
        utf8_percent_encode(sitemap_url, URI_COMPONENT)
    )
}

/// Submit `sitemap_url` to a ping endpoint. Anything but a 200 is an error.
#[instrument(skip(transport))]
pub async fn send_ping<T: Transport>(
    transport: &T,
    endpoint: &str,
    sitemap_url: &str,
    timeout: Duration,
) -> Result<HttpResponse, NetworkError> {
    let url = ping_url(endpoint, sitemap_url);
    let response = transport.fetch(&url, timeout).await?;

    if response.status_code != 200 {
        return Err(NetworkError::from_status(response.status_code));
    }

    Ok(response)
}
