use reqwest::{Client, ClientBuilder as RClientBuilder};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use tap::Pipe;

pub static APP_USER_AGENT: &str = concat!("sitemap-ping/", env!("CARGO_PKG_VERSION"),);

/// Build the client used for pings. No retry middleware, each ping is a
/// single round trip.
pub fn build_client(
    builder: impl FnOnce(RClientBuilder) -> RClientBuilder,
) -> reqwest::Result<ClientWithMiddleware> {
    let client = Client::builder()
        .user_agent(APP_USER_AGENT)
        .pipe(builder)
        .build()?;

    let client = ClientBuilder::new(client)
        // Trace HTTP requests. See the tracing crate to make use of these traces.
        .with(TracingMiddleware::default())
        .build();
    Ok(client)
}
