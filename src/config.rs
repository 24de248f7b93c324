use crate::{client::DEFAULT_TIMEOUT, errors::ConfigError, types::Service};
use std::{env, time::Duration};
use url::Url;

const TIMEOUT_KEY: &str = "SITEMAP_PING_TIMEOUT_MS";
const GOOGLE_ENDPOINT_KEY: &str = "SITEMAP_PING_GOOGLE_ENDPOINT";
const BING_ENDPOINT_KEY: &str = "SITEMAP_PING_BING_ENDPOINT";

/// Ping endpoint per service. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    google: String,
    bing: String,
}

impl Endpoints {
    pub fn new(google: impl Into<String>, bing: impl Into<String>) -> Self {
        Self {
            google: google.into(),
            bing: bing.into(),
        }
    }

    #[inline]
    pub fn get(&self, service: Service) -> &str {
        match service {
            Service::Google => &self.google,
            Service::Bing => &self.bing,
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(
            Service::Google.default_endpoint(),
            Service::Bing.default_endpoint(),
        )
    }
}

/// Runtime settings, derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Per-request timeout, applied to each ping on its own.
    pub timeout: Duration,
    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    /// Read `SITEMAP_PING_TIMEOUT_MS`, `SITEMAP_PING_GOOGLE_ENDPOINT` and
    /// `SITEMAP_PING_BING_ENDPOINT`, falling back to the defaults for unset keys.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let timeout = match lookup(TIMEOUT_KEY) {
            Some(value) => parse_timeout(value)?,
            None => DEFAULT_TIMEOUT,
        };

        let endpoint = |key: &'static str, service: Service| match lookup(key) {
            Some(value) => parse_endpoint(key, value),
            None => Ok(service.default_endpoint().to_owned()),
        };

        Ok(Self {
            timeout,
            endpoints: Endpoints::new(
                endpoint(GOOGLE_ENDPOINT_KEY, Service::Google)?,
                endpoint(BING_ENDPOINT_KEY, Service::Bing)?,
            ),
        })
    }
}

fn parse_timeout(value: String) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidTimeout {
            key: TIMEOUT_KEY,
            value,
            source: None,
        }),
        Ok(ms) => Ok(Duration::from_millis(ms)),
        Err(err) => Err(ConfigError::InvalidTimeout {
            key: TIMEOUT_KEY,
            value,
            source: Some(err),
        }),
    }
}

fn parse_endpoint(key: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(trimmed.to_owned()),
        Ok(_) => Err(ConfigError::InvalidEndpoint {
            key,
            value,
            source: None,
        }),
        Err(err) => Err(ConfigError::InvalidEndpoint {
            key,
            value,
            source: Some(err),
        }),
    }
}
