use std::time::Duration;

/// The sitemap URL was rejected before any request was made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    Timeout,
    Dns,
    ConnectionRefused,
    Other,
    ClientError,
    ServerError,
    UnexpectedStatus,
}

/// A request was attempted and failed, either in transport or with a non-200 status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct NetworkError {
    kind: NetworkErrorKind,
    message: String,
    status_code: Option<u16>,
}

impl NetworkError {
    pub fn new(kind: NetworkErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
        }
    }

    pub fn timeout(timeout: Duration) -> Self {
        Self::new(
            NetworkErrorKind::Timeout,
            format!(
                "Request timeout - server did not respond within {} seconds",
                timeout.as_secs_f64()
            ),
        )
    }

    pub fn dns(host: &str) -> Self {
        Self::new(
            NetworkErrorKind::Dns,
            format!("DNS resolution failed - hostname not found: {host}"),
        )
    }

    pub fn connection_refused() -> Self {
        Self::new(
            NetworkErrorKind::ConnectionRefused,
            "Connection refused - server is not accepting connections",
        )
    }

    pub fn other(cause: impl std::fmt::Display) -> Self {
        Self::new(NetworkErrorKind::Other, format!("Network error: {cause}"))
    }

    /// Classify a non-200 response status.
    pub fn from_status(status_code: u16) -> Self {
        let (kind, message) = match status_code {
            400..=499 => (
                NetworkErrorKind::ClientError,
                format!(
                    "Client error ({status_code}) - the sitemap URL may be invalid or inaccessible"
                ),
            ),
            500..=599 => (
                NetworkErrorKind::ServerError,
                format!(
                    "Server error ({status_code}) - the search engine service is temporarily unavailable"
                ),
            ),
            _ => (
                NetworkErrorKind::UnexpectedStatus,
                format!("Unexpected status code: {status_code}"),
            ),
        };
        Self {
            kind,
            message,
            status_code: Some(status_code),
        }
    }

    pub fn kind(&self) -> NetworkErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Only set for HTTP-level failures.
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Network(#[from] NetworkError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {key} {value:?}: expected a positive number of milliseconds")]
    InvalidTimeout {
        key: &'static str,
        value: String,
        #[source]
        source: Option<std::num::ParseIntError>,
    },

    #[error("Invalid {key} {value:?}: expected an http or https URL")]
    InvalidEndpoint {
        key: &'static str,
        value: String,
        #[source]
        source: Option<url::ParseError>,
    },
}
