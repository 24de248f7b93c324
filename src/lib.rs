pub mod bootstrap;
pub mod cli;
pub mod client;
pub mod config;
pub mod errors;
pub mod http;
pub mod pinger;
pub mod types;
pub mod validator;

#[cfg(test)]
mod test_helper;

pub use client::{send_ping, HttpResponse, HttpTransport, Transport, DEFAULT_TIMEOUT};
pub use config::{Config, Endpoints};
pub use errors::{NetworkError, NetworkErrorKind, PingError, ValidationError};
pub use pinger::Pinger;
pub use types::{PingAllResult, PingResult, Service};
pub use validator::{normalize_sitemap_url, validate_sitemap_url};
