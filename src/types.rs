use serde_derive::Serialize;
use strum::{AsRefStr, Display};
use time::OffsetDateTime;

pub const GOOGLE_PING_ENDPOINT: &str = "http://www.google.com/ping";
pub const BING_PING_ENDPOINT: &str = "http://www.bing.com/ping";

const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Serialize, Debug, Display, AsRefStr, PartialEq, Eq, Hash, Copy, Clone)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Google,
    Bing,
}

impl Service {
    #[inline]
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Service::Google => GOOGLE_PING_ENDPOINT,
            Service::Bing => BING_PING_ENDPOINT,
        }
    }
}

/// Outcome of one ping attempt. Built once through [`PingResult::success`] or
/// [`PingResult::failure`] and never changed afterwards.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PingResult {
    succeeded: bool,
    service: Service,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_code: Option<u16>,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
    submitted_url: String,
}

impl PingResult {
    pub fn success(service: Service, submitted_url: impl Into<String>, status_code: u16) -> Self {
        Self {
            succeeded: true,
            service,
            status_code: Some(status_code),
            timestamp: OffsetDateTime::now_utc(),
            error_message: None,
            submitted_url: submitted_url.into(),
        }
    }

    /// An empty message is replaced so a failure always explains itself.
    pub fn failure(
        service: Service,
        submitted_url: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Self {
        let mut error_message = error_message.into();
        if error_message.is_empty() {
            error_message = UNKNOWN_ERROR.to_owned();
        }
        Self {
            succeeded: false,
            service,
            status_code: None,
            timestamp: OffsetDateTime::now_utc(),
            error_message: Some(error_message),
            submitted_url: submitted_url.into(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn service(&self) -> Service {
        self.service
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn submitted_url(&self) -> &str {
        &self.submitted_url
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PingAllResult {
    pub google: PingResult,
    pub bing: PingResult,
}

impl PingAllResult {
    #[inline]
    pub fn all_succeeded(&self) -> bool {
        self.google.succeeded && self.bing.succeeded
    }

    /// Google first, then Bing.
    pub fn results(&self) -> [&PingResult; 2] {
        [&self.google, &self.bing]
    }
}
