#![cfg(test)]
use crate::{
    client::{HttpResponse, Transport},
    config::{Config, Endpoints},
    errors::NetworkError,
    pinger::Pinger,
};
use std::{
    sync::Mutex,
    time::{Duration, Instant},
};

pub const GOOGLE_ENDPOINT: &str = "https://google.test/ping";
pub const BING_ENDPOINT: &str = "https://bing.test/ping";

#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16),
    Fail(NetworkError),
}

#[derive(Debug, Clone)]
pub struct Call {
    pub url: String,
    pub started: Instant,
}

/// Transport that answers by URL prefix and records every call.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Vec<(String, Reply)>,
    delay: Duration,
    calls: Mutex<Vec<Call>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, prefix: &str, reply: Reply) -> Self {
        self.replies.push((prefix.to_owned(), reply));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    async fn fetch(&self, url: &str, _timeout: Duration) -> Result<HttpResponse, NetworkError> {
        self.calls.lock().unwrap().push(Call {
            url: url.to_owned(),
            started: Instant::now(),
        });

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let reply = self
            .replies
            .iter()
            .find(|(prefix, _)| url.starts_with(prefix.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or(Reply::Status(200));

        match reply {
            Reply::Status(status_code) => Ok(HttpResponse {
                status_code,
                body: String::new(),
            }),
            Reply::Fail(err) => Err(err),
        }
    }
}

pub fn test_pinger(transport: MockTransport) -> Pinger<MockTransport> {
    Pinger::new(
        transport,
        Config {
            endpoints: Endpoints::new(GOOGLE_ENDPOINT, BING_ENDPOINT),
            ..Default::default()
        },
    )
}
