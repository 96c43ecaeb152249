use std::error::Error as StdError;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{redirect, Client, Url};
use tracing::{debug, warn};

use crate::domain::{ProbeTransportError, Reading, TransportKind};
use crate::ports::EndpointProbe;

/// Endpoint probe backed by a reqwest client
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new() -> Result<Self, reqwest::Error> {
        // Redirects are reported, not followed
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .user_agent(concat!("healthprobe/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl EndpointProbe for HttpProber {
    async fn probe(&self, url: &Url, timeout: Duration) -> Reading {
        let start = Instant::now();
        let result = self.client.get(url.clone()).timeout(timeout).send().await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(response) => {
                let status = response.status().as_u16();
                debug!(%url, status, elapsed_ms, "probe answered");
                Reading::http_status(status)
            }
            Err(e) => {
                let err = classify(&e);
                warn!(%url, elapsed_ms, error = %err, "probe failed");
                Reading::unreachable(err)
            }
        }
    }
}

fn classify(err: &reqwest::Error) -> ProbeTransportError {
    let kind = if err.is_timeout() {
        TransportKind::Timeout
    } else if err.is_connect() {
        TransportKind::Connect
    } else {
        TransportKind::Request
    };

    ProbeTransportError::new(kind, root_cause(err))
}

/// Innermost error message; reqwest wraps the useful one (e.g. "Connection refused")
fn root_cause(err: &(dyn StdError + 'static)) -> String {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}
