use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;

use crate::domain::Reading;

/// Port for probing an HTTP endpoint.
///
/// Implementations never fail: transport problems come back as an
/// unreachable reading.
#[async_trait]
pub trait EndpointProbe: Send + Sync {
    async fn probe(&self, url: &Url, timeout: Duration) -> Reading;
}
