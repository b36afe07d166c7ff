use std::time::Duration;

use deadlinks_core::error::AppError;
use deadlinks_core::outcome::ProbeResult;
use deadlinks_core::traits::Probe;
use reqwest::Client;

/// HTTP probe using reqwest.
///
/// Issues a single GET per URL with a per-request timeout and reports the
/// raw transport result; classification happens in the caller. Only the
/// status line matters — the response body is never read. Redirects are
/// followed, so the reported status is that of the final hop.
#[derive(Clone)]
pub struct ReqwestProbe {
    client: Client,
}

impl ReqwestProbe {
    pub fn new() -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent("deadlinks/0.2 (link checker)")
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Probe for ReqwestProbe {
    async fn probe(&self, url: &str, timeout: Duration) -> ProbeResult {
        match self.client.get(url).timeout(timeout).send().await {
            Ok(response) => ProbeResult::Response(response.status().as_u16()),
            Err(e) if e.is_timeout() => ProbeResult::TimedOut,
            Err(e) => ProbeResult::Failed(e.to_string()),
        }
    }
}
