use std::time::Duration;

use async_trait::async_trait;

use crate::error::PipelineError;

/// Some listing sites serve a bot-interstitial to default client strings.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
pub(crate) const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Loads pages for the scrapers. The production implementation fetches
/// over HTTP; tests serve canned fixtures instead.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page at `url` and return its HTML.
    async fn fetch(&self, url: &str) -> Result<String, PipelineError>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, PipelineError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| {
                PipelineError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, PipelineError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PipelineError::Navigation(format!("{url}: {e}")))?;

        if !response.status().is_success() {
            return Err(PipelineError::Navigation(format!(
                "{url}: HTTP {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| PipelineError::Navigation(format!("{url}: {e}")))
    }
}
