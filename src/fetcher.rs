use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use crate::error::FetchError;

const USER_AGENT: &str = concat!("course_catalog/", env!("CARGO_PKG_VERSION"));

/// GET a URL and hand back the body text.
#[async_trait::async_trait]
pub trait PageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Option<Duration>) -> Self {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build().unwrap_or_else(|e| {
            warn!("Falling back to default HTTP client: {}", e);
            Client::new()
        });
        Self { client }
    }
}

#[async_trait::async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let wrap = |e: reqwest::Error| FetchError {
            url: url.to_string(),
            source: e.into(),
        };

        let response = self
            .client
            .get(url)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(wrap)?;

        debug!("GET {} -> {}", url, response.status());
        response.text().await.map_err(wrap)
    }
}
