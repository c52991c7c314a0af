use super::ScrapeError;
use crate::config::ScraperConfig;
use std::time::Duration;
use tracing::debug;

pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        let inner = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .build()
            .map_err(ScrapeError::Client)?;

        Ok(Self { inner })
    }

    /// Fetch a URL as text. One GET, no retry: a transport failure, timeout
    /// or non-2xx status fails the page.
    pub async fn get_text(&self, url: &str) -> Result<String, ScrapeError> {
        debug!("GET {}", url);

        let resp = self
            .inner
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeError::Network {
                url: url.to_string(),
                source: e,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        resp.text().await.map_err(|e| ScrapeError::Network {
            url: url.to_string(),
            source: e,
        })
    }
}
