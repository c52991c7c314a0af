pub mod cleaner;
pub mod http_client;
pub mod parsers;

use crate::config::{MismatchPolicy, ScraperConfig};
use crate::models::BribeReport;
use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use self::cleaner::rows_from_page;
use self::http_client::HttpClient;
use self::parsers::parse_report_page;

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("request for {url} failed")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("bad selector: {0}")]
    Selector(String),

    #[error(
        "selector columns differ in length: {amounts} amounts, \
         {transactions} transactions, {departments} departments"
    )]
    ShapeMismatch {
        amounts: usize,
        transactions: usize,
        departments: usize,
    },
}

// ── Source trait ──────────────────────────────────────────────────────────────

/// Swappable page source abstraction.
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Fetch and clean one listing page identified by its pagination offset.
    async fn fetch_page(&self, offset: u32) -> Result<Vec<BribeReport>, ScrapeError>;
}

// ── Listing scraper ───────────────────────────────────────────────────────────

pub struct BribeScraper {
    client: HttpClient,
    base_url: String,
    mismatch: MismatchPolicy,
}

impl BribeScraper {
    pub fn new(config: &ScraperConfig, mismatch: MismatchPolicy) -> Result<Self, ScrapeError> {
        Ok(Self {
            client: HttpClient::new(config)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            mismatch,
        })
    }

    /// The first page is served at the bare listing URL; later pages take a
    /// `?page=` offset.
    fn page_url(&self, offset: u32) -> String {
        if offset == 0 {
            self.base_url.clone()
        } else {
            format!("{}?page={}", self.base_url, offset)
        }
    }
}

#[async_trait]
impl ReportSource for BribeScraper {
    async fn fetch_page(&self, offset: u32) -> Result<Vec<BribeReport>, ScrapeError> {
        let url = self.page_url(offset);
        debug!("Fetching listing page: {}", url);

        let html = self.client.get_text(&url).await?;
        let raw = parse_report_page(&html)?;

        rows_from_page(raw, self.mismatch, Utc::now().naive_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn test_page_url() {
        let cfg = AppConfig::default();
        let scraper = BribeScraper::new(&cfg.scraper, MismatchPolicy::Error).unwrap();

        assert_eq!(scraper.page_url(0), "http://www.ipaidabribe.com/reports/paid");
        assert_eq!(
            scraper.page_url(10),
            "http://www.ipaidabribe.com/reports/paid?page=10"
        );
        assert_eq!(
            scraper.page_url(40),
            "http://www.ipaidabribe.com/reports/paid?page=40"
        );
    }
}
