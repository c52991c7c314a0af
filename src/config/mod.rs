use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scraper: ScraperConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Scraper configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScraperConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Pagination offsets, fetched strictly in this order.
    #[serde(default = "default_page_offsets")]
    pub page_offsets: Vec<u32>,
}

/// Pipeline configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    #[serde(default = "default_mismatch")]
    pub mismatch: MismatchPolicy,

    #[serde(default = "default_on_page_error")]
    pub on_page_error: FailurePolicy,
}

/// What to do when the three selector columns disagree in length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchPolicy {
    /// Zip to the shortest column, dropping trailing elements.
    Truncate,
    /// Fail the page with a shape-mismatch error.
    Error,
}

/// What to do when a page fetch/extract fails mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// First failure aborts the whole run; no partial table is surfaced.
    Abort,
    /// Log, count the failure and continue with the remaining offsets.
    Skip,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_base_url() -> String {
    "http://www.ipaidabribe.com/reports/paid".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_request_delay_ms() -> u64 {
    2000
}
fn default_jitter_ms() -> u64 {
    0
}
fn default_user_agent() -> String {
    "bribewatch/0.1 (research project; descriptive statistics over public reports)".to_string()
}
fn default_page_offsets() -> Vec<u32> {
    vec![0, 10, 20, 30, 40]
}
fn default_mismatch() -> MismatchPolicy {
    MismatchPolicy::Error
}
fn default_on_page_error() -> FailurePolicy {
    FailurePolicy::Abort
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("BRIBEWATCH").separator("__"))
            .build()?;

        let app_cfg: AppConfig = cfg
            .try_deserialize()
            .context("Invalid configuration (check config/*.toml and BRIBEWATCH__ overrides)")?;

        url::Url::parse(&app_cfg.scraper.base_url)
            .with_context(|| format!("Invalid base_url {:?}", app_cfg.scraper.base_url))?;

        Ok(app_cfg)
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            request_delay_ms: default_request_delay_ms(),
            jitter_ms: default_jitter_ms(),
            user_agent: default_user_agent(),
            page_offsets: default_page_offsets(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mismatch: default_mismatch(),
            on_page_error: default_on_page_error(),
        }
    }
}
