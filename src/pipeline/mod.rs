//! Pipeline orchestrator: drives the page loop and assembles the table.
//!
//! One `run()` is a single linear pass: for each configured offset, fetch →
//! extract → clean, then pause before the next request (self-rate-limiting;
//! no pause after the last page). Page order is preserved end to end, so the
//! combined table reads page order first, in-page order second.
//!
//! The inter-request pause and the per-page progress message are injectable
//! (`Delay` trait, progress callback) so the loop itself stays testable
//! without real sleeps or sockets.

use crate::config::{AppConfig, FailurePolicy};
use crate::models::BribeReport;
use crate::scraper::ReportSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::RngExt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

// ── Injectable side effects ───────────────────────────────────────────────────

/// Pause between page fetches. Tests swap in a recording fake.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn pause(&self, d: Duration);
}

pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn pause(&self, d: Duration) {
        sleep(d).await;
    }
}

/// Progress report for one page of the run, 1-based.
#[derive(Debug, Clone, Copy)]
pub struct PageProgress {
    pub page: usize,
    pub total: usize,
    pub offset: u32,
}

pub type ProgressFn = Box<dyn Fn(PageProgress) + Send + Sync>;

// ── Pipeline ──────────────────────────────────────────────────────────────────

pub struct Pipeline<S: ReportSource> {
    source: S,
    config: AppConfig,
    delay: Box<dyn Delay>,
    progress: Option<ProgressFn>,
}

#[derive(Debug)]
pub struct ScrapeOutcome {
    pub table: Vec<BribeReport>,
    pub pages_fetched: usize,
    pub errors: usize,
}

impl<S: ReportSource> Pipeline<S> {
    pub fn new(source: S, config: AppConfig) -> Self {
        Self {
            source,
            config,
            delay: Box::new(TokioDelay),
            progress: None,
        }
    }

    pub fn with_delay(mut self, delay: Box<dyn Delay>) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Fetch every configured offset in order and return the combined table.
    ///
    /// Failure handling follows `on_page_error`: `Abort` propagates the first
    /// page error and surfaces nothing, `Skip` logs it and moves on.
    pub async fn run(&self) -> Result<ScrapeOutcome> {
        let offsets = &self.config.scraper.page_offsets;
        let mut pages: Vec<Vec<BribeReport>> = Vec::new();
        let mut pages_fetched = 0usize;
        let mut errors = 0usize;

        for (i, &offset) in offsets.iter().enumerate() {
            if let Some(progress) = &self.progress {
                progress(PageProgress {
                    page: i + 1,
                    total: offsets.len(),
                    offset,
                });
            }

            match self.source.fetch_page(offset).await {
                Ok(rows) => {
                    info!("Offset {}: {} rows", offset, rows.len());
                    pages.push(rows);
                    pages_fetched += 1;
                }
                Err(e) => match self.config.pipeline.on_page_error {
                    FailurePolicy::Abort => {
                        return Err(e)
                            .with_context(|| format!("Page fetch failed at offset {}", offset));
                    }
                    FailurePolicy::Skip => {
                        warn!("Offset {} failed, skipping: {}", offset, e);
                        errors += 1;
                    }
                },
            }

            if i + 1 < offsets.len() {
                self.delay.pause(self.pause_duration()).await;
            }
        }

        Ok(ScrapeOutcome {
            table: assemble(pages),
            pages_fetched,
            errors,
        })
    }

    fn pause_duration(&self) -> Duration {
        let cfg = &self.config.scraper;
        let jitter = if cfg.jitter_ms > 0 {
            rand::rng().random_range(0..=cfg.jitter_ms)
        } else {
            0
        };
        Duration::from_millis(cfg.request_delay_ms + jitter)
    }
}

// ── Table assembler ───────────────────────────────────────────────────────────

/// Concatenate per-page tables: page order, then in-page order.
/// No filtering, no deduplication.
pub fn assemble(pages: Vec<Vec<BribeReport>>) -> Vec<BribeReport> {
    pages.into_iter().flatten().collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
