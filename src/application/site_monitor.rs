//! Per-site polling worker

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::domain::store::{PriceHistoryStore, ProductRecord};
use crate::domain::tracking::price_changed;
use crate::infrastructure::notification::Notifier;
use crate::infrastructure::scraping::{ListingParser, PageSource};
use crate::shared::errors::{AppError, ScrapeError};

/// Settings for one site's polling worker.
#[derive(Debug, Clone)]
pub struct SiteMonitorConfig {
    pub site_name: String,
    /// Prepended to relative product urls in notification messages.
    pub base_url: String,
    /// Text that must appear in the page source before parsing.
    pub marker_text: String,
    pub poll_interval: Duration,
    pub error_backoff: Duration,
    /// Fetch attempts before a missing marker fails the cycle.
    pub marker_attempts: u32,
    /// Recipient tag for diagnostic messages.
    pub operator: Option<String>,
}

/// Counters over one worker's lifetime.
#[derive(Debug, Clone)]
pub struct MonitorStats {
    pub started_at: Instant,
    pub cycles_completed: u64,
    pub products_seen: u64,
    pub changes_recorded: u64,
}

impl MonitorStats {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            cycles_completed: 0,
            products_seen: 0,
            changes_recorded: 0,
        }
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

impl Default for MonitorStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one polling cycle.
#[derive(Debug, Clone, Copy)]
pub struct CycleSummary {
    pub products_seen: usize,
    pub changes_recorded: usize,
}

/// Independent worker tracking one retailer's listing page.
///
/// Each cycle: fetch the page, verify the marker text, parse listings, and
/// for every listing whose prices differ from the latest stored observation,
/// append-and-persist then notify. Cycle errors are never fatal; the worker
/// logs, backs off, and tries again indefinitely.
pub struct SiteMonitor {
    config: SiteMonitorConfig,
    store: PriceHistoryStore,
    page_source: Box<dyn PageSource>,
    parser: ListingParser,
    notifier: Arc<dyn Notifier>,
    stats: MonitorStats,
}

impl SiteMonitor {
    pub fn new(
        config: SiteMonitorConfig,
        store: PriceHistoryStore,
        page_source: Box<dyn PageSource>,
        parser: ListingParser,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            store,
            page_source,
            parser,
            notifier,
            stats: MonitorStats::new(),
        }
    }

    pub fn stats(&self) -> &MonitorStats {
        &self.stats
    }

    pub fn store(&self) -> &PriceHistoryStore {
        &self.store
    }

    /// Poll forever. Never returns.
    pub async fn run(mut self) {
        info!("Starting {} price check...", self.config.site_name);

        loop {
            match self.run_once().await {
                Ok(summary) => {
                    info!(
                        "[{}] cycle complete: {} products, {} changed; waiting {:.2} seconds before next check...",
                        self.config.site_name,
                        summary.products_seen,
                        summary.changes_recorded,
                        self.config.poll_interval.as_secs_f64(),
                    );
                    sleep(self.config.poll_interval).await;
                }
                Err(e) => {
                    error!("[{}] error during check: {e}", self.config.site_name);
                    // Wait a bit longer on error, jittered.
                    let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..1000));
                    sleep(self.config.error_backoff + jitter).await;
                }
            }
        }
    }

    /// Run a single polling cycle.
    pub async fn run_once(&mut self) -> Result<CycleSummary, AppError> {
        let source = self.ready_page_source().await?;
        let listings = self.parser.parse(&source)?;

        let mut changes_recorded = 0;
        for listing in &listings {
            let existing = self.store.product(&listing.product_id)?;
            if !price_changed(existing.as_ref(), listing.prices) {
                continue;
            }

            let record = self.store.insert_or_update_product(
                &listing.product_id,
                &listing.product_name,
                &listing.product_url,
                listing.prices,
            )?;
            changes_recorded += 1;
            info!(
                "✅ Updated product_id={} prices={:?}",
                listing.product_id, listing.prices
            );

            let message = change_message(&self.config.base_url, &listing.product_url, &record);
            if let Err(e) = self.notifier.send(&message, None).await {
                warn!(
                    "[{}] change notification failed: {e}",
                    self.config.site_name
                );
            }
        }

        self.stats.cycles_completed += 1;
        self.stats.products_seen += listings.len() as u64;
        self.stats.changes_recorded += changes_recorded as u64;

        Ok(CycleSummary {
            products_seen: listings.len(),
            changes_recorded,
        })
    }

    /// Fetch the page until the marker text shows up, within the configured
    /// number of attempts. Each miss raises a diagnostic through the notifier.
    async fn ready_page_source(&self) -> Result<String, ScrapeError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let source = self.page_source.page_source().await?;
            if source.contains(&self.config.marker_text) {
                return Ok(source);
            }

            warn!(
                "[{}] expected text {:?} not on page (attempt {}/{})",
                self.config.site_name, self.config.marker_text, attempt, self.config.marker_attempts,
            );
            let diagnostic = format!(
                "[{}] It messed up, expected text {:?} missing from page",
                self.config.site_name, self.config.marker_text,
            );
            if let Err(e) = self
                .notifier
                .send(&diagnostic, self.config.operator.as_deref())
                .await
            {
                warn!("[{}] diagnostic notification failed: {e}", self.config.site_name);
            }

            if attempt >= self.config.marker_attempts {
                return Err(ScrapeError::MarkerMissing(self.config.marker_text.clone()));
            }
            sleep(self.config.error_backoff).await;
        }
    }
}

fn change_message(base_url: &str, product_url: &str, record: &ProductRecord) -> String {
    let history = record
        .price_history
        .iter()
        .map(|obs| format!("**{}:** ${} - ${}", obs.date, obs.min, obs.max))
        .collect::<Vec<_>>()
        .join("\n");
    format!("✅ Updated: {base_url}{product_url}\n\n**Price History**\n{history}")
}
