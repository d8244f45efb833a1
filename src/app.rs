// src/app.rs
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use crate::application::{SiteMonitor, SiteMonitorConfig};
use crate::config::{Config, SiteCfg};
use crate::domain::store::{PriceHistoryStore, Retailer, StoreRegistry};
use crate::infrastructure::notification::{LogNotifier, Notifier};
use crate::infrastructure::scraping::{HttpPageSource, ListingParser};

#[derive(Debug, Clone)]
pub struct AppCfg {
    /// Run a single cycle per site and exit.
    pub once: bool,
    pub data_dir: PathBuf,
    pub interval_secs: u64,
    pub error_backoff_secs: u64,
    pub marker_attempts: u32,
    pub request_timeout_secs: u64,
    pub sites: Vec<SiteCfg>,
}

impl AppCfg {
    pub fn from_config(cfg: Config, once: bool) -> Self {
        let sites = if cfg.sites.is_empty() {
            vec![Config::default_site()]
        } else {
            cfg.sites
        };

        Self {
            once,
            data_dir: cfg.storage.data_dir,
            interval_secs: cfg.polling.interval_secs,
            error_backoff_secs: cfg.polling.error_backoff_secs,
            marker_attempts: cfg.polling.marker_attempts,
            request_timeout_secs: cfg.polling.request_timeout_secs,
            sites,
        }
    }

    pub fn from_defaults(once: bool) -> Self {
        Self::from_config(Config::default(), once)
    }
}

pub async fn run(app_cfg: AppCfg) -> Result<()> {
    info!("Starting price tracking with {} site(s)", app_cfg.sites.len());

    let registry = StoreRegistry::new(app_cfg.data_dir.clone());
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);

    let mut monitors = Vec::new();
    for site in &app_cfg.sites {
        let retailer: Retailer = site
            .retailer
            .parse()
            .map_err(|e: String| anyhow::anyhow!("invalid site config: {e}"))?;

        let store = PriceHistoryStore::new(registry.open(retailer)?);
        let parser = ListingParser::new(site.selectors.clone())?;
        let page_source = HttpPageSource::new(
            &site.url,
            Duration::from_secs(app_cfg.request_timeout_secs),
        )?;

        let monitor_cfg = SiteMonitorConfig {
            site_name: retailer.to_string(),
            base_url: site.base_url.clone(),
            marker_text: site.marker_text.clone(),
            poll_interval: Duration::from_secs(app_cfg.interval_secs),
            error_backoff: Duration::from_secs(app_cfg.error_backoff_secs),
            marker_attempts: app_cfg.marker_attempts,
            operator: site.operator.clone(),
        };

        info!("✅ {} tracked at {}", retailer, store.path().display());
        monitors.push(SiteMonitor::new(
            monitor_cfg,
            store,
            Box::new(page_source),
            parser,
            notifier.clone(),
        ));
    }

    if app_cfg.once {
        for mut monitor in monitors {
            let summary = monitor.run_once().await?;
            info!(
                "Single cycle: {} products, {} changed",
                summary.products_seen, summary.changes_recorded
            );
        }
        return Ok(());
    }

    // One independent worker per site; they only rejoin if every loop ends,
    // which none does.
    let handles: Vec<_> = monitors
        .into_iter()
        .map(|monitor| tokio::spawn(monitor.run()))
        .collect();
    futures::future::join_all(handles).await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cfg_tracks_the_builtin_site() {
        let app_cfg = AppCfg::from_defaults(true);
        assert!(app_cfg.once);
        assert_eq!(app_cfg.sites.len(), 1);
        assert_eq!(app_cfg.sites[0].retailer, "evo");
        assert_eq!(app_cfg.interval_secs, 3600);
    }

    #[test]
    fn test_configured_sites_replace_the_builtin() {
        let mut cfg = Config::default();
        let mut site = Config::default_site();
        site.retailer = "gamestop".to_string();
        cfg.sites.push(site);

        let app_cfg = AppCfg::from_config(cfg, false);
        assert_eq!(app_cfg.sites.len(), 1);
        assert_eq!(app_cfg.sites[0].retailer, "gamestop");
    }
}
