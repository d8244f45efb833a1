use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::infrastructure::scraping::ListingSelectors;

#[derive(Debug, Clone, Deserialize)]
pub struct StorageCfg {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageCfg {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingCfg {
    /// Seconds between polling cycles.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Seconds to wait after a failed cycle before retrying.
    #[serde(default = "default_error_backoff_secs")]
    pub error_backoff_secs: u64,
    /// Fetch attempts before a missing page marker fails the cycle.
    #[serde(default = "default_marker_attempts")]
    pub marker_attempts: u32,
    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for PollingCfg {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            error_backoff_secs: default_error_backoff_secs(),
            marker_attempts: default_marker_attempts(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteCfg {
    /// Which named store this site's worker owns (e.g. "evo").
    pub retailer: String,
    /// Listing page to poll.
    pub url: String,
    /// Prefix for relative product urls in notifications.
    pub base_url: String,
    /// Text that must appear in the page source before parsing.
    pub marker_text: String,
    /// Recipient tag for diagnostic messages.
    #[serde(default)]
    pub operator: Option<String>,
    pub selectors: ListingSelectors,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageCfg,
    #[serde(default)]
    pub polling: PollingCfg,
    #[serde(default)]
    pub sites: Vec<SiteCfg>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path.as_ref())?;
        let cfg: Self = toml::from_str(&s).context("parse Config.toml")?;
        Ok(cfg)
    }

    /// Built-in site used when no config file names any: the evo snowboard
    /// jacket listing.
    pub fn default_site() -> SiteCfg {
        SiteCfg {
            retailer: "evo".to_string(),
            url: "https://www.evo.com/shop/snowboard/jackets/686/burton/mens/size_s/size_xs/rpp_200"
                .to_string(),
            base_url: "https://www.evo.com".to_string(),
            marker_text: "Men's Snowboard Jackets".to_string(),
            operator: None,
            selectors: ListingSelectors {
                product: "div.product-thumb".to_string(),
                id_attribute: "data-productid".to_string(),
                title: "span.product-thumb-title".to_string(),
                link: "a.product-thumb-link".to_string(),
                price: "span.product-thumb-price".to_string(),
            },
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_interval_secs() -> u64 {
    60 * 60
}

fn default_error_backoff_secs() -> u64 {
    10
}

fn default_marker_attempts() -> u32 {
    3
}

fn default_request_timeout_secs() -> u64 {
    60
}
