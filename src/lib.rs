//! Pricewatch - retail price tracking bot
//! Watches retailer listing pages and records per-product price transitions

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export main types for convenience
pub use application::SiteMonitor;
pub use domain::store::{KvStore, PriceHistoryStore, StoreRegistry};
pub use domain::tracking::price_changed;
pub use infrastructure::notification::Notifier;
pub use infrastructure::scraping::PageSource;
