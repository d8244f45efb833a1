//! Error handling for the application

use thiserror::Error;

/// Store-related errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store file is corrupt: {0}")]
    Corrupt(String),

    #[error("value serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("unsupported value: {0}")]
    UnsupportedValue(String),
}

/// Scraping-related errors
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("page fetch failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("expected page text {0:?} never appeared")]
    MarkerMissing(String),

    #[error("invalid selector {0:?}: {1}")]
    Selector(String, String),

    #[error("expected node not found: {0}")]
    MissingNode(String),

    #[error("could not parse a price out of {0:?}")]
    InvalidPrice(String),
}

/// Notification-related errors
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("scrape error: {0}")]
    Scrape(#[from] ScrapeError),

    #[error("notification error: {0}")]
    Notify(#[from] NotifyError),
}
