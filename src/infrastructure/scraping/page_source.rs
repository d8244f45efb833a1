//! Page source provider

use std::time::Duration;

use async_trait::async_trait;

use crate::shared::errors::ScrapeError;

/// Supplies the current rendered text of one listing page.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn page_source(&self) -> Result<String, ScrapeError>;
}

/// Fetches the page over plain HTTP with a bounded request timeout.
pub struct HttpPageSource {
    client: reqwest::Client,
    url: String,
}

impl HttpPageSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ScrapeError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn page_source(&self) -> Result<String, ScrapeError> {
        let response = self.client.get(&self.url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}
