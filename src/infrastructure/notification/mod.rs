//! Notification channel

use async_trait::async_trait;
use tracing::info;

use crate::shared::errors::NotifyError;

/// Sink for price-change and diagnostic messages.
///
/// Delivery, platform formatting, and retry are entirely the implementor's
/// concern; callers fire and forget.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &str, recipient: Option<&str>) -> Result<(), NotifyError>;
}

/// Default notifier that writes messages to the log.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &str, recipient: Option<&str>) -> Result<(), NotifyError> {
        match recipient {
            Some(recipient) => info!("📣 [to {recipient}] {message}"),
            None => info!("📣 {message}"),
        }
        Ok(())
    }
}
