//! Outbound message delivery

mod telegram;

pub use telegram::TelegramNotifier;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from message delivery
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Delivery not configured: {0}")]
    Config(String),

    #[error("Telegram API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// A sink for MarkdownV2 messages
///
/// One attempt per message; the caller decides what a failure means.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}
