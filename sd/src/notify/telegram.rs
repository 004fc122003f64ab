//! Telegram Bot API client

use super::{Notifier, NotifyError};
use crate::config::TelegramConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Delivers messages through the Bot API `sendMessage` method
#[derive(Debug)]
pub struct TelegramNotifier {
    chat_id: String,
    url: String,
    http: Client,
}

impl TelegramNotifier {
    /// Create a notifier from configuration
    ///
    /// The bot token is read from the environment variable the config
    /// names; it never lives in the config file itself.
    pub fn from_config(config: &TelegramConfig) -> Result<Self, NotifyError> {
        let token = std::env::var(&config.bot_token_env).map_err(|_| {
            NotifyError::Config(format!(
                "bot token environment variable {} is not set",
                config.bot_token_env
            ))
        })?;

        if config.chat_id.is_empty() {
            return Err(NotifyError::Config("telegram.chat-id is empty".to_string()));
        }

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(NotifyError::Network)?;

        Ok(Self {
            chat_id: config.chat_id.clone(),
            url: format!(
                "{}/bot{}/sendMessage",
                config.api_base.trim_end_matches('/'),
                token
            ),
            http,
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        debug!("TelegramNotifier: sending {} chars", text.len());

        let body = json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "MarkdownV2",
        });

        let response = self.http.post(&self.url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NotifyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!("TelegramNotifier: message delivered");
        Ok(())
    }
}
