//! Outbound notification sink backed by the Telegram bot API.

use crate::config::TelegramConfig;
use crate::error::NotifyError;
use std::future::Future;

/// Anything that can deliver one rendered alert.
pub trait NotifySink: Send + Sync {
    fn send(&self, text: &str) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

#[derive(Clone)]
pub struct TelegramNotifier {
    http: reqwest::Client,
    endpoint: String,
    chat_id: String,
}

impl std::fmt::Debug for TelegramNotifier {
    // The endpoint embeds the bot token.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl TelegramNotifier {
    pub fn new(api_base: &str, token: &str, chat_id: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/bot{}/sendMessage", api_base.trim_end_matches('/'), token),
            chat_id: chat_id.to_string(),
        }
    }

    /// Build a notifier when both the token and the chat id are present and non-blank.
    pub fn from_config(config: &TelegramConfig) -> Option<Self> {
        let token = non_blank(config.token.as_deref())?;
        let chat_id = non_blank(config.chat_id.as_deref())?;
        Some(Self::new(&config.api_base, token, chat_id))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl NotifySink for TelegramNotifier {
    #[tracing::instrument(name = "telegram_send", level = "debug", skip_all)]
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let response = self
            .http
            .post(&self.endpoint)
            .form(&[
                ("chat_id", self.chat_id.as_str()),
                ("text", text),
                ("parse_mode", "HTML"),
                ("disable_web_page_preview", "true"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }
        Ok(())
    }
}
