// src/services/telegram.rs

//! Telegram Bot API delivery client.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, DeliveryErrorKind, Result};
use crate::models::Config;
use crate::utils::http;

/// Delivery seam for rendered notifications.
#[async_trait]
pub trait DeliveryClient: Send + Sync {
    /// Send a photo with an HTML caption.
    async fn send_photo(&self, chat: &str, photo_url: &str, caption: &str) -> Result<()>;

    /// Send a plain HTML message.
    async fn send_message(&self, chat: &str, text: &str) -> Result<()>;
}

/// Minimal Bot API response envelope; `description` explains rejections.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    description: Option<String>,
}

/// Live Telegram Bot API client.
pub struct TelegramClient {
    config: Arc<Config>,
    client: Client,
    token: String,
}

impl TelegramClient {
    /// Create a new client, resolving the bot token from config or env.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let client = http::create_async_client(&config.http)?;
        let token = config.telegram.resolve_token()?;
        Ok(Self {
            config,
            client,
            token,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.telegram.api_base.trim_end_matches('/'),
            self.token,
            method
        )
    }

    async fn call(&self, method: &str, payload: serde_json::Value) -> Result<()> {
        let response = self
            .client
            .post(self.method_url(method))
            .json(&payload)
            .send()
            .await
            .map_err(classify_transport)?;

        let parsed: ApiResponse = response.json().await.map_err(classify_transport)?;
        if parsed.ok {
            Ok(())
        } else {
            Err(AppError::delivery(
                DeliveryErrorKind::Rejected,
                parsed
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            ))
        }
    }
}

#[async_trait]
impl DeliveryClient for TelegramClient {
    async fn send_photo(&self, chat: &str, photo_url: &str, caption: &str) -> Result<()> {
        self.call(
            "sendPhoto",
            json!({
                "chat_id": chat,
                "photo": photo_url,
                "caption": caption,
                "parse_mode": "HTML",
            }),
        )
        .await
    }

    async fn send_message(&self, chat: &str, text: &str) -> Result<()> {
        self.call(
            "sendMessage",
            json!({
                "chat_id": chat,
                "text": text,
                "parse_mode": "HTML",
            }),
        )
        .await
    }
}

fn classify_transport(error: reqwest::Error) -> AppError {
    let kind = if error.is_timeout() {
        DeliveryErrorKind::TimedOut
    } else {
        DeliveryErrorKind::Network
    };
    AppError::delivery(kind, error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_url_embeds_token() {
        let mut config = Config::default();
        config.telegram.token = "12345:abc".to_string();
        let client = TelegramClient::new(Arc::new(config)).unwrap();

        assert_eq!(
            client.method_url("sendMessage"),
            "https://api.telegram.org/bot12345:abc/sendMessage"
        );
    }

    #[test]
    fn rejection_parses_description() {
        let raw = r#"{"ok": false, "description": "Bad Request: can't parse entities"}"#;
        let parsed: ApiResponse = serde_json::from_str(raw).unwrap();
        assert!(!parsed.ok);
        assert_eq!(
            parsed.description.as_deref(),
            Some("Bad Request: can't parse entities")
        );
    }

    #[test]
    fn success_without_description() {
        let raw = r#"{"ok": true, "result": {"message_id": 7}}"#;
        let parsed: ApiResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.ok);
        assert_eq!(parsed.description, None);
    }
}
