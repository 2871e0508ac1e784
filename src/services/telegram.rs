//! Telegram Bot API sink for outbound notifications.

use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::Client;
use serde::Serialize;

use crate::services::notifier::{DeliveryError, DeliveryResult, Notifier};
use crate::state::GroupId;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Notifier delivering messages through the Telegram `sendMessage` endpoint.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client: Client,
    send_url: Arc<str>,
}

#[derive(Debug, Serialize)]
struct SendMessagePayload {
    chat_id: i64,
    text: String,
    parse_mode: &'static str,
}

impl TelegramNotifier {
    /// Build a notifier for the given bot token.
    pub fn new(token: &str) -> DeliveryResult<Self> {
        Self::with_base_url(token, TELEGRAM_API_BASE)
    }

    /// Build a notifier against a custom API base URL (used by tests).
    pub fn with_base_url(token: &str, base_url: &str) -> DeliveryResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| DeliveryError::ClientBuilder {
                source: Box::new(source),
            })?;
        let send_url = format!(
            "{}/bot{token}/sendMessage",
            base_url.trim_end_matches('/')
        );
        Ok(Self {
            client,
            send_url: Arc::from(send_url),
        })
    }
}

impl Notifier for TelegramNotifier {
    fn send_message(&self, group: GroupId, text: &str) -> BoxFuture<'static, DeliveryResult<()>> {
        let client = self.client.clone();
        let url = Arc::clone(&self.send_url);
        let payload = SendMessagePayload {
            chat_id: group.0,
            text: text.to_owned(),
            parse_mode: "Markdown",
        };

        Box::pin(async move {
            let response = client
                .post(url.as_ref())
                .json(&payload)
                .send()
                .await
                .map_err(|source| DeliveryError::transport(group, source))?;

            if !response.status().is_success() {
                return Err(DeliveryError::Rejected {
                    group,
                    status: response.status().as_u16(),
                });
            }

            Ok(())
        })
    }
}
