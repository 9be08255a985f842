//! Telegram Bot API notifier.
//!
//! Posts each payload to one chat through `sendMessage`. Bot API replies are
//! decoded into [`NotifyError::Api`] or, for HTTP 429, into
//! [`NotifyError::RateLimited`].

use std::time::Duration;

use crate::traits::{Notification, Notifier, NotifyError};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Bot API channel bound to a single chat.
#[derive(Debug)]
pub struct TelegramNotifier {
    bot_token: String,
    chat_id: String,
    parse_mode: Option<String>,
    api_base: String,
    client: reqwest::Client,
}

/// Resolve a `${VAR}` token reference against the environment. Any other
/// value is taken literally.
fn resolve_token(raw: String) -> Result<String, NotifyError> {
    let Some(reference) = raw.strip_prefix("${") else {
        return Ok(raw);
    };
    let var = reference
        .strip_suffix('}')
        .ok_or_else(|| NotifyError::Config(format!("Malformed token reference: {raw}")))?;
    std::env::var(var)
        .map_err(|_| NotifyError::Config(format!("Token variable '{var}' is not set")))
}

impl TelegramNotifier {
    /// Build a notifier for one chat.
    ///
    /// `bot_token` may be a `${VAR}` reference. An empty token or chat id is
    /// a [`NotifyError::Config`]. An empty `parse_mode` sends plain text.
    pub fn from_config(
        bot_token: String,
        chat_id: String,
        parse_mode: Option<String>,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let bot_token = resolve_token(bot_token)?;
        if bot_token.is_empty() {
            return Err(NotifyError::Config("Telegram bot token must not be empty".to_string()));
        }
        if chat_id.trim().is_empty() {
            return Err(NotifyError::Config("Telegram chat id must not be empty".to_string()));
        }

        Ok(Self {
            bot_token,
            chat_id,
            parse_mode: parse_mode.filter(|m| !m.is_empty()),
            api_base: DEFAULT_API_BASE.to_string(),
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }

    /// Point the notifier at a different Bot API server.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }
}

/// Fallback wait when a 429 reply carries no `retry_after`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 30;

/// Map a Bot API reply to the delivery outcome.
///
/// Replies carry `{"ok": bool, "description"?, "parameters"?: {"retry_after"}}`.
fn decode_reply(status: reqwest::StatusCode, reply: &serde_json::Value) -> Result<(), NotifyError> {
    if reply["ok"].as_bool() == Some(true) {
        return Ok(());
    }
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = reply["parameters"]["retry_after"]
            .as_u64()
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        return Err(NotifyError::RateLimited { retry_after_secs });
    }
    let description = reply["description"].as_str().unwrap_or("no description");
    Err(NotifyError::Api(format!("Telegram replied {status}: {description}")))
}

/// `sendMessage` request body.
#[derive(serde::Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'a str>,
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text: &notification.body,
            parse_mode: self.parse_mode.as_deref(),
        };

        tracing::debug!(
            chat_id = %self.chat_id,
            part = notification.part,
            parts = notification.parts,
            chars = notification.body.chars().count(),
            "Posting to Telegram"
        );

        let response = self.client.post(&url).json(&payload).send().await?;
        let status = response.status();
        let reply: serde_json::Value = response.json().await?;
        decode_reply(status, &reply)?;

        tracing::info!(chat_id = %self.chat_id, part = notification.part, "Telegram message posted");
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "telegram"
    }
}
