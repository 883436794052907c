use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;
use watcher_logging::{watch_error, watch_info};

use crate::api::describe;

pub const DEFAULT_TELEGRAM_API: &str = "https://api.telegram.org";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("messaging API answered with HTTP status {0}")]
    Http(u16),
    #[error("messaging API rejected the message: {0}")]
    Rejected(String),
    #[error("could not encode message: {0}")]
    Encode(String),
}

/// Outbound "deliver text to the recipient" primitive.
#[async_trait::async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), SendError>;
}

/// Delivers notifications; a failed delivery is logged and never propagated.
#[derive(Clone)]
pub struct Notifier {
    sender: Arc<dyn MessageSender>,
}

impl Notifier {
    pub fn new(sender: Arc<dyn MessageSender>) -> Self {
        Self { sender }
    }

    pub async fn notify(&self, text: &str) {
        watch_info!("sending notification: {}", text);
        match self.sender.send(text).await {
            Ok(()) => watch_info!("notification sent"),
            Err(err) => watch_error!("failed to send notification: {}", err),
        }
    }
}

#[derive(Clone)]
pub struct TelegramSettings {
    pub api_base: Url,
    pub bot_token: String,
    pub chat_id: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl TelegramSettings {
    pub fn new(api_base: Url, bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            api_base,
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl fmt::Debug for TelegramSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramSettings")
            .field("api_base", &self.api_base.as_str())
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct BotReply {
    ok: bool,
    description: Option<String>,
}

/// Sends plain text through the Telegram Bot API `sendMessage` method.
#[derive(Debug, Clone)]
pub struct TelegramSender {
    settings: TelegramSettings,
    client: reqwest::Client,
}

impl TelegramSender {
    pub fn new(settings: TelegramSettings) -> Result<Self, SendError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| SendError::Transport(describe(&err)))?;
        Ok(Self { settings, client })
    }

    // Bot tokens contain ':', so `Url::join` would read them as a scheme.
    fn method_url(&self) -> Result<Url, SendError> {
        let mut url = self.settings.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| SendError::Transport("messaging API url cannot be a base".to_string()))?
            .pop_if_empty()
            .push(&format!("bot{}", self.settings.bot_token))
            .push("sendMessage");
        Ok(url)
    }
}

#[async_trait::async_trait]
impl MessageSender for TelegramSender {
    async fn send(&self, text: &str) -> Result<(), SendError> {
        let payload = serde_json::to_vec(&SendMessage {
            chat_id: &self.settings.chat_id,
            text,
        })
        .map_err(|err| SendError::Encode(err.to_string()))?;

        let response = self
            .client
            .post(self.method_url()?)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            // The URL embeds the bot token.
            .map_err(|err| SendError::Transport(describe(&err.without_url())))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| SendError::Transport(describe(&err.without_url())))?;
        let reply = serde_json::from_slice::<BotReply>(&body).ok();

        match reply {
            Some(BotReply { ok: true, .. }) => Ok(()),
            Some(BotReply {
                description: Some(description),
                ..
            }) => Err(SendError::Rejected(description)),
            None if status.is_success() => Ok(()),
            _ => Err(SendError::Http(status.as_u16())),
        }
    }
}
