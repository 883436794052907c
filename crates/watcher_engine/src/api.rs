use std::error::Error as _;
use std::fmt;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use url::Url;
use watcher_core::{ApiError, PollCursor};
use watcher_logging::watch_debug;

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

#[derive(Clone)]
pub struct ApiSettings {
    pub endpoint: Url,
    pub token: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl ApiSettings {
    pub fn new(endpoint: Url, token: impl Into<String>) -> Self {
        Self {
            endpoint,
            token: token.into(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 1024 * 1024,
        }
    }
}

// Keeps the token out of logs.
impl fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiSettings")
            .field("endpoint", &self.endpoint.as_str())
            .field("token", &"<redacted>")
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("max_bytes", &self.max_bytes)
            .finish()
    }
}

/// Source of the review status document.
#[async_trait::async_trait]
pub trait StatusApi: Send + Sync {
    /// Fetches the statuses changed since `since`. No retries.
    async fn fetch(&self, since: PollCursor) -> Result<Value, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestStatusApi {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestStatusApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(map_reqwest_error)?;
        Ok(Self { settings, client })
    }

    fn request_url(&self, since: PollCursor) -> Url {
        let mut url = self.settings.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("from_date", &since.as_unix_seconds().to_string());
        url
    }
}

#[async_trait::async_trait]
impl StatusApi for ReqwestStatusApi {
    async fn fetch(&self, since: PollCursor) -> Result<Value, ApiError> {
        let url = self.request_url(since);

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("OAuth {}", self.settings.token))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ApiError::Http(status.as_u16()));
        }

        let max_bytes = self.settings.max_bytes;
        if response.content_length().is_some_and(|len| len > max_bytes) {
            return Err(ApiError::TooLarge { max_bytes });
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            if body.len() as u64 + chunk.len() as u64 > max_bytes {
                return Err(ApiError::TooLarge { max_bytes });
            }
            body.extend_from_slice(&chunk);
        }
        watch_debug!("received {} bytes", body.len());

        serde_json::from_slice(&body).map_err(|err| ApiError::Decode(err.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    // The URL carries the cursor; keeping it would make every alert unique.
    let err = err.without_url();
    if err.is_timeout() {
        return ApiError::Timeout(describe(&err));
    }
    ApiError::Transport(describe(&err))
}

/// reqwest's top-level message omits the cause ("error sending request"),
/// so the source chain is appended.
pub(crate) fn describe(err: &reqwest::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
