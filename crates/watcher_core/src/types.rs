use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::ValidationError;

/// "Poll for changes since this instant", in Unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PollCursor(i64);

impl PollCursor {
    pub fn from_unix_seconds(secs: i64) -> Self {
        Self(secs)
    }

    /// Cursor for the first cycle: one poll interval before `now`.
    pub fn initial(now: i64, interval: Duration) -> Self {
        let back = i64::try_from(interval.as_secs()).unwrap_or(i64::MAX);
        Self(now.saturating_sub(back))
    }

    pub fn as_unix_seconds(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PollCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StatusCode {
    Approved,
    Reviewing,
    Rejected,
    /// Anything else the API reports; the raw value is kept for diagnostics.
    Unknown(String),
}

impl StatusCode {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "approved" => StatusCode::Approved,
            "reviewing" => StatusCode::Reviewing,
            "rejected" => StatusCode::Rejected,
            other => StatusCode::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StatusCode::Approved => "approved",
            StatusCode::Reviewing => "reviewing",
            StatusCode::Rejected => "rejected",
            StatusCode::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedItem {
    pub name: String,
    pub status: StatusCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("endpoint answered with HTTP status {0}")]
    Http(u16),
    #[error("response body is not valid JSON: {0}")]
    Decode(String),
    #[error("response body exceeds {max_bytes} bytes")]
    TooLarge { max_bytes: u64 },
}

impl ApiError {
    /// Connection-level faults, as opposed to protocol faults.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Timeout(_))
    }
}

/// Why a cycle failed. Its `Display` text is what the failure alert embeds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CycleFailure {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
