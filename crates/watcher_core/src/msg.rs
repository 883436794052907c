use serde_json::Value;

use crate::{ApiError, PollCursor};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The status endpoint answered with a decoded document.
    ResponseReceived { doc: Value, polled_at: PollCursor },
    /// The request failed before any document was available.
    FetchFailed(ApiError),
}
