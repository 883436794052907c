use crate::{PollCursor, StatusCode};

/// What the watcher remembers between cycles.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReviewState {
    last_status: Option<StatusCode>,
    last_error: Option<String>,
}

impl ReviewState {
    pub fn last_status(&self) -> Option<&StatusCode> {
        self.last_status.as_ref()
    }

    /// Text of the most recent failure alert, until a cycle succeeds.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub(crate) fn set_status(&mut self, status: StatusCode) {
        self.last_status = Some(status);
    }

    pub(crate) fn set_error(&mut self, message: String) {
        self.last_error = Some(message);
    }

    pub(crate) fn clear_error(&mut self) -> Option<String> {
        self.last_error.take()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WatcherState {
    cursor: PollCursor,
    review: ReviewState,
    announce_unknown_status: bool,
}

impl WatcherState {
    pub fn new(cursor: PollCursor) -> Self {
        Self {
            cursor,
            review: ReviewState::default(),
            announce_unknown_status: false,
        }
    }

    /// Also notify when the API reports a status outside the verdict table.
    pub fn with_unknown_status_alerts(mut self, enabled: bool) -> Self {
        self.announce_unknown_status = enabled;
        self
    }

    pub fn cursor(&self) -> PollCursor {
        self.cursor
    }

    pub fn review(&self) -> &ReviewState {
        &self.review
    }

    pub(crate) fn review_mut(&mut self) -> &mut ReviewState {
        &mut self.review
    }

    pub(crate) fn announces_unknown_status(&self) -> bool {
        self.announce_unknown_status
    }

    pub(crate) fn advance_cursor(&mut self, to: PollCursor) {
        self.cursor = to;
    }
}
