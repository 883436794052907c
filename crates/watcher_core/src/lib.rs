//! Watcher core: pure poll-evaluate state machine, response validation and
//! notification wording.
mod effect;
mod format;
mod msg;
mod state;
mod types;
mod update;
mod validate;

pub use effect::Effect;
pub use format::{
    failure_message, format_status, undetermined_status_message, verdict, FormatError,
    VERDICT_APPROVED, VERDICT_REJECTED, VERDICT_REVIEWING,
};
pub use msg::Msg;
pub use state::{ReviewState, WatcherState};
pub use types::{ApiError, CycleFailure, PollCursor, StatusCode, TrackedItem};
pub use update::update;
pub use validate::{validate, ValidationError, HOMEWORKS_KEY, NAME_KEY, STATUS_KEY};
