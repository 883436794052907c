use std::sync::Once;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use watcher_core::{
    failure_message, update, ApiError, Effect, Msg, PollCursor, StatusCode, ValidationError,
    WatcherState,
};

const T0: i64 = 1_700_000_000;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(watcher_logging::initialize_for_tests);
}

fn receive(state: WatcherState, doc: Value) -> (WatcherState, Vec<Effect>) {
    update(
        state,
        Msg::ResponseReceived {
            doc,
            polled_at: PollCursor::from_unix_seconds(T0 + 600),
        },
    )
}

fn notified(effects: &[Effect]) -> Vec<&str> {
    effects
        .iter()
        .map(|Effect::Notify { text }| text.as_str())
        .collect()
}

#[test]
fn empty_list_is_reported_once() {
    init_logging();
    let state = WatcherState::new(PollCursor::from_unix_seconds(T0));

    let (state, first) = receive(state, json!({ "homeworks": [] }));
    let (state, second) = receive(state, json!({ "homeworks": [] }));

    let expected = failure_message(&ValidationError::EmptyList.to_string());
    assert_eq!(notified(&first), vec![expected.as_str()]);
    assert!(second.is_empty());
    assert_eq!(state.review().last_error(), Some(expected.as_str()));
}

#[test]
fn distinct_failure_is_reported_again() {
    init_logging();
    let state = WatcherState::new(PollCursor::from_unix_seconds(T0));

    let (state, first) = update(state, Msg::FetchFailed(ApiError::Http(503)));
    let (state, second) = update(state, Msg::FetchFailed(ApiError::Http(503)));
    let (state, third) = update(
        state,
        Msg::FetchFailed(ApiError::Transport("connection refused".into())),
    );

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
    assert_eq!(third.len(), 1);
    assert!(notified(&third)[0].contains("connection refused"));
    assert!(state.review().last_error().unwrap().contains("connection refused"));
}

#[test]
fn malformed_responses_leave_status_and_cursor_alone() {
    init_logging();
    let start = PollCursor::from_unix_seconds(T0);
    let state = WatcherState::new(start);
    let (known, _) = receive(
        state,
        json!({ "homeworks": [{ "homework_name": "hw1", "status": "reviewing" }] }),
    );
    let known_cursor = known.cursor();

    let cases = [
        (json!(["not", "an", "object"]), ValidationError::NotAnObject),
        (json!({ "current_date": 1 }), ValidationError::MissingField("homeworks")),
        (json!({ "homeworks": [] }), ValidationError::EmptyList),
        (
            json!({ "homeworks": [{ "status": "approved" }] }),
            ValidationError::MissingField("homework_name"),
        ),
        (
            json!({ "homeworks": [{ "homework_name": "hw1" }] }),
            ValidationError::MissingField("status"),
        ),
    ];

    for (doc, expected) in cases {
        let (next, effects) = update(
            known.clone(),
            Msg::ResponseReceived {
                doc,
                polled_at: PollCursor::from_unix_seconds(T0 + 9_999),
            },
        );
        let text = failure_message(&expected.to_string());
        assert_eq!(notified(&effects), vec![text.as_str()]);
        assert_eq!(next.review().last_status(), Some(&StatusCode::Reviewing));
        assert_eq!(next.cursor(), known_cursor);
    }
}

#[test]
fn success_rearms_the_failure_alert() {
    init_logging();
    let state = WatcherState::new(PollCursor::from_unix_seconds(T0));

    let (state, first) = update(state, Msg::FetchFailed(ApiError::Http(500)));
    let (state, _) = receive(
        state,
        json!({ "homeworks": [{ "homework_name": "hw1", "status": "reviewing" }] }),
    );
    assert_eq!(state.review().last_error(), None);

    let (_, again) = update(state, Msg::FetchFailed(ApiError::Http(500)));
    assert_eq!(first, again);
}

#[test]
fn failure_does_not_advance_cursor() {
    init_logging();
    let start = PollCursor::from_unix_seconds(T0);
    let (state, _) = update(
        WatcherState::new(start),
        Msg::FetchFailed(ApiError::Timeout("30s elapsed".into())),
    );
    assert_eq!(state.cursor(), start);
}
