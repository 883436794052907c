use watcher_logging::{watch_error, watch_info};

use crate::{
    failure_message, format_status, undetermined_status_message, validate, CycleFailure, Effect,
    FormatError, Msg, TrackedItem, WatcherState,
};

/// Pure update function: applies the outcome of one poll to state and returns
/// the notifications to deliver.
pub fn update(mut state: WatcherState, msg: Msg) -> (WatcherState, Vec<Effect>) {
    let effects = match msg {
        Msg::ResponseReceived { doc, polled_at } => match validate(&doc) {
            Ok(item) => {
                let effects = evaluate(&mut state, &item);
                // A success re-arms the failure alert.
                if state.review_mut().clear_error().is_some() {
                    watch_info!("polling recovered");
                }
                state.advance_cursor(polled_at);
                effects
            }
            Err(err) => fail(&mut state, err.into()),
        },
        Msg::FetchFailed(err) => fail(&mut state, err.into()),
    };

    (state, effects)
}

fn evaluate(state: &mut WatcherState, item: &TrackedItem) -> Vec<Effect> {
    let previous = state.review().last_status().cloned();
    if previous.as_ref() == Some(&item.status) {
        watch_info!("status of \"{}\" unchanged: {}", item.name, item.status);
        return Vec::new();
    }

    watch_info!(
        "status of \"{}\" changed: {} -> {}",
        item.name,
        previous.as_ref().map_or("none", |status| status.as_str()),
        item.status
    );
    state.review_mut().set_status(item.status.clone());

    match format_status(item) {
        Ok(text) => vec![Effect::Notify { text }],
        Err(FormatError::UnknownStatus(raw)) => {
            watch_error!("unknown status {:?} for \"{}\"", raw, item.name);
            if state.announces_unknown_status() {
                vec![Effect::Notify {
                    text: undetermined_status_message(item),
                }]
            } else {
                Vec::new()
            }
        }
    }
}

fn fail(state: &mut WatcherState, failure: CycleFailure) -> Vec<Effect> {
    let text = failure_message(&failure.to_string());
    watch_error!("{}", text);

    if state.review().last_error() == Some(text.as_str()) {
        watch_info!("failure already reported; alert suppressed");
        return Vec::new();
    }
    state.review_mut().set_error(text.clone());
    vec![Effect::Notify { text }]
}
