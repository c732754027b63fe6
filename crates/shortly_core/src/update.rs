use crate::{AppState, Effect, Msg, SubmitError, COPY_FAILED_MESSAGE};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::SubmitClicked => submit(&mut state),
        Msg::RestoreLinks(collection) => {
            state.restore_links(collection);
            Vec::new()
        }
        Msg::ShortenSucceeded {
            request_id,
            short_url,
        } => {
            // Results for anything but the in-flight request are stale.
            if state.in_flight_request() != Some(request_id) {
                return (state, Vec::new());
            }
            state
                .complete_submission(short_url)
                .map(Effect::AppendLink)
                .into_iter()
                .collect()
        }
        Msg::ShortenFailed { request_id } => {
            if state.in_flight_request() == Some(request_id) {
                state.fail_submission(SubmitError::ShorteningFailed);
            }
            Vec::new()
        }
        Msg::CopyClicked { link_id } => match state.record(link_id) {
            Some(record) => vec![Effect::CopyToClipboard {
                link_id,
                text: record.short.clone(),
            }],
            None => Vec::new(),
        },
        Msg::CopySucceeded { link_id, at } => {
            // The row may have been deleted while the clipboard write ran.
            if state.position_of(link_id).is_some() {
                state.show_copy_feedback(link_id, at);
            }
            Vec::new()
        }
        Msg::CopyFailed { .. } => vec![Effect::Alert {
            message: COPY_FAILED_MESSAGE.to_string(),
        }],
        Msg::DeleteClicked { link_id } => {
            state
                .remove_link(link_id)
                .map(Effect::RemoveLinkAt)
                .into_iter()
                .collect()
        }
        Msg::Tick { now } => {
            state.expire_copy_feedback(now);
            Vec::new()
        }
    };

    (state, effects)
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    // Single flight: the state machine itself refuses a second request.
    if state.is_submitting() {
        return Vec::new();
    }

    // Whitespace-only input is empty; anything else goes out as typed.
    if state.input().trim().is_empty() {
        state.fail_submission(SubmitError::EmptyInput);
        return Vec::new();
    }

    let url = state.input().to_owned();
    let request_id = state.begin_submission(url.clone());
    vec![Effect::Shorten { request_id, url }]
}
