use std::sync::Once;

use shortly_core::{
    update, AppState, Effect, LinkCollection, LinkRecord, Msg, SubmissionState, SubmitError,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(shortly_logging::initialize_for_tests);
}

fn submit_url(state: AppState, input: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::InputChanged(input.to_string()));
    update(state, Msg::SubmitClicked)
}

fn shorten_request(effects: &[Effect]) -> (u64, String) {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Shorten { request_id, url } => Some((*request_id, url.clone())),
            _ => None,
        })
        .expect("shorten effect")
}

#[test]
fn empty_and_whitespace_input_fail_validation_without_network() {
    init_logging();
    for input in ["", " ", "\t", "  \n  "] {
        let (mut next, effects) = submit_url(AppState::new(), input);

        assert!(effects.is_empty(), "input {input:?} produced effects");
        assert_eq!(next.last_error(), Some(SubmitError::EmptyInput));
        assert_eq!(next.view().error.as_deref(), Some("Please add a link"));
        assert!(!next.is_submitting());
        assert!(next.consume_dirty());
    }
}

#[test]
fn non_empty_input_enters_submitting_and_requests_shortening() {
    init_logging();
    let (state, effects) = submit_url(AppState::new(), "example.com");

    assert_eq!(
        effects,
        vec![Effect::Shorten {
            request_id: 1,
            url: "example.com".to_string(),
        }]
    );
    assert!(state.is_submitting());
    let view = state.view();
    assert!(!view.submit_enabled);
    assert_eq!(view.submit_label, "Shortening...");
    assert_eq!(view.error, None);
}

#[test]
fn surrounding_whitespace_is_kept_as_typed() {
    init_logging();
    let (state, effects) = submit_url(AppState::new(), "  example.com ");
    let (request_id, url) = shorten_request(&effects);
    assert_eq!(url, "  example.com ");

    let (state, effects) = update(
        state,
        Msg::ShortenSucceeded {
            request_id,
            short_url: "https://cleanuri.com/abc123".to_string(),
        },
    );

    let record = LinkRecord::new("  example.com ", "https://cleanuri.com/abc123");
    assert_eq!(effects, vec![Effect::AppendLink(record.clone())]);
    assert_eq!(state.collection(), LinkCollection::from(vec![record]));
}

#[test]
fn success_appends_record_clears_input_and_persists() {
    init_logging();
    let (state, effects) = submit_url(AppState::new(), "example.com");
    let (request_id, _) = shorten_request(&effects);

    let (state, effects) = update(
        state,
        Msg::ShortenSucceeded {
            request_id,
            short_url: "https://cleanuri.com/abc123".to_string(),
        },
    );

    let record = LinkRecord::new("example.com", "https://cleanuri.com/abc123");
    assert_eq!(effects, vec![Effect::AppendLink(record.clone())]);
    assert_eq!(state.collection(), LinkCollection::from(vec![record]));
    assert_eq!(state.submission(), &SubmissionState::Idle);
    assert_eq!(state.input(), "");

    let view = state.view();
    assert!(view.submit_enabled);
    assert_eq!(view.submit_label, "Shorten It!");
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].original, "example.com");
    assert_eq!(view.rows[0].short, "https://cleanuri.com/abc123");
}

#[test]
fn failure_keeps_collection_and_shows_generic_message() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::RestoreLinks(LinkCollection::from(vec![LinkRecord::new(
            "a.example.com",
            "https://cleanuri.com/a",
        )])),
    );
    let before = state.collection();

    let (state, effects) = submit_url(state, "b.example.com");
    let (request_id, _) = shorten_request(&effects);
    let (state, effects) = update(state, Msg::ShortenFailed { request_id });

    assert!(effects.is_empty());
    assert_eq!(state.collection(), before);
    assert_eq!(
        state.submission(),
        &SubmissionState::Error(SubmitError::ShorteningFailed)
    );
    assert_eq!(
        state.view().error.as_deref(),
        Some("Failed to shorten the URL. Please try again.")
    );
    // Input is kept so the user can retry.
    assert_eq!(state.input(), "b.example.com");
}

#[test]
fn error_state_does_not_block_resubmission() {
    init_logging();
    let (state, _) = submit_url(AppState::new(), "");
    assert_eq!(state.last_error(), Some(SubmitError::EmptyInput));

    let (state, effects) = submit_url(state, "example.com");
    assert_eq!(shorten_request(&effects).1, "example.com");
    assert!(state.is_submitting());
    assert_eq!(state.last_error(), None);
}

#[test]
fn second_submit_while_in_flight_is_rejected() {
    init_logging();
    let (state, effects) = submit_url(AppState::new(), "first.example.com");
    assert_eq!(effects.len(), 1);

    let (state, effects) = submit_url(state, "second.example.com");
    assert!(effects.is_empty());
    assert!(state.is_submitting());
    assert_eq!(
        state.submission(),
        &SubmissionState::Submitting {
            request_id: 1,
            url: "first.example.com".to_string(),
        }
    );
}

#[test]
fn stale_results_are_ignored() {
    init_logging();
    let (state, effects) = submit_url(AppState::new(), "example.com");
    let (request_id, _) = shorten_request(&effects);

    let (state, effects) = update(
        state,
        Msg::ShortenSucceeded {
            request_id: request_id + 10,
            short_url: "https://cleanuri.com/zzz".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert!(state.is_submitting());
    assert_eq!(state.link_count(), 0);

    let (state, _) = update(
        state,
        Msg::ShortenFailed {
            request_id: request_id + 10,
        },
    );
    assert!(state.is_submitting());
}

#[test]
fn duplicate_submissions_produce_duplicate_records() {
    init_logging();
    let mut state = AppState::new();
    for short in ["https://cleanuri.com/one", "https://cleanuri.com/two"] {
        let (next, effects) = submit_url(state, "example.com");
        let (request_id, _) = shorten_request(&effects);
        let (next, _) = update(
            next,
            Msg::ShortenSucceeded {
                request_id,
                short_url: short.to_string(),
            },
        );
        state = next;
    }

    let view = state.view();
    assert_eq!(view.link_count, 2);
    assert_eq!(view.rows[0].original, view.rows[1].original);
    assert_ne!(view.rows[0].link_id, view.rows[1].link_id);
}
