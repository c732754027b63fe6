use std::time::Instant;

use crate::{LinkCollection, LinkId, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the URL input box.
    InputChanged(String),
    /// User asked to shorten the current input.
    SubmitClicked,
    /// Restore the collection read from durable storage at start-up.
    RestoreLinks(LinkCollection),
    /// Shortening service returned a short URL.
    ShortenSucceeded {
        request_id: RequestId,
        short_url: String,
    },
    /// Shortening service failed in any way.
    ShortenFailed { request_id: RequestId },
    /// User clicked Copy on a row.
    CopyClicked { link_id: LinkId },
    /// Clipboard write finished.
    CopySucceeded { link_id: LinkId, at: Instant },
    /// Clipboard write failed.
    CopyFailed { link_id: LinkId, reason: String },
    /// User clicked Delete on a row.
    DeleteClicked { link_id: LinkId },
    /// Clock tick used to expire copy feedback.
    Tick { now: Instant },
}
