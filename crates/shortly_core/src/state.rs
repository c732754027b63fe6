use std::fmt;
use std::time::{Duration, Instant};

use crate::view_model::{AppViewModel, LinkRowView};
use crate::{LinkCollection, LinkRecord};

/// Session-scoped identity of a record in the live list.
pub type LinkId = u64;
/// Tag of one shortening request.
pub type RequestId = u64;

/// How long a row shows "Copied!" after a successful copy.
pub const COPY_FEEDBACK_WINDOW: Duration = Duration::from_millis(2000);

pub const COPY_FAILED_MESSAGE: &str = "Failed to copy";

const SUBMIT_LABEL_IDLE: &str = "Shorten It!";
const SUBMIT_LABEL_BUSY: &str = "Shortening...";
const COPY_LABEL: &str = "Copy";
const COPIED_LABEL: &str = "Copied!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    /// Submit with an empty or whitespace-only input.
    EmptyInput,
    /// Any failure reported by the shortening service.
    ShorteningFailed,
}

impl SubmitError {
    pub fn message(&self) -> &'static str {
        match self {
            SubmitError::EmptyInput => "Please add a link",
            SubmitError::ShorteningFailed => "Failed to shorten the URL. Please try again.",
        }
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting {
        request_id: RequestId,
        url: String,
    },
    Error(SubmitError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyFeedback {
    pub link_id: LinkId,
    pub expires_at: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    input: String,
    submission: SubmissionState,
    links: LinkCollection,
    /// Parallel to `links`: the identity of each record, same order.
    link_ids: Vec<LinkId>,
    copy_feedback: Option<CopyFeedback>,
    next_link_id: LinkId,
    next_request_id: RequestId,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            input: String::new(),
            submission: SubmissionState::Idle,
            links: LinkCollection::new(),
            link_ids: Vec::new(),
            copy_feedback: None,
            next_link_id: 1,
            next_request_id: 1,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let submitting = self.is_submitting();
        let rows = self
            .link_ids
            .iter()
            .zip(&self.links)
            .enumerate()
            .map(|(position, (&link_id, record))| {
                let copied = self
                    .copy_feedback
                    .is_some_and(|feedback| feedback.link_id == link_id);
                LinkRowView {
                    link_id,
                    position,
                    original: record.original.clone(),
                    short: record.short.clone(),
                    copied,
                    copy_label: if copied { COPIED_LABEL } else { COPY_LABEL },
                }
            })
            .collect();

        AppViewModel {
            input: self.input.clone(),
            submit_label: if submitting {
                SUBMIT_LABEL_BUSY
            } else {
                SUBMIT_LABEL_IDLE
            },
            submit_enabled: !submitting,
            error: self.last_error().map(|err| err.message().to_string()),
            link_count: self.links.len(),
            rows,
            dirty: self.dirty,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn submission(&self) -> &SubmissionState {
        &self.submission
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.submission, SubmissionState::Submitting { .. })
    }

    pub fn last_error(&self) -> Option<SubmitError> {
        match self.submission {
            SubmissionState::Error(err) => Some(err),
            _ => None,
        }
    }

    pub fn copy_feedback(&self) -> Option<CopyFeedback> {
        self.copy_feedback
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Snapshot of the live list in display order, without identities.
    pub fn collection(&self) -> LinkCollection {
        self.links.clone()
    }

    pub fn link_id_at(&self, position: usize) -> Option<LinkId> {
        self.link_ids.get(position).copied()
    }

    pub fn position_of(&self, link_id: LinkId) -> Option<usize> {
        self.link_ids.iter().position(|&id| id == link_id)
    }

    pub fn record(&self, link_id: LinkId) -> Option<&LinkRecord> {
        self.position_of(link_id)
            .and_then(|position| self.links.get(position))
    }

    /// Returns whether a re-render is due and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn in_flight_request(&self) -> Option<RequestId> {
        match self.submission {
            SubmissionState::Submitting { request_id, .. } => Some(request_id),
            _ => None,
        }
    }

    pub(crate) fn begin_submission(&mut self, url: String) -> RequestId {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.submission = SubmissionState::Submitting { request_id, url };
        self.mark_dirty();
        request_id
    }

    /// Appends the in-flight URL with its short form and returns to idle.
    /// Returns the appended record.
    pub(crate) fn complete_submission(&mut self, short_url: String) -> Option<LinkRecord> {
        let previous = std::mem::take(&mut self.submission);
        self.mark_dirty();
        let SubmissionState::Submitting { url, .. } = previous else {
            return None;
        };
        let record = LinkRecord::new(url, short_url);
        self.push_link(record.clone());
        self.input.clear();
        Some(record)
    }

    pub(crate) fn fail_submission(&mut self, err: SubmitError) {
        self.submission = SubmissionState::Error(err);
        self.mark_dirty();
    }

    pub(crate) fn restore_links(&mut self, collection: LinkCollection) {
        let link_ids = (0..collection.len())
            .map(|_| self.allocate_link_id())
            .collect();
        self.link_ids = link_ids;
        self.links = collection;
        self.copy_feedback = None;
        self.mark_dirty();
    }

    /// Removes the record and any feedback attached to it. Returns the
    /// position it held.
    pub(crate) fn remove_link(&mut self, link_id: LinkId) -> Option<usize> {
        let position = self.position_of(link_id)?;
        self.links = self.links.removed_at(position);
        self.link_ids.remove(position);
        if self
            .copy_feedback
            .is_some_and(|feedback| feedback.link_id == link_id)
        {
            self.copy_feedback = None;
        }
        self.mark_dirty();
        Some(position)
    }

    pub(crate) fn show_copy_feedback(&mut self, link_id: LinkId, copied_at: Instant) {
        self.copy_feedback = Some(CopyFeedback {
            link_id,
            expires_at: copied_at + COPY_FEEDBACK_WINDOW,
        });
        self.mark_dirty();
    }

    pub(crate) fn expire_copy_feedback(&mut self, now: Instant) {
        if self
            .copy_feedback
            .is_some_and(|feedback| now >= feedback.expires_at)
        {
            self.copy_feedback = None;
            self.mark_dirty();
        }
    }

    fn push_link(&mut self, record: LinkRecord) {
        let id = self.allocate_link_id();
        self.links = self.links.appended(record);
        self.link_ids.push(id);
    }

    fn allocate_link_id(&mut self) -> LinkId {
        let id = self.next_link_id;
        self.next_link_id += 1;
        id
    }
}
