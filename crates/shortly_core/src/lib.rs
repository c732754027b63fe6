//! Shortly core: pure link-list state machine and view-model helpers.
mod effect;
mod links;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use links::{LinkCollection, LinkRecord};
pub use msg::Msg;
pub use state::{
    AppState, CopyFeedback, LinkId, RequestId, SubmissionState, SubmitError,
    COPY_FAILED_MESSAGE, COPY_FEEDBACK_WINDOW,
};
pub use update::update;
pub use view_model::{AppViewModel, LinkRowView};
