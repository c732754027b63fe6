use crate::{LinkId, LinkRecord, RequestId};

/// Side effects requested by `update`; the shell executes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send `url` to the shortening service, tagged with `request_id`.
    Shorten { request_id: RequestId, url: String },
    /// Append `record` to the durable collection.
    AppendLink(LinkRecord),
    /// Remove the durable record at `index`.
    RemoveLinkAt(usize),
    /// Write `text` to the clipboard on behalf of `link_id`.
    CopyToClipboard { link_id: LinkId, text: String },
    /// Out-of-band notification, separate from the inline error text.
    Alert { message: String },
}
