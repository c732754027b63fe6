use crate::LinkId;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub input: String,
    pub submit_label: &'static str,
    pub submit_enabled: bool,
    pub error: Option<String>,
    pub link_count: usize,
    pub rows: Vec<LinkRowView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRowView {
    pub link_id: LinkId,
    /// Zero-based position in the list.
    pub position: usize,
    pub original: String,
    pub short: String,
    pub copied: bool,
    pub copy_label: &'static str,
}
