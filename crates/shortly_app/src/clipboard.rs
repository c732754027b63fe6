use shortly_logging::shortly_debug;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("clipboard unavailable: {0}")]
pub struct ClipboardError(String);

/// Write-only text clipboard.
pub trait ClipboardWriter {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard via `arboard`. The handle is opened on first use and kept
/// so X11 selections stay owned while the app runs.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardWriter for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => {
                shortly_debug!("Opening system clipboard");
                arboard::Clipboard::new().map_err(|err| ClipboardError(err.to_string()))?
            }
        };
        let clipboard = self.inner.insert(clipboard);
        clipboard
            .set_text(text.to_owned())
            .map_err(|err| ClipboardError(err.to_string()))
    }
}
