use std::sync::{mpsc, Arc};
use std::thread;

use shortly_core::RequestId;
use shortly_logging::{shortly_debug, shortly_error, shortly_info};
use tokio::runtime::Runtime;

use crate::shorten::{CleanUriShortener, ShortenSettings, Shortener};
use crate::{EngineError, EngineEvent, FailureKind, ShortenError};

enum EngineCommand {
    Shorten { request_id: RequestId, url: String },
}

/// Runs shortening requests on a background tokio runtime and reports each
/// outcome as an [`EngineEvent`]. Dropping the handle stops the worker; any
/// request still in flight is abandoned.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(
        settings: ShortenSettings,
        event_tx: mpsc::Sender<EngineEvent>,
    ) -> Result<Self, EngineError> {
        let shortener = CleanUriShortener::new(settings)?;
        Self::with_shortener(Arc::new(shortener), event_tx)
    }

    pub fn with_shortener(
        shortener: Arc<dyn Shortener>,
        event_tx: mpsc::Sender<EngineEvent>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("shortly-engine")
            .enable_all()
            .build()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                handle_command(&runtime, shortener.clone(), command, event_tx.clone());
            }
            shortly_debug!("Engine command channel closed; shutting down runtime");
        });

        Ok(Self { cmd_tx })
    }

    pub fn shorten(&self, request_id: RequestId, url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Shorten {
            request_id,
            url: url.into(),
        });
    }
}

/// Every accepted command produces exactly one event, even when the
/// shortener panics.
fn handle_command(
    runtime: &Runtime,
    shortener: Arc<dyn Shortener>,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Shorten { request_id, url } => {
            shortly_info!("Shortening request_id={} url_len={}", request_id, url.len());
            let task = runtime.spawn(async move { shortener.shorten(&url).await });
            runtime.spawn(async move {
                let result = match task.await {
                    Ok(result) => result,
                    Err(err) => {
                        shortly_error!("Shorten task {} failed: {}", request_id, err);
                        Err(ShortenError::new(FailureKind::Aborted, err.to_string()))
                    }
                };
                let _ = event_tx.send(EngineEvent::ShortenCompleted { request_id, result });
            });
        }
    }
}
