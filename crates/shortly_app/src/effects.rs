use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use shortly_core::{Effect, LinkCollection, Msg};
use shortly_engine::{EngineEvent, EngineHandle, KeyValueStorage, LinkStore};
use shortly_logging::{shortly_debug, shortly_info, shortly_warn};

use crate::app::LoopEvent;
use crate::clipboard::ClipboardWriter;

/// Executes effects emitted by `update`. Results that feed back into the
/// state machine are posted to the main loop, never applied in place.
///
/// `links` is the last collection handed to or returned by the store; link
/// effects apply to it in the same order the state machine applied them.
pub struct EffectRunner<S, C> {
    engine: EngineHandle,
    store: LinkStore<S>,
    links: LinkCollection,
    clipboard: C,
    events: mpsc::Sender<LoopEvent>,
}

impl<S: KeyValueStorage, C: ClipboardWriter> EffectRunner<S, C> {
    pub fn new(
        engine: EngineHandle,
        store: LinkStore<S>,
        clipboard: C,
        events: mpsc::Sender<LoopEvent>,
    ) -> Self {
        Self {
            engine,
            store,
            links: LinkCollection::new(),
            clipboard,
            events,
        }
    }

    /// Reads the stored collection and tracks it for later link effects.
    pub fn load_links(&mut self) -> LinkCollection {
        self.links = self.store.load();
        self.links.clone()
    }

    #[cfg(test)]
    pub fn store(&self) -> &LinkStore<S> {
        &self.store
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Shorten { request_id, url } => {
                    shortly_debug!("Shorten request_id={} url_len={}", request_id, url.len());
                    self.engine.shorten(request_id, url);
                }
                Effect::AppendLink(record) => {
                    self.links = self.store.append(record, &self.links);
                    shortly_debug!("Stored links now {}", self.links.len());
                }
                Effect::RemoveLinkAt(index) => {
                    self.links = self.store.remove_at(index, &self.links);
                    shortly_debug!("Stored links now {}", self.links.len());
                }
                Effect::CopyToClipboard { link_id, text } => {
                    let msg = match self.clipboard.write_text(&text) {
                        Ok(()) => Msg::CopySucceeded {
                            link_id,
                            at: Instant::now(),
                        },
                        Err(err) => {
                            shortly_warn!("Copy for link {} failed: {}", link_id, err);
                            Msg::CopyFailed {
                                link_id,
                                reason: err.to_string(),
                            }
                        }
                    };
                    let _ = self.events.send(LoopEvent::Msg(msg));
                }
                Effect::Alert { message } => {
                    let _ = self.events.send(LoopEvent::Alert(message));
                }
            }
        }
    }
}

pub fn msg_from_engine(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ShortenCompleted { request_id, result } => match result {
            Ok(short_url) => {
                shortly_info!("Request {} shortened to {}", request_id, short_url);
                Msg::ShortenSucceeded {
                    request_id,
                    short_url,
                }
            }
            Err(err) => {
                shortly_warn!("Request {} failed: {}", request_id, err);
                Msg::ShortenFailed { request_id }
            }
        },
    }
}

/// Relays engine completions onto the main loop until either side hangs up.
pub fn spawn_engine_forwarder(
    engine_rx: mpsc::Receiver<EngineEvent>,
    events: mpsc::Sender<LoopEvent>,
) {
    thread::spawn(move || {
        for event in engine_rx {
            if events.send(LoopEvent::Msg(msg_from_engine(event))).is_err() {
                break;
            }
        }
    });
}
