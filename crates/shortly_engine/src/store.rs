use serde::{Deserialize, Serialize};
use shortly_core::{LinkCollection, LinkRecord};
use shortly_logging::{shortly_debug, shortly_error, shortly_info, shortly_warn};

use crate::KeyValueStorage;

/// Storage key holding the whole serialized collection.
pub const LINKS_KEY: &str = "shortenedLinks";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedLink {
    original: String,
    short: String,
}

/// Owns the persisted copy of the link list. Storage failures are logged and
/// never returned: callers always get a usable collection back.
#[derive(Debug)]
pub struct LinkStore<S> {
    storage: S,
}

impl<S: KeyValueStorage> LinkStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Reads the stored collection; empty when missing or unparsable.
    pub fn load(&self) -> LinkCollection {
        let content = match self.storage.read(LINKS_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => {
                shortly_debug!("No stored links under {:?}", LINKS_KEY);
                return LinkCollection::new();
            }
            Err(err) => {
                shortly_warn!("Failed to read stored links: {}", err);
                return LinkCollection::new();
            }
        };

        let persisted: Vec<PersistedLink> = match serde_json::from_str(&content) {
            Ok(links) => links,
            Err(err) => {
                shortly_warn!("Failed to parse stored links, starting empty: {}", err);
                return LinkCollection::new();
            }
        };

        let collection: LinkCollection = persisted
            .into_iter()
            .map(|link| LinkRecord::new(link.original, link.short))
            .collect();
        shortly_info!("Loaded {} stored links", collection.len());
        collection
    }

    /// Overwrites storage with `collection`.
    pub fn save(&self, collection: &LinkCollection) {
        let persisted: Vec<PersistedLink> = collection
            .iter()
            .map(|record| PersistedLink {
                original: record.original.clone(),
                short: record.short.clone(),
            })
            .collect();

        let content = match serde_json::to_string(&persisted) {
            Ok(text) => text,
            Err(err) => {
                shortly_error!("Failed to serialize links: {}", err);
                return;
            }
        };

        if let Err(err) = self.storage.write(LINKS_KEY, &content) {
            shortly_error!("Failed to write {} links: {}", collection.len(), err);
        }
    }

    /// Returns `current` with `record` appended, persisted before returning.
    pub fn append(&self, record: LinkRecord, current: &LinkCollection) -> LinkCollection {
        let next = current.appended(record);
        self.save(&next);
        next
    }

    /// Returns `current` without the element at `index`. Out of range is a
    /// no-op and writes nothing.
    pub fn remove_at(&self, index: usize, current: &LinkCollection) -> LinkCollection {
        if index >= current.len() {
            shortly_debug!(
                "remove_at({}) ignored for {} links",
                index,
                current.len()
            );
            return current.clone();
        }
        let next = current.removed_at(index);
        self.save(&next);
        next
    }
}
