//! Shortly engine: shortening client, durable storage and request execution.
mod engine;
mod shorten;
mod storage;
mod store;
mod types;

pub use engine::EngineHandle;
pub use shorten::{CleanUriShortener, ShortenSettings, Shortener, DEFAULT_ENDPOINT};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use store::{LinkStore, LINKS_KEY};
pub use types::{EngineError, EngineEvent, FailureKind, ShortenError};
