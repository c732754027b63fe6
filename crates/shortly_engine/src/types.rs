use std::fmt;

use shortly_core::RequestId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ShortenCompleted {
        request_id: RequestId,
        result: Result<String, ShortenError>,
    },
}

/// Failure from the shortening service. Callers treat every kind the same;
/// the kind is kept for logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ShortenError {
    pub kind: FailureKind,
    pub message: String,
}

impl ShortenError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidEndpoint,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    MalformedResponse,
    Network,
    /// The request task died before producing a result.
    Aborted,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidEndpoint => write!(f, "invalid endpoint"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::MalformedResponse => write!(f, "malformed response"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Aborted => write!(f, "request aborted"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("http client setup failed: {0}")]
    Client(#[from] ShortenError),
}
