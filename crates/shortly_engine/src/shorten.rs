use std::time::Duration;

use futures_util::StreamExt;
use serde::Deserialize;
use shortly_logging::shortly_debug;
use url::Url;

use crate::{FailureKind, ShortenError};

pub const DEFAULT_ENDPOINT: &str = "https://cleanuri.com/api/v1/shorten";

#[derive(Debug, Clone)]
pub struct ShortenSettings {
    pub endpoint: String,
    /// `None` keeps the transport default.
    pub connect_timeout: Option<Duration>,
    /// `None` keeps the transport default.
    pub request_timeout: Option<Duration>,
    pub max_bytes: u64,
}

impl Default for ShortenSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: None,
            request_timeout: None,
            max_bytes: 64 * 1024,
        }
    }
}

/// Turns one long URL into a short one with a single outbound request.
#[async_trait::async_trait]
pub trait Shortener: Send + Sync {
    async fn shorten(&self, raw_url: &str) -> Result<String, ShortenError>;
}

#[derive(Debug, Deserialize)]
struct ShortenResponse {
    result_url: String,
}

/// Client for cleanuri-style services: `GET <endpoint>?url=<target>` answering
/// with `{"result_url": "..."}`.
#[derive(Debug, Clone)]
pub struct CleanUriShortener {
    endpoint: Url,
    max_bytes: u64,
    client: reqwest::Client,
}

impl CleanUriShortener {
    pub fn new(settings: ShortenSettings) -> Result<Self, ShortenError> {
        let endpoint = Url::parse(&settings.endpoint)
            .map_err(|err| ShortenError::new(FailureKind::InvalidEndpoint, err.to_string()))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ShortenError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            endpoint,
            max_bytes: settings.max_bytes,
            client,
        })
    }

    fn request_url(&self, raw_url: &str) -> Url {
        let mut target = self.endpoint.clone();
        target.query_pairs_mut().append_pair("url", raw_url);
        target
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, ShortenError> {
        if let Some(content_len) = response.content_length() {
            if content_len > self.max_bytes {
                return Err(self.too_large(Some(content_len)));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > self.max_bytes {
                return Err(self.too_large(Some(next_len)));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }

    fn too_large(&self, actual: Option<u64>) -> ShortenError {
        ShortenError::new(
            FailureKind::TooLarge {
                max_bytes: self.max_bytes,
                actual,
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl Shortener for CleanUriShortener {
    async fn shorten(&self, raw_url: &str) -> Result<String, ShortenError> {
        let target = self.request_url(raw_url);
        shortly_debug!("GET {} url_len={}", self.endpoint, raw_url.len());

        let response = self
            .client
            .get(target)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShortenError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = self.read_body(response).await?;
        let parsed: ShortenResponse = serde_json::from_slice(&body)
            .map_err(|err| ShortenError::new(FailureKind::MalformedResponse, err.to_string()))?;

        let short_url = parsed.result_url.trim();
        if short_url.is_empty() {
            return Err(ShortenError::new(
                FailureKind::MalformedResponse,
                "empty result_url",
            ));
        }
        Ok(short_url.to_string())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ShortenError {
    if err.is_timeout() {
        return ShortenError::new(FailureKind::Timeout, err.to_string());
    }
    ShortenError::new(FailureKind::Network, err.to_string())
}
