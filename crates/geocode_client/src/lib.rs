use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use shared::{
    domain::GeocodeResult,
    error::{ErrorKind, ErrorReport},
};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

mod response;

pub use response::parse_geocode_response;

pub const DEFAULT_GEOCODE_ENDPOINT: &str = "https://barikoi.xyz/v2/api/search/rupantor/geocode";

/// Longest response body kept in a `Status` error.
const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("address text is empty")]
    EmptyAddress,
    #[error("invalid geocode endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        source: url::ParseError,
    },
    #[error("geocode request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("geocode service answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("address not found: {0}")]
    AddressNotFound(String),
    #[error("malformed geocode response: {0}")]
    MalformedResponse(String),
}

impl GeocodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GeocodeError::EmptyAddress => ErrorKind::EmptyAddress,
            GeocodeError::InvalidEndpoint { .. } => ErrorKind::Internal,
            GeocodeError::Transport(_) => ErrorKind::Transport,
            GeocodeError::Status { .. } => ErrorKind::Status,
            GeocodeError::AddressNotFound(_) => ErrorKind::AddressNotFound,
            GeocodeError::MalformedResponse(_) => ErrorKind::MalformedResponse,
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport::new(self.kind(), self.to_string())
    }
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<GeocodeResult, GeocodeError>;
}

#[derive(Debug, Clone)]
pub struct GeocodeConfig {
    pub endpoint: String,
    pub api_key: String,
    pub timeout: Option<Duration>,
}

impl GeocodeConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_GEOCODE_ENDPOINT.to_string(),
            api_key: api_key.into(),
            timeout: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct GeocodeRequest<'a> {
    q: &'a str,
}

/// Geocoder backed by the Barikoi "rupantor" HTTP endpoint.
pub struct BarikoiClient {
    http: Client,
    endpoint: Url,
    api_key: String,
    timeout: Option<Duration>,
}

impl BarikoiClient {
    pub fn new(config: GeocodeConfig) -> Result<Self, GeocodeError> {
        let endpoint =
            Url::parse(&config.endpoint).map_err(|source| GeocodeError::InvalidEndpoint {
                endpoint: config.endpoint.clone(),
                source,
            })?;
        Ok(Self {
            http: Client::new(),
            endpoint,
            api_key: config.api_key,
            timeout: config.timeout,
        })
    }

    fn request_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("api_key", &self.api_key);
        url
    }
}

#[async_trait]
impl Geocoder for BarikoiClient {
    async fn geocode(&self, address: &str) -> Result<GeocodeResult, GeocodeError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }

        debug!(endpoint = %self.endpoint, "geocode: sending request");
        let mut request = self
            .http
            .post(self.request_url())
            .json(&GeocodeRequest { q: address });
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "geocode: service rejected request");
            return Err(GeocodeError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let bytes = response.bytes().await?;
        let payload: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|err| GeocodeError::MalformedResponse(err.to_string()))?;
        let result = parse_geocode_response(address, payload)?;
        info!(
            origin = %result.origin,
            confidence = ?result.confidence,
            "geocode: address resolved"
        );
        Ok(result)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
