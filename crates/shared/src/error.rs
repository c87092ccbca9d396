use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    EmptyAddress,
    AddressNotFound,
    MalformedResponse,
    Transport,
    Status,
    NotGeocoded,
    Display,
    Internal,
}

impl ErrorKind {
    /// Whether retrying the same request could plausibly succeed.
    pub fn is_transient(self) -> bool {
        matches!(self, ErrorKind::Transport | ErrorKind::Status)
    }
}

/// Error summary handed to event subscribers, detached from the source error
/// type so it can be cloned and broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{kind:?}: {message}")]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorReport {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
