use bytes::Bytes;
use formrelay_core::Msg;
use thiserror::Error;

use crate::persist::PersistError;

/// Why a submission produced no result. `Display` is the bare message shown
/// after the handler's prefix.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Non-success status; `message` is the best description the body offered.
    #[error("{message}")]
    RequestFailed { status: u16, message: String },
    #[error("{0}")]
    MalformedResponse(String),
    #[error("{0}")]
    NetworkFailure(String),
    #[error("invalid form action: {0}")]
    InvalidAction(String),
    #[error("could not save download: {0}")]
    Persist(#[from] PersistError),
}

impl SubmitError {
    pub fn status(&self) -> Option<u16> {
        match self {
            SubmitError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build http client: {0}")]
    Client(#[source] SubmitError),
}

/// A file body returned by the analyze endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Suggested name from `Content-Disposition`, already percent-decoded.
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyzeResponse {
    File(Download),
    /// The endpoint answered with JSON: never a file, whatever the status.
    Message(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A submission settled; feed the message back into `update`.
    Settled(Msg),
}
