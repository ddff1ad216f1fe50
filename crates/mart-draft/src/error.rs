use mart_types::{FormField, TypeError};
use thiserror::Error;

/// Errors from drafting operations.
///
/// Every variant is meant to be shown to the user once; none of them are
/// retried automatically.
#[derive(Debug, Error)]
pub enum DraftError {
    /// No API key is configured, so drafting is disabled.
    #[error("generative drafting is disabled: no API key configured")]
    MissingCredential,

    /// The form lacks a field the suggestion is based on.
    #[error("fill in the {0} first")]
    MissingInput(FormField),

    /// The image is not a usable data URI.
    #[error("invalid image: {0}")]
    InvalidImage(#[from] TypeError),

    /// The request did not reach the service or timed out.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("service returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The service answered with something we could not read.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The request was abandoned because its form was closed.
    #[error("request cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for DraftError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::MalformedResponse(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

pub type DraftResult<T> = Result<T, DraftError>;
