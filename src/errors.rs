use thiserror::Error;

use crate::session::MIN_TEXT_CHARS;

/// Low-level failure of a single HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("{0}")]
    Network(String),
    #[error("request failed with status code {status}")]
    Status { status: u16, error: Option<String> },
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// What callers of the API client get back. Only the message is ever shown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Backend server is not responding")]
    Unreachable,
    #[error("{0}")]
    Server(String),
    #[error("Failed to {action}: {detail}")]
    Request { action: &'static str, detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select both models")]
    MissingModels,
    #[error("Please enter at least {} characters of text", MIN_TEXT_CHARS)]
    TextTooShort,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("backend is not connected")]
    NotConnected,
    #[error("a battle is already in progress")]
    Busy,
    #[error("unknown model: {0}")]
    UnknownModel(String),
    #[error("unknown sample text: {0}")]
    UnknownSample(u32),
    #[error("no results to rate yet")]
    NoResults,
    #[error("{0} did not produce a summary, rating is disabled")]
    RatingDisabled(String),
    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),
    #[error("both models must succeed before picking a winner")]
    PreferenceUnavailable,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
}
