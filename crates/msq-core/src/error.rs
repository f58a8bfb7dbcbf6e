//! Failure taxonomy for a suggestion submission.
//!
//! Every variant ends up as a single message string in
//! [`FormState::error`](crate::FormState::error). The `Display` text is what
//! the user sees.

/// Why a suggestion request did not produce a [`SuggestionResult`](crate::SuggestionResult).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SuggestError {
    /// The request could not be sent or the response could not be read.
    #[error("Failed to fetch: {0}")]
    Network(String),

    /// No response within the configured timeout.
    #[error("Failed to fetch: request timed out after {0}s")]
    Timeout(u64),

    /// The server answered outside the 2xx range. The body is not inspected.
    #[error("Error! Status: {0}")]
    Status(u16),

    /// The body was not JSON, or not the expected shape.
    #[error("Could not parse response: {0}")]
    Decode(String),

    /// The configured endpoint cannot be turned into a request URI.
    #[error("Invalid endpoint: {0}")]
    Endpoint(String),
}

impl SuggestError {
    /// HTTP status code, for failures that carry one.
    pub fn status(&self) -> Option<u16> {
        match self {
            SuggestError::Status(code) => Some(*code),
            _ => None,
        }
    }
}
