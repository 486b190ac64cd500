//! Error types for portrait-to-talking.

use thiserror::Error;

/// Errors surfaced to callers of the client facade and the CLI.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The provider reported a failed generation. Displays the provider's
    /// message verbatim.
    #[error("{0}")]
    Failed(String),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures inside the EchoMimic adapter.
///
/// Never leaves the adapter; its message becomes the error of a failed
/// [`GenerationResult`](crate::ports::GenerationResult).
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request did not complete within the configured timeout.
    #[error("EchoMimic request timeout")]
    Timeout,

    /// Transport failure, non-2xx status, or an undecodable body.
    #[error("EchoMimic request failed: {0}")]
    Request(reqwest::Error),

    /// Anything else that went wrong while handling the call.
    #[error("EchoMimic generation failed: {0}")]
    Generation(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(err)
        }
    }
}
