//! Error types for topicsync-github.

use thiserror::Error;

/// All errors that can arise from GitHub API calls.
#[derive(Debug, Error)]
pub enum GithubError {
    /// The API answered with a non-success status.
    #[error("GitHub API returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Connection, TLS, or timeout failure before a response arrived.
    #[error("GitHub request failed: {0}")]
    Transport(#[from] Box<ureq::Transport>),

    /// The response body was not the JSON we expected.
    #[error("failed to decode GitHub response: {0}")]
    Decode(#[source] std::io::Error),
}
