//! Typed error enums for the domain layers.
//!
//! None of these reach the screens directly: API errors collapse to a
//! failure reply, session errors to a failed outcome, and validation
//! errors become alert messages.

/// Why a remote call did not succeed. Logged, then collapsed to failure.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network, DNS, TLS or timeout failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body was not the JSON envelope we expect.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The server answered but `status` was not `"success"`.
    #[error("server rejected request (status: {status})")]
    Rejected { status: String },
}

/// Preconditions checked before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("no user is logged in")]
    NotLoggedIn,

    #[error("no monitoring device is linked to this account")]
    NoDevice,
}

/// Client-side form validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter both username and password")]
    MissingCredentials,

    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Please enter both baby name and age")]
    MissingBabyDetails,

    #[error("Please enter a valid YouTube URL")]
    InvalidYoutubeUrl,
}
