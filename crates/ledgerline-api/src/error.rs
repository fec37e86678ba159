//! Error types for the collaborator client.

/// Errors from talking to the tracker's server.
///
/// Callers split these into two buckets: authentication actions
/// (login, signup) surface them to the user, while liveness sends
/// (heartbeat, logout) log and discard them; a missed heartbeat is
/// never a reason to end the session locally.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request could not be sent or the connection failed.
    #[error("http request failed: {0}")]
    Http(String),

    /// The request timed out.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The server answered with a non-2xx status. `message` is the
    /// server's `{message}` body when present, suitable for showing to
    /// the user on authentication failures.
    #[error("server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// A 2xx response carried a body the client could not parse.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Converts a `reqwest::Error` into an [`ApiError`], keeping the
/// timeout/other distinction.
pub(crate) fn from_reqwest(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout(e.to_string())
    } else {
        ApiError::Http(e.to_string())
    }
}
