//! Error types for the store layer.

/// Errors that can occur while persisting session state.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A session must carry a non-empty token; an empty token means
    /// "logged out" to every reader, so storing one would break the
    /// session-exists invariant.
    #[error("session token must not be empty")]
    EmptyToken,

    /// The file-backed storage could not be read or written.
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted key-value map could not be encoded or decoded.
    #[error("storage format error: {0}")]
    Format(#[from] serde_json::Error),
}
