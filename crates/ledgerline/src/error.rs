//! Unified error type for the session lifecycle.

use ledgerline_api::ApiError;
use ledgerline_store::StoreError;

/// Top-level error that wraps all crate-specific errors.
///
/// Callers of this meta-crate deal with this single type instead of
/// importing errors from each sub-crate. The `#[from]` attribute on
/// each variant auto-generates `From` impls, so the `?` operator
/// converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A server communication error (login, signup, heartbeat).
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A session storage error (read, persist, clear).
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_api_error() {
        let err = ApiError::Rejected {
            status: 401,
            message: "Invalid credentials".into(),
        };
        let client_err: ClientError = err.into();
        assert!(matches!(client_err, ClientError::Api(_)));
        assert!(client_err.to_string().contains("Invalid credentials"));
    }

    #[test]
    fn test_from_store_error() {
        let err = StoreError::EmptyToken;
        let client_err: ClientError = err.into();
        assert!(matches!(client_err, ClientError::Store(_)));
    }
}
