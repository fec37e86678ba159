//! The backend seam between the session lifecycle and the server.

use std::future::Future;

use crate::{ApiError, LoginResponse, SignupRequest};

/// Server operations the session lifecycle depends on.
///
/// [`HttpBackend`](crate::HttpBackend) is the real implementation;
/// tests provide stubs that record calls instead of sending them.
///
/// Futures are `Send` so implementations can be driven from spawned
/// tasks.
pub trait Backend: Send + Sync + 'static {
    /// Authenticates and returns a fresh session.
    fn login(
        &self,
        email: &str,
        password: &str,
        demo: bool,
    ) -> impl Future<Output = Result<LoginResponse, ApiError>> + Send;

    /// Registers a new account. The server creates no session for it;
    /// the caller logs in afterwards.
    fn signup(&self, request: &SignupRequest)
        -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Ends the session server-side.
    fn logout(&self, token: &str) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Refreshes the server-side session TTL.
    fn heartbeat(&self, token: &str) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Best-effort logout that returns without waiting for the server.
    ///
    /// Returns `true` when the send was handed off, `false` when this
    /// backend has no way to send without waiting. Never fails: the
    /// caller has already decided to tear down locally.
    fn logout_detached(&self, _token: &str) -> bool {
        false
    }

    /// Blocking logout used when a detached send is unavailable during
    /// teardown. Must only be called from outside an async context.
    fn logout_keepalive(&self, _token: &str) {}
}
