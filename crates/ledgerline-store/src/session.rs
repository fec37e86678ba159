//! The session type: the client's record of an authenticated user.

/// An authenticated session, identified by a server-issued token.
///
/// Created from a successful login response and held until logout or
/// forced expiry. A `Session` exists if and only if a non-empty token
/// is present in the [`SessionStore`](crate::SessionStore); absence of
/// a token means "logged out" for every component that queries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The server-issued session token, sent with every request.
    pub token: String,

    /// The user's display name, shown by the rendering layer.
    pub display_name: String,

    /// Whether this is a demo session. Demo sessions behave like real
    /// ones in the lifecycle machinery; the flag only gates mutating
    /// UI surfaces.
    pub is_demo: bool,
}

impl Session {
    /// Creates a session. The token is taken as-is; emptiness is
    /// checked at store time, not here.
    pub fn new(
        token: impl Into<String>,
        display_name: impl Into<String>,
        is_demo: bool,
    ) -> Self {
        Self {
            token: token.into(),
            display_name: display_name.into(),
            is_demo,
        }
    }
}
