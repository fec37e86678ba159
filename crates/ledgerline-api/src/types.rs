//! Wire types for the tracker's session endpoints.
//!
//! The JSON shapes mirror what the server actually speaks; field
//! renames below exist because the signup endpoint uses camelCase
//! while login does not.

use serde::{Deserialize, Serialize};

/// Body of `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Demo-mode marker. The server only grants a demo session when
    /// `email == "demo"`, the password is empty, and this is `true`.
    pub demo: bool,
}

impl LoginRequest {
    /// A regular credential login.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            demo: false,
        }
    }

    /// The fixed demo-mode login.
    pub fn demo() -> Self {
        Self {
            email: "demo".into(),
            password: String::new(),
            demo: true,
        }
    }
}

/// Successful response of `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The session token; carried in the `Session-ID` header afterwards.
    pub session_id: String,
    /// The user's display name.
    pub name: String,
}

/// Body of `POST /signup`. The server validates field presence, email
/// shape, and password confirmation; the client just ships the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// The `{message}` body every non-2xx response (and some 2xx ones)
/// carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
}
