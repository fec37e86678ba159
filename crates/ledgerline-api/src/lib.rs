//! HTTP collaborator client for Ledgerline.
//!
//! The tracker's server owns authentication and session TTLs; this
//! crate is the client's view of it:
//!
//! - **Wire types** ([`LoginRequest`], [`LoginResponse`], …): the JSON
//!   bodies the endpoints speak.
//! - **Backend seam** ([`Backend`] trait): the session lifecycle
//!   machinery talks to this trait, not to HTTP, so tests substitute a
//!   stub and the demo substitutes a real server.
//! - **HTTP implementation** ([`HttpBackend`]): `reqwest`-based, one
//!   pooled client for the process lifetime.
//!
//! The session token travels in the `Session-ID` header; the
//! beacon-style teardown path puts it in the `session_id` query
//! parameter instead, because that transport cannot set headers.

#![allow(async_fn_in_trait)]

mod backend;
mod error;
mod http;
mod types;

pub use backend::Backend;
pub use error::ApiError;
pub use http::{ApiConfig, HttpBackend, SESSION_HEADER};
pub use types::{ErrorBody, LoginRequest, LoginResponse, SignupRequest};
