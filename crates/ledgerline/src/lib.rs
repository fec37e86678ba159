//! # Ledgerline
//!
//! Session lifecycle for the Ledgerline personal-finance client.
//!
//! The pieces, from the outside in:
//!
//! - [`SessionController`]: login, signup, demo mode, and termination;
//!   the only writer of session state.
//! - [`SessionShell`]: the task that owns the inactivity monitor and
//!   heartbeat service, reacting to user activity, bus events, and
//!   timer expiry. Drive it through a [`ShellHandle`].
//! - [`UnloadGuard`]: last-chance teardown when the host goes away.
//!
//! Sub-crates supply the parts: `ledgerline-monitor` (the
//! warning/countdown state machine), `ledgerline-bus` (cross-component
//! signals), `ledgerline-store` (persisted session state), and
//! `ledgerline-api` (the HTTP client and the [`Backend`] seam).
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ledgerline::{SessionController, SessionShell, ShellConfig};
//! use ledgerline_api::{ApiConfig, HttpBackend};
//! use ledgerline_bus::EventBus;
//! use ledgerline_store::SessionStore;
//!
//! # async fn demo() -> Result<(), ledgerline::ClientError> {
//! let backend = Arc::new(HttpBackend::new(ApiConfig::default())?);
//! let controller = SessionController::new(
//!     Arc::new(SessionStore::in_memory()),
//!     Arc::new(EventBus::new()),
//!     backend,
//! );
//! let (shell, _task) = SessionShell::spawn(controller.clone(), ShellConfig::default());
//!
//! controller.login("user@example.com", "secret").await?;
//! shell.activity(); // call on every qualifying input
//! # Ok(())
//! # }
//! ```

mod controller;
mod error;
mod heartbeat;
mod shell;
mod unload;

pub use controller::{LogoutReason, SessionController};
pub use error::ClientError;
pub use heartbeat::{DEFAULT_HEARTBEAT_INTERVAL, HeartbeatService};
pub use shell::{SessionShell, ShellConfig, ShellHandle};
pub use unload::UnloadGuard;

pub use ledgerline_api::Backend;
