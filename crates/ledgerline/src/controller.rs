//! Session establishment and termination.

use std::fmt;
use std::sync::Arc;

use ledgerline_api::{Backend, LoginResponse, SignupRequest};
use ledgerline_bus::{EventBus, SessionEvent};
use ledgerline_store::{Session, SessionStore};
use tracing::{debug, info, warn};

use crate::ClientError;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// The user chose to log out.
    UserRequested,
    /// The inactivity countdown expired.
    Inactivity,
    /// The page is being torn down.
    Unload,
}

impl fmt::Display for LogoutReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserRequested => write!(f, "user requested"),
            Self::Inactivity => write!(f, "inactivity"),
            Self::Unload => write!(f, "unload"),
        }
    }
}

/// The one component that writes session state.
///
/// Login and signup talk to the server through the [`Backend`] seam;
/// the outcome lands in the [`SessionStore`] and is announced on the
/// [`EventBus`]. Everything else in the crate reacts to those
/// announcements rather than calling the controller back.
pub struct SessionController<B: Backend> {
    store: Arc<SessionStore>,
    bus: Arc<EventBus>,
    backend: Arc<B>,
}

// Manual impl: `B` itself need not be `Clone`, only the `Arc`s are.
impl<B: Backend> Clone for SessionController<B> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            bus: Arc::clone(&self.bus),
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: Backend> SessionController<B> {
    pub fn new(store: Arc<SessionStore>, bus: Arc<EventBus>, backend: Arc<B>) -> Self {
        Self {
            store,
            bus,
            backend,
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Authenticates with credentials and establishes the session.
    ///
    /// # Errors
    /// Surfaces [`ApiError::Rejected`](ledgerline_api::ApiError) with
    /// the server's message on bad credentials, so callers can show it.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let response = self.backend.login(email, password, false).await?;
        self.on_login_success(response, false)
    }

    /// Establishes a demo session. The server ignores credentials in
    /// demo mode and seeds throwaway data.
    pub async fn login_demo(&self) -> Result<Session, ClientError> {
        let response = self.backend.login("demo", "", true).await?;
        self.on_login_success(response, true)
    }

    /// Registers a new account. No session is created; the caller logs
    /// in afterwards with the same credentials.
    pub async fn signup(&self, request: &SignupRequest) -> Result<(), ClientError> {
        self.backend.signup(request).await?;
        info!("signup accepted");
        Ok(())
    }

    /// Records a freshly granted session and announces it.
    ///
    /// Split out from [`login`](Self::login) so an embedding
    /// application that runs its own auth flow can still hand the
    /// result to the lifecycle machinery.
    pub fn on_login_success(
        &self,
        response: LoginResponse,
        is_demo: bool,
    ) -> Result<Session, ClientError> {
        let session = Session::new(response.session_id, response.name, is_demo);
        self.store.set_session(&session)?;
        info!(is_demo, "session established");
        self.bus.publish(SessionEvent::SessionStarted);
        Ok(session)
    }

    /// Ends the current session: notifies the server (best effort),
    /// clears local state, and announces the end.
    ///
    /// Idempotent: a second call, or a call with no session, does
    /// nothing. This is what makes the expiry/manual-logout race safe:
    /// whichever path runs second finds the store empty and returns.
    pub fn terminate_session(&self, reason: LogoutReason) -> Result<(), ClientError> {
        let Some(session) = self.store.session() else {
            debug!(%reason, "terminate with no session; ignoring");
            return Ok(());
        };

        // Server notify is fire-and-forget; local teardown never waits
        // on the network and never fails because of it.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let backend = Arc::clone(&self.backend);
            let token = session.token.clone();
            handle.spawn(async move {
                if let Err(e) = backend.logout(&token).await {
                    warn!(error = %e, "server logout failed");
                }
            });
        } else {
            debug!("no runtime; skipping server logout notify");
        }

        self.store.clear()?;
        info!(%reason, "session terminated");
        self.bus.publish(SessionEvent::SessionEnded);
        Ok(())
    }
}
