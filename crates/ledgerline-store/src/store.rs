//! The shared session store: typed access over a storage backend.

use tracing::debug;

use crate::{Session, Storage, StoreError};

/// Storage key for the session token. Key names match the web client
/// this subsystem collaborates with, so both can share a backend.
const KEY_TOKEN: &str = "session_id";
/// Storage key for the display name.
const KEY_NAME: &str = "user_name";
/// Storage key for the demo flag; present (as `"true"`) only for demo
/// sessions.
const KEY_DEMO: &str = "is_demo_user";

/// The single source of session state shared across the page.
///
/// Only the session controller (and the unload guard, on teardown)
/// writes here; every other component treats the store as read-only
/// and re-derives its view of "logged in" on each relevant event,
/// never caching it across an event boundary.
pub struct SessionStore {
    storage: Box<dyn Storage>,
}

impl SessionStore {
    /// Creates a store over the given backend.
    pub fn new(storage: impl Storage) -> Self {
        Self {
            storage: Box::new(storage),
        }
    }

    /// Convenience constructor for an in-memory store.
    pub fn in_memory() -> Self {
        Self::new(crate::MemoryStorage::new())
    }

    /// Returns the current session, or `None` when logged out.
    ///
    /// A session exists if and only if a non-empty token is stored;
    /// a missing display name degrades to an empty string rather than
    /// invalidating the session.
    pub fn session(&self) -> Option<Session> {
        let token = self.storage.get(KEY_TOKEN)?;
        if token.is_empty() {
            return None;
        }
        Some(Session {
            token,
            display_name: self.storage.get(KEY_NAME).unwrap_or_default(),
            is_demo: self.storage.get(KEY_DEMO).as_deref() == Some("true"),
        })
    }

    /// Whether a session currently exists.
    pub fn is_logged_in(&self) -> bool {
        self.session().is_some()
    }

    /// Stores a session, replacing any previous one.
    ///
    /// # Errors
    /// Returns [`StoreError::EmptyToken`] if the token is empty, and
    /// propagates backend failures.
    pub fn set_session(&self, session: &Session) -> Result<(), StoreError> {
        if session.token.is_empty() {
            return Err(StoreError::EmptyToken);
        }
        self.storage.set(KEY_TOKEN, &session.token)?;
        self.storage.set(KEY_NAME, &session.display_name)?;
        if session.is_demo {
            self.storage.set(KEY_DEMO, "true")?;
        } else {
            self.storage.remove(KEY_DEMO)?;
        }
        debug!(is_demo = session.is_demo, "session stored");
        Ok(())
    }

    /// Removes all session keys. Safe to call when already logged out.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.storage.remove(KEY_TOKEN)?;
        self.storage.remove(KEY_NAME)?;
        self.storage.remove(KEY_DEMO)?;
        debug!("session cleared");
        Ok(())
    }
}
