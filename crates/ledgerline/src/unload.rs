//! Last-chance teardown when the page goes away.

use std::sync::Arc;

use ledgerline_api::Backend;
use ledgerline_bus::{EventBus, SessionEvent};
use ledgerline_store::SessionStore;
use tracing::{debug, warn};

use crate::SessionController;

/// Fires once when the host is being torn down (tab close, navigation
/// away, process exit).
///
/// Teardown gets no retries and no awaiting: the server notify is
/// handed off beacon-style if possible and blocked on briefly if not,
/// and local state is cleared either way. A session the server still
/// believes in will lapse via its TTL; local state must not outlive
/// the page.
pub struct UnloadGuard<B: Backend> {
    store: Arc<SessionStore>,
    bus: Arc<EventBus>,
    backend: Arc<B>,
}

impl<B: Backend> UnloadGuard<B> {
    pub fn new(controller: &SessionController<B>) -> Self {
        Self {
            store: Arc::clone(controller.store()),
            bus: Arc::clone(controller.bus()),
            backend: Arc::clone(controller.backend()),
        }
    }

    /// Performs the teardown. Safe to call more than once; later calls
    /// find no session and only re-clear.
    pub fn fire(&self) {
        if let Some(session) = self.store.session() {
            if self.backend.logout_detached(&session.token) {
                debug!("unload logout handed off");
            } else {
                self.backend.logout_keepalive(&session.token);
                debug!("unload logout sent blocking");
            }
        }

        // Local cleanup is unconditional; it must succeed even when
        // the server was never told.
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "unload cleanup failed");
        }
        self.bus.publish(SessionEvent::SessionEnded);
    }
}
