//! Periodic keep-alive sends.

use std::sync::Arc;
use std::time::Duration;

use ledgerline_api::Backend;
use ledgerline_store::SessionStore;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// Default gap between keep-alive sends. Comfortably inside the
/// server's session TTL so one dropped send cannot expire the session.
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Tells the server the session is still live while the page is open.
///
/// Owns at most one sender task. [`start`](Self::start) while running
/// replaces the task rather than stacking a second sender. Failures
/// are logged and swallowed: the server's TTL is the authority on
/// expiry, and a flaky network must not log the user out locally.
pub struct HeartbeatService<B: Backend> {
    backend: Arc<B>,
    store: Arc<SessionStore>,
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl<B: Backend> HeartbeatService<B> {
    pub fn new(backend: Arc<B>, store: Arc<SessionStore>, interval: Duration) -> Self {
        Self {
            backend,
            store,
            interval,
            task: None,
        }
    }

    /// Starts the sender task. The first send happens immediately.
    pub fn start(&mut self) {
        self.stop();
        let backend = Arc::clone(&self.backend);
        let store = Arc::clone(&self.store);
        let interval = self.interval;
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                // Re-read the token each send; the session may have
                // been replaced since the task started.
                match store.session() {
                    Some(session) => {
                        if let Err(e) = backend.heartbeat(&session.token).await {
                            warn!(error = %e, "heartbeat failed");
                        } else {
                            debug!("heartbeat sent");
                        }
                    }
                    None => debug!("no session; skipping heartbeat"),
                }
            }
        }));
    }

    /// Stops the sender task. Safe to call when not running.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Whether a sender task is live.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl<B: Backend> Drop for HeartbeatService<B> {
    fn drop(&mut self) {
        self.stop();
    }
}
