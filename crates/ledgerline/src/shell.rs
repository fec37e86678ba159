//! The session shell: one task that owns the timers and reacts to
//! everything.
//!
//! The inactivity monitor is plain mutable state, so exactly one task
//! may drive it. The shell is that task: it multiplexes monitor
//! deadlines, commands from the embedding application, and bus events
//! through a single `select!` loop. Everything outside the shell talks
//! to it through a cheap [`ShellHandle`].

use std::sync::Arc;
use std::time::Duration;

use ledgerline_api::Backend;
use ledgerline_bus::SessionEvent;
use ledgerline_monitor::{CountdownState, InactivityMonitor, MonitorConfig, MonitorEvent};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{DEFAULT_HEARTBEAT_INTERVAL, HeartbeatService, LogoutReason, SessionController};

/// Settings for [`SessionShell::spawn`].
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub monitor: MonitorConfig,
    pub heartbeat_interval: Duration,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            monitor: MonitorConfig::default(),
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
        }
    }
}

/// Commands and forwarded events the shell loop consumes.
#[derive(Debug, Clone, Copy)]
enum ShellMsg {
    /// Qualifying user input happened.
    Activity,
    /// The user clicked "stay logged in" on the warning.
    StayLoggedIn,
    /// Explicit logout request.
    Logout(LogoutReason),
    /// Stop the shell task itself.
    Shutdown,
    /// A bus event, forwarded from the synchronous subscriber.
    Bus(SessionEvent),
}

/// Cheap, cloneable handle to a running shell.
///
/// Command sends are infallible from the caller's view: once the shell
/// task is gone there is nothing left to command, so sends to it are
/// silently dropped.
#[derive(Debug, Clone)]
pub struct ShellHandle {
    tx: mpsc::UnboundedSender<ShellMsg>,
    countdown_rx: watch::Receiver<CountdownState>,
    session_rx: watch::Receiver<bool>,
}

impl ShellHandle {
    /// Reports qualifying user activity.
    pub fn activity(&self) {
        let _ = self.tx.send(ShellMsg::Activity);
    }

    /// Dismisses the warning and restarts the inactivity cycle.
    pub fn stay_logged_in(&self) {
        let _ = self.tx.send(ShellMsg::StayLoggedIn);
    }

    /// Requests a logout.
    pub fn logout(&self, reason: LogoutReason) {
        let _ = self.tx.send(ShellMsg::Logout(reason));
    }

    /// Stops the shell task. The session itself is left as-is.
    pub fn shutdown(&self) {
        let _ = self.tx.send(ShellMsg::Shutdown);
    }

    /// Observes the warning countdown (visibility and seconds left).
    pub fn countdown_watch(&self) -> watch::Receiver<CountdownState> {
        self.countdown_rx.clone()
    }

    /// Observes whether a session is active, as seen by the shell.
    pub fn session_watch(&self) -> watch::Receiver<bool> {
        self.session_rx.clone()
    }
}

/// What the `select!` loop picked up on one iteration. Pulled into a
/// value first so the handling code can borrow `self` freely.
enum Step {
    Msg(Option<ShellMsg>),
    Monitor(MonitorEvent),
}

/// The owning task for session-scoped timers.
pub struct SessionShell<B: Backend> {
    controller: SessionController<B>,
    monitor: InactivityMonitor,
    heartbeat: HeartbeatService<B>,
    rx: mpsc::UnboundedReceiver<ShellMsg>,
    session_tx: watch::Sender<bool>,
}

impl<B: Backend> SessionShell<B> {
    /// Spawns the shell task and returns a handle to it.
    ///
    /// The shell subscribes to the controller's bus; a session
    /// established or ended by anyone reaches the shell the same way.
    /// If a session already exists when the shell starts, its timers
    /// are armed immediately.
    pub fn spawn(controller: SessionController<B>, config: ShellConfig) -> (ShellHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();

        // Bridge the synchronous bus into the shell's queue. The bus
        // callback must not block, so it only enqueues.
        let bus_tx = tx.clone();
        let subscriber = controller.bus().subscribe(move |event| {
            let _ = bus_tx.send(ShellMsg::Bus(*event));
        });

        let monitor = InactivityMonitor::new(config.monitor);
        let countdown_rx = monitor.countdown_watch();
        let heartbeat = HeartbeatService::new(
            Arc::clone(controller.backend()),
            Arc::clone(controller.store()),
            config.heartbeat_interval,
        );
        let (session_tx, session_rx) = watch::channel(false);

        let bus = Arc::clone(controller.bus());
        let mut shell = SessionShell {
            controller,
            monitor,
            heartbeat,
            rx,
            session_tx,
        };
        let task = tokio::spawn(async move {
            shell.run().await;
            bus.unsubscribe(subscriber);
        });

        let handle = ShellHandle {
            tx,
            countdown_rx,
            session_rx,
        };
        (handle, task)
    }

    async fn run(&mut self) {
        if self.controller.store().is_logged_in() {
            self.arm();
        }

        loop {
            let step = tokio::select! {
                biased;
                msg = self.rx.recv() => Step::Msg(msg),
                event = self.monitor.wait() => Step::Monitor(event),
            };

            match step {
                Step::Msg(None) | Step::Msg(Some(ShellMsg::Shutdown)) => break,
                Step::Msg(Some(ShellMsg::Activity)) => self.monitor.on_user_activity(),
                Step::Msg(Some(ShellMsg::StayLoggedIn)) => {
                    if self.monitor.is_running() {
                        info!("user chose to stay logged in");
                        self.monitor.reset();
                    }
                }
                Step::Msg(Some(ShellMsg::Logout(reason))) => self.terminate(reason),
                Step::Msg(Some(ShellMsg::Bus(SessionEvent::SessionStarted))) => {
                    // Re-check the store: the event may be stale by the
                    // time it drains from the queue.
                    if self.controller.store().is_logged_in() {
                        self.arm();
                    }
                }
                Step::Msg(Some(ShellMsg::Bus(SessionEvent::SessionEnded))) => self.disarm(),
                Step::Monitor(MonitorEvent::WarningShown { seconds_remaining }) => {
                    info!(seconds_remaining, "inactivity warning shown");
                }
                Step::Monitor(MonitorEvent::Tick { seconds_remaining }) => {
                    debug!(seconds_remaining, "countdown tick");
                }
                Step::Monitor(MonitorEvent::Expired) => {
                    info!("inactivity countdown expired");
                    self.terminate(LogoutReason::Inactivity);
                }
            }
        }

        self.disarm();
    }

    fn arm(&mut self) {
        self.monitor.start();
        self.heartbeat.start();
        self.session_tx.send_replace(true);
        debug!("session timers armed");
    }

    fn disarm(&mut self) {
        self.monitor.stop();
        self.heartbeat.stop();
        self.session_tx.send_replace(false);
        debug!("session timers disarmed");
    }

    fn terminate(&mut self, reason: LogoutReason) {
        // Termination publishes SessionEnded, which comes back through
        // our own queue and disarms the timers. Disarm here too so the
        // monitor cannot fire again before that message drains.
        self.disarm();
        if let Err(e) = self.controller.terminate_session(reason) {
            warn!(error = %e, "session termination failed");
        }
    }
}
