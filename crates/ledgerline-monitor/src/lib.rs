//! Inactivity monitor for Ledgerline.
//!
//! Watches for the absence of user activity and enforces an automatic
//! logout after a fixed idle period, with a visible warning and a
//! cancelable countdown before the forced logout.
//!
//! The monitor is a deadline state machine with three timer roles:
//!
//! ```text
//!   warning_at  ── one-shot, shows the countdown
//!   tick_at     ── repeating (1 s), decrements the countdown
//!   idle_at     ── one-shot, forces logout
//! ```
//!
//! Each role is a single `Option<Instant>` field, so re-arming a role
//! replaces the previous deadline; duplicate timers for the same role
//! cannot exist.
//!
//! # Integration
//!
//! The monitor is designed to sit inside a shell task's
//! `tokio::select!` loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         biased;
//!         Some(cmd) = cmd_rx.recv() => { /* activity, stay-logged-in, stop */ }
//!         event = monitor.wait() => {
//!             if let MonitorEvent::Expired = event {
//!                 controller.terminate_session(LogoutReason::Inactivity);
//!             }
//!         }
//!     }
//! }
//! ```
//!
//! When no deadline is armed, [`InactivityMonitor::wait`] pends forever,
//! so the `select!` keeps processing its other branches.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Timing configuration for the inactivity monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Total idle period before a forced logout. Default: 5 minutes.
    pub idle_timeout: Duration,
    /// Idle period after which the warning is shown. Default: 4 minutes
    /// (one minute before `idle_timeout`).
    pub warning_after: Duration,
    /// Length of the visible countdown. Default: 60 seconds, ticking at
    /// 1-second granularity.
    pub countdown: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(5 * 60),
            warning_after: Duration::from_secs(4 * 60),
            countdown: Duration::from_secs(60),
        }
    }
}

impl MonitorConfig {
    /// Clamp and fix any out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`InactivityMonitor::new`]. Rules:
    /// - `countdown` is at least one second (the tick granularity).
    /// - `warning_after` must leave room for the countdown before
    ///   `idle_timeout`; otherwise it is pulled back.
    pub fn validated(mut self) -> Self {
        if self.countdown < Duration::from_secs(1) {
            warn!("countdown shorter than tick granularity; clamping to 1s");
            self.countdown = Duration::from_secs(1);
        }
        if self.warning_after + self.countdown > self.idle_timeout {
            let adjusted = self.idle_timeout.saturating_sub(self.countdown);
            warn!(
                warning_secs = self.warning_after.as_secs(),
                adjusted_secs = adjusted.as_secs(),
                "warning_after leaves no room for the countdown; clamping"
            );
            self.warning_after = adjusted;
        }
        self
    }

    /// The countdown length in whole seconds.
    pub fn countdown_secs(&self) -> u64 {
        self.countdown.as_secs()
    }
}

// ---------------------------------------------------------------------------
// Countdown state (observed by the rendering layer)
// ---------------------------------------------------------------------------

/// The user-visible warning/countdown state.
///
/// `seconds_remaining` only decreases during a countdown or resets to
/// the full countdown length; it is never negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownState {
    /// Whether the warning dialog is currently visible.
    pub visible: bool,
    /// Seconds left until forced logout while the warning is visible.
    pub seconds_remaining: u64,
}

impl CountdownState {
    fn hidden(config: &MonitorConfig) -> Self {
        Self {
            visible: false,
            seconds_remaining: config.countdown_secs(),
        }
    }
}

// ---------------------------------------------------------------------------
// Monitor events
// ---------------------------------------------------------------------------

/// What happened when a monitor deadline fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorEvent {
    /// The warning deadline fired: the countdown just became visible.
    WarningShown {
        /// Seconds on the countdown, i.e. the full countdown length.
        seconds_remaining: u64,
    },
    /// One countdown second elapsed.
    Tick {
        /// Seconds left after this tick (always `> 0`; a tick that
        /// reaches zero is reported as [`MonitorEvent::Expired`]).
        seconds_remaining: u64,
    },
    /// The idle period elapsed (or the countdown reached zero). The
    /// caller must terminate the session. All deadlines are cleared
    /// before this is returned, so expiry is delivered at most once
    /// per armed cycle.
    Expired,
}

/// Which deadline slot fired. Internal to `wait`.
#[derive(Debug, Clone, Copy)]
enum Role {
    Warning,
    Tick,
    Idle,
}

// ---------------------------------------------------------------------------
// Monitor
// ---------------------------------------------------------------------------

/// Detects user inactivity and drives the warning/countdown/forced-logout
/// cycle. One instance per application shell.
///
/// The monitor never terminates sessions itself; it only reports
/// [`MonitorEvent::Expired`] and relies on the caller to delegate to the
/// session controller. It also never checks whether a session exists;
/// the owner is expected to call [`start`](Self::start) only while one
/// does, and [`stop`](Self::stop) when it ends by any path.
pub struct InactivityMonitor {
    config: MonitorConfig,
    /// One-shot deadline for showing the warning.
    warning_at: Option<Instant>,
    /// One-shot deadline for the forced logout.
    idle_at: Option<Instant>,
    /// Repeating 1-second deadline for the countdown.
    tick_at: Option<Instant>,
    countdown: CountdownState,
    countdown_tx: watch::Sender<CountdownState>,
}

impl InactivityMonitor {
    /// Creates a monitor with all timer roles disarmed.
    pub fn new(config: MonitorConfig) -> Self {
        let config = config.validated();
        let countdown = CountdownState::hidden(&config);
        let (countdown_tx, _) = watch::channel(countdown.clone());
        Self {
            config,
            warning_at: None,
            idle_at: None,
            tick_at: None,
            countdown,
            countdown_tx,
        }
    }

    /// A channel observing every change to the countdown state. The
    /// rendering layer holds the receiver; it is valid for the lifetime
    /// of the monitor.
    pub fn countdown_watch(&self) -> watch::Receiver<CountdownState> {
        self.countdown_tx.subscribe()
    }

    /// The current countdown state.
    pub fn countdown(&self) -> &CountdownState {
        &self.countdown
    }

    /// Whether any timer role is armed.
    pub fn is_running(&self) -> bool {
        self.warning_at.is_some() || self.idle_at.is_some() || self.tick_at.is_some()
    }

    /// Arms the warning and idle deadlines from now, replacing any
    /// deadlines from a previous cycle. No visible side effect.
    pub fn start(&mut self) {
        let now = Instant::now();
        self.warning_at = Some(now + self.config.warning_after);
        self.idle_at = Some(now + self.config.idle_timeout);
        self.tick_at = None;
        self.set_countdown(false, self.config.countdown_secs());
        debug!(
            warning_secs = self.config.warning_after.as_secs(),
            idle_secs = self.config.idle_timeout.as_secs(),
            "inactivity monitor armed"
        );
    }

    /// Disarms all timer roles and hides the countdown. Idempotent;
    /// called when the session ends by any path.
    pub fn stop(&mut self) {
        self.warning_at = None;
        self.idle_at = None;
        self.tick_at = None;
        self.set_countdown(false, self.config.countdown_secs());
        trace!("inactivity monitor disarmed");
    }

    /// Restarts the cycle: all roles disarmed, countdown hidden and
    /// refilled, warning and idle deadlines re-armed from now.
    ///
    /// This is the explicit "stay logged in" action: unlike
    /// [`on_user_activity`](Self::on_user_activity) it also dismisses a
    /// visible countdown.
    pub fn reset(&mut self) {
        self.stop();
        self.start();
    }

    /// Reports qualifying user activity (pointer move, key down,
    /// pointer down, wheel, touch start, as observed by the host).
    ///
    /// Ignored while the countdown is visible: incidental input must
    /// not dismiss a deliberate warning, only an explicit
    /// [`reset`](Self::reset) may. Also ignored when the monitor is not
    /// running, since input can arrive after the session has already
    /// ended through another path.
    pub fn on_user_activity(&mut self) {
        if !self.is_running() || self.countdown.visible {
            return;
        }
        self.reset();
    }

    /// Waits until the earliest armed deadline fires and returns the
    /// resulting event. Pends forever when nothing is armed.
    ///
    /// Cancel-safe: state is mutated only after the deadline elapses,
    /// so dropping the future (e.g. when another `select!` branch wins)
    /// leaves the monitor unchanged.
    pub async fn wait(&mut self) -> MonitorEvent {
        let armed = [
            (self.warning_at, Role::Warning),
            (self.tick_at, Role::Tick),
            (self.idle_at, Role::Idle),
        ];
        let mut next: Option<(Instant, Role)> = None;
        for (deadline, role) in armed {
            if let Some(at) = deadline {
                // Strictly-less keeps the earlier entry on a tie, so a
                // countdown tick reaching zero wins over the idle
                // deadline due at the same instant.
                if next.is_none_or(|(best, _)| at < best) {
                    next = Some((at, role));
                }
            }
        }

        let Some((deadline, role)) = next else {
            // Nothing armed: pend forever; select! handles other branches.
            std::future::pending::<()>().await;
            unreachable!()
        };

        time::sleep_until(deadline).await;

        match role {
            Role::Warning => {
                self.warning_at = None;
                self.tick_at = Some(deadline + Duration::from_secs(1));
                let seconds = self.config.countdown_secs();
                self.set_countdown(true, seconds);
                debug!(seconds, "inactivity warning shown");
                MonitorEvent::WarningShown {
                    seconds_remaining: seconds,
                }
            }
            Role::Tick => {
                let seconds = self.countdown.seconds_remaining.saturating_sub(1);
                if seconds == 0 {
                    self.stop();
                    debug!("countdown reached zero");
                    return MonitorEvent::Expired;
                }
                self.tick_at = Some(deadline + Duration::from_secs(1));
                self.set_countdown(true, seconds);
                trace!(seconds, "countdown tick");
                MonitorEvent::Tick {
                    seconds_remaining: seconds,
                }
            }
            Role::Idle => {
                self.stop();
                debug!("idle deadline reached");
                MonitorEvent::Expired
            }
        }
    }

    fn set_countdown(&mut self, visible: bool, seconds_remaining: u64) {
        let state = CountdownState {
            visible,
            seconds_remaining,
        };
        if state != self.countdown {
            self.countdown = state.clone();
            self.countdown_tx.send_replace(state);
        }
    }
}
