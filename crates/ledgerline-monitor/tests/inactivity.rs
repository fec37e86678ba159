//! Integration tests for the inactivity monitor.
//!
//! Uses `tokio::time::pause()` (via `start_paused = true`) to control
//! time deterministically. With the clock paused, `wait()` resolves
//! instantly by auto-advancing to the next armed deadline, so the full
//! 5-minute cycle runs in microseconds.

use std::time::Duration;

use tokio::time::Instant;

use ledgerline_monitor::{CountdownState, InactivityMonitor, MonitorConfig, MonitorEvent};

// =========================================================================
// Helpers
// =========================================================================

fn monitor() -> InactivityMonitor {
    InactivityMonitor::new(MonitorConfig::default())
}

/// A short config so countdown-heavy tests stay readable: warning at
/// 10 s, logout at 15 s, 5 s countdown.
fn short_config() -> MonitorConfig {
    MonitorConfig {
        idle_timeout: Duration::from_secs(15),
        warning_after: Duration::from_secs(10),
        countdown: Duration::from_secs(5),
    }
}

// =========================================================================
// Warning timing
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_warning_fires_at_four_minutes_with_full_countdown() {
    let mut m = monitor();
    let t0 = Instant::now();
    m.start();

    let event = m.wait().await;

    assert_eq!(
        event,
        MonitorEvent::WarningShown {
            seconds_remaining: 60
        }
    );
    assert_eq!(t0.elapsed(), Duration::from_secs(240));
    assert!(m.countdown().visible);
    assert_eq!(m.countdown().seconds_remaining, 60);
}

#[tokio::test(start_paused = true)]
async fn test_countdown_ticks_every_second() {
    let mut m = InactivityMonitor::new(short_config());
    m.start();

    assert!(matches!(m.wait().await, MonitorEvent::WarningShown { .. }));

    let tick_start = Instant::now();
    let event = m.wait().await;
    assert_eq!(
        event,
        MonitorEvent::Tick {
            seconds_remaining: 4
        }
    );
    assert_eq!(tick_start.elapsed(), Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_forced_logout_at_five_minutes_exactly_once() {
    let mut m = monitor();
    let t0 = Instant::now();
    m.start();

    // Drive the whole cycle: warning, 59 visible ticks, then expiry.
    let mut expirations = 0;
    let mut ticks = 0;
    loop {
        match m.wait().await {
            MonitorEvent::WarningShown { seconds_remaining } => {
                assert_eq!(seconds_remaining, 60);
            }
            MonitorEvent::Tick { .. } => ticks += 1,
            MonitorEvent::Expired => {
                expirations += 1;
                break;
            }
        }
    }

    assert_eq!(ticks, 59);
    assert_eq!(expirations, 1);
    assert_eq!(t0.elapsed(), Duration::from_secs(300));
    // Expiry clears every role: the countdown is hidden and the idle
    // deadline (due at the same instant) can no longer fire.
    assert!(!m.countdown().visible);
    assert!(!m.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_wait_after_expiry_pends_forever() {
    let mut m = InactivityMonitor::new(short_config());
    m.start();
    loop {
        if m.wait().await == MonitorEvent::Expired {
            break;
        }
    }

    let result = tokio::time::timeout(Duration::from_secs(3600), m.wait()).await;
    assert!(result.is_err(), "expired monitor must not fire again");
}

// =========================================================================
// Activity and reset
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_activity_before_warning_defers_it() {
    let mut m = monitor();
    let t0 = Instant::now();
    m.start();

    // Activity at t=200s restarts both timers from zero elapsed time.
    tokio::time::advance(Duration::from_secs(200)).await;
    m.on_user_activity();

    let event = m.wait().await;
    assert!(matches!(event, MonitorEvent::WarningShown { .. }));
    // Warning appears at 200 + 240 = 440s, not at the original 240s.
    assert_eq!(t0.elapsed(), Duration::from_secs(440));
}

#[tokio::test(start_paused = true)]
async fn test_activity_during_countdown_is_ignored() {
    let mut m = InactivityMonitor::new(short_config());
    m.start();
    assert!(matches!(m.wait().await, MonitorEvent::WarningShown { .. }));

    // Mouse jitter while the warning is visible must not dismiss it.
    m.on_user_activity();
    assert!(m.countdown().visible);

    // The countdown keeps going from where it was.
    let event = m.wait().await;
    assert_eq!(
        event,
        MonitorEvent::Tick {
            seconds_remaining: 4
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_reset_during_countdown_dismisses_and_rearms() {
    let mut m = InactivityMonitor::new(short_config());
    m.start();
    assert!(matches!(m.wait().await, MonitorEvent::WarningShown { .. }));

    // Explicit "stay logged in".
    let t_reset = Instant::now();
    m.reset();
    assert!(!m.countdown().visible);
    assert_eq!(m.countdown().seconds_remaining, 5);

    // A fresh cycle: next warning a full warning_after later.
    let event = m.wait().await;
    assert!(matches!(event, MonitorEvent::WarningShown { .. }));
    assert_eq!(t_reset.elapsed(), Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn test_repeated_starts_do_not_duplicate_deadlines() {
    let mut m = InactivityMonitor::new(short_config());
    m.start();
    tokio::time::advance(Duration::from_secs(4)).await;
    m.start();
    m.start();

    // Exactly one warning fires, a full warning_after from the last start.
    let t_last = Instant::now();
    assert!(matches!(m.wait().await, MonitorEvent::WarningShown { .. }));
    assert_eq!(t_last.elapsed(), Duration::from_secs(10));

    // And the next event is a tick, not a second warning.
    assert!(matches!(m.wait().await, MonitorEvent::Tick { .. }));
}

// =========================================================================
// Stop
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_stop_cancels_all_roles() {
    let mut m = monitor();
    m.start();
    m.stop();

    assert!(!m.is_running());
    // Well past the original idle deadline: nothing fires.
    let result = tokio::time::timeout(Duration::from_secs(600), m.wait()).await;
    assert!(result.is_err(), "stopped monitor should pend forever");
}

#[tokio::test(start_paused = true)]
async fn test_stop_during_countdown_hides_warning() {
    let mut m = InactivityMonitor::new(short_config());
    m.start();
    assert!(matches!(m.wait().await, MonitorEvent::WarningShown { .. }));
    assert!(m.countdown().visible);

    m.stop();
    assert!(!m.countdown().visible);
    assert_eq!(m.countdown().seconds_remaining, 5);
}

#[tokio::test(start_paused = true)]
async fn test_stop_is_idempotent() {
    let mut m = monitor();
    m.start();
    m.stop();
    m.stop();
    assert!(!m.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_never_started_monitor_pends() {
    let mut m = monitor();
    let result = tokio::time::timeout(Duration::from_secs(600), m.wait()).await;
    assert!(result.is_err());
}

// =========================================================================
// Countdown watch channel
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_watch_tracks_visibility_and_seconds() {
    let mut m = InactivityMonitor::new(short_config());
    let watch = m.countdown_watch();
    m.start();

    assert_eq!(
        *watch.borrow(),
        CountdownState {
            visible: false,
            seconds_remaining: 5
        }
    );

    assert!(matches!(m.wait().await, MonitorEvent::WarningShown { .. }));
    assert_eq!(
        *watch.borrow(),
        CountdownState {
            visible: true,
            seconds_remaining: 5
        }
    );

    assert!(matches!(m.wait().await, MonitorEvent::Tick { .. }));
    assert_eq!(watch.borrow().seconds_remaining, 4);

    m.stop();
    assert!(!watch.borrow().visible);
}
