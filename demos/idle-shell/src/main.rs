//! Terminal driver for the session lifecycle.
//!
//! Logs in (demo mode unless LEDGERLINE_EMAIL/LEDGERLINE_PASSWORD are
//! set), then maps the terminal onto the lifecycle: every line of input
//! counts as user activity, `stay` answers the warning, `logout` ends
//! the session, and Ctrl-C tears down through the unload guard.
//!
//! Point it at a server with LEDGERLINE_URL (defaults to the local
//! dev server).

use std::sync::Arc;

use ledgerline::{LogoutReason, SessionController, SessionShell, ShellConfig, UnloadGuard};
use ledgerline_api::{ApiConfig, HttpBackend};
use ledgerline_bus::EventBus;
use ledgerline_store::SessionStore;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut config = ApiConfig::default();
    if let Ok(url) = std::env::var("LEDGERLINE_URL") {
        config.base_url = url;
    }
    info!(url = %config.base_url, "connecting");

    let backend = Arc::new(HttpBackend::new(config)?);
    let controller = SessionController::new(
        Arc::new(SessionStore::in_memory()),
        Arc::new(EventBus::new()),
        backend,
    );
    let (shell, shell_task) = SessionShell::spawn(controller.clone(), ShellConfig::default());
    let guard = UnloadGuard::new(&controller);

    let session = match (
        std::env::var("LEDGERLINE_EMAIL"),
        std::env::var("LEDGERLINE_PASSWORD"),
    ) {
        (Ok(email), Ok(password)) => controller.login(&email, &password).await?,
        _ => controller.login_demo().await?,
    };
    println!("logged in as {}", session.display_name);
    println!("type to stay active; `stay` dismisses the warning; `logout` ends the session");

    // Print countdown transitions as they happen.
    let mut countdown = shell.countdown_watch();
    let printer = tokio::spawn(async move {
        let mut was_visible = false;
        while countdown.changed().await.is_ok() {
            let state = countdown.borrow_and_update().clone();
            if state.visible {
                println!("inactive -- logging out in {}s (type `stay`)", state.seconds_remaining);
            } else if was_visible {
                println!("warning dismissed");
            }
            was_visible = state.visible;
        }
    });

    let mut session_rx = shell.session_watch();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line?.as_deref().map(str::trim) {
                    Some("logout") => shell.logout(LogoutReason::UserRequested),
                    Some("stay") => shell.stay_logged_in(),
                    Some(_) => shell.activity(),
                    None => break,
                }
            }
            changed = session_rx.changed() => {
                if changed.is_err() || !*session_rx.borrow_and_update() {
                    println!("session ended");
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("shutting down");
                guard.fire();
                break;
            }
        }
    }

    shell.shutdown();
    let _ = shell_task.await;
    printer.abort();
    Ok(())
}
