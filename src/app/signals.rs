//! Process signals that end the review
//!
//! Closing the terminal window (SIGHUP), `kill` (SIGTERM) and an external
//! SIGINT would otherwise terminate the process before the teardown guard
//! runs. The watcher turns them into a flag the run loop polls each tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// Raised once a terminating signal arrives
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal(Arc<AtomicBool>);

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Install handlers for SIGTERM, SIGHUP and SIGINT and raise `shutdown`
/// when any of them fires.
///
/// Handlers are registered before this returns, so a signal sent right
/// after the call is already caught. Must be called inside the tokio runtime.
#[cfg(unix)]
pub fn watch_signals(shutdown: ShutdownSignal) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = signal(SignalKind::terminate())?;
    let mut hangup = signal(SignalKind::hangup())?;
    let mut interrupt = signal(SignalKind::interrupt())?;

    tokio::spawn(async move {
        let name = tokio::select! {
            _ = term.recv() => "SIGTERM",
            _ = hangup.recv() => "SIGHUP",
            _ = interrupt.recv() => "SIGINT",
        };
        info!(signal = name, "terminating signal received; ending review");
        shutdown.raise();
    });
    Ok(())
}

#[cfg(not(unix))]
pub fn watch_signals(shutdown: ShutdownSignal) -> std::io::Result<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("ctrl-c received; ending review");
                shutdown.raise();
            }
            Err(err) => tracing::warn!("failed to listen for ctrl-c: {err}"),
        }
    });
    Ok(())
}
