//! TUI runtime for fix-review
//!
//! The review is ended exactly once on every exit path. A normal `q` issues
//! the close request itself and the loop waits for its completion. Any other
//! way out (Ctrl-C, a terminal error, a panic unwinding through the loop)
//! drops the `TeardownGuard`, which runs the session's teardown sequence and
//! waits up to the configured grace period for the close to land.
//! Terminating signals and a failed terminal setup take the same path.

use crate::app::background::{self, HttpDispatcher};
use crate::app::input;
use crate::app::messages::BackgroundMessage;
use crate::app::signals::{watch_signals, ShutdownSignal};
use crate::config::Config;
use crate::endpoint::{Dispatcher, EndpointClient};
use crate::session::{ReviewMode, SessionController, SessionEvent};
use crate::ui::{self, App};
use crate::viewer::BufferViewer;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Run the review surface against `client` until the review ends
pub async fn run_tui(
    config: &Config,
    client: EndpointClient,
    initial_mode: Option<ReviewMode>,
) -> Result<()> {
    let endpoint = client.base().to_string();
    let grace = Duration::from_millis(config.close_grace_ms);

    let shutdown = ShutdownSignal::new();
    if let Err(e) = watch_signals(shutdown.clone()) {
        warn!("failed to install signal handlers: {e}");
    }

    // Create channel for background tasks
    let (tx, rx) = mpsc::channel::<BackgroundMessage>();
    let dispatcher = HttpDispatcher::new(client, tx);
    let session = SessionController::new(dispatcher, BufferViewer::new());
    let mut app = App::new(session, endpoint.clone());

    if let Some(mode) = initial_mode {
        app.select_mode(mode);
    }

    // From here on every exit path, including a failed terminal setup,
    // ends the review through the guard.
    let mut guard = TeardownGuard {
        app: &mut app,
        rx: &rx,
        grace,
    };

    let mut terminal = start_surface(&mut guard, setup_terminal, restore_terminal_best_effort)?;
    info!(%endpoint, "review surface starting");

    let result = run_loop(&mut terminal, &mut guard, &shutdown);
    let restored = restore_terminal(&mut terminal);
    result.and(restored)
}

/// Bring the terminal up, then ask for the file tree. On failure the
/// partial setup is undone and nothing is requested; the caller's guard
/// still ends the review.
fn start_surface<D: Dispatcher, T>(
    guard: &mut TeardownGuard<'_, D>,
    setup: impl FnOnce() -> Result<T>,
    undo: impl FnOnce(),
) -> Result<T> {
    match setup() {
        Ok(surface) => {
            guard.app.session.load_file_tree();
            Ok(surface)
        }
        Err(e) => {
            undo();
            Err(e)
        }
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Undo whatever part of the setup succeeded; errors are ignored
fn restore_terminal_best_effort() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Ends the review if the loop is left any way other than a normal close
struct TeardownGuard<'a, D: Dispatcher> {
    app: &'a mut App<D>,
    rx: &'a mpsc::Receiver<BackgroundMessage>,
    grace: Duration,
}

impl<D: Dispatcher> Drop for TeardownGuard<'_, D> {
    fn drop(&mut self) {
        if self.app.session.on_teardown() {
            wait_for_close(self.app, self.rx, self.grace);
        }
    }
}

/// Block until the close completion arrives or `grace` runs out.
/// Other completions that show up meanwhile are still fed to the session.
fn wait_for_close<D: Dispatcher>(
    app: &mut App<D>,
    rx: &mpsc::Receiver<BackgroundMessage>,
    grace: Duration,
) -> bool {
    let deadline = Instant::now() + grace;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(msg) => {
                if app.session.handle(msg) == Some(SessionEvent::Closed) {
                    return true;
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                warn!(
                    grace_ms = grace.as_millis() as u64,
                    "close did not complete in time"
                );
                return false;
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => return false,
        }
    }
}

/// Main event loop with background message handling
fn run_loop<B: Backend, D: Dispatcher>(
    terminal: &mut Terminal<B>,
    guard: &mut TeardownGuard<'_, D>,
    shutdown: &ShutdownSignal,
) -> Result<()> {
    loop {
        if shutdown.is_raised() {
            warn!("leaving on signal with the review still open");
            return Ok(());
        }

        let app = &mut *guard.app;

        // Clear expired toasts
        app.clear_expired_toast();

        // Check for background messages (non-blocking)
        for event in background::drain_messages(&mut app.session, guard.rx) {
            app.apply_event(event);
        }

        if let Some(since) = app.closing_since {
            if !app.should_quit && since.elapsed() >= guard.grace {
                warn!("close still pending after grace period; exiting");
                app.should_quit = true;
            }
        }

        if app.should_quit {
            return Ok(());
        }

        // Render
        terminal.draw(|f| ui::render(f, app))?;

        // Poll for events with fast timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                input::handle_key_event(app, key);
            }
        }
    }
}
