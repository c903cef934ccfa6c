//! Review session controller
//!
//! Owns everything that changes while a review is open: the mode, the file
//! being shown, its fix list, the highlight slot, and the close latch. Every
//! network call goes out through a `Dispatcher` and its completion comes back
//! through `handle`, so the controller itself never blocks.
//!
//! # Ordering
//!
//! On a file switch in Manual mode the cache request for the previous file is
//! issued before the source and fix-list requests for the new one. Nothing
//! waits for the cache acknowledgment; it is best-effort.
//!
//! # Stale responses
//!
//! Source and fix-list requests carry a load ticket, geometry requests carry a
//! selection ticket. A response whose ticket is no longer current is dropped.

pub mod latch;


use crate::app::messages::BackgroundMessage;
use crate::endpoint::{Dispatcher, Request};
use crate::filetree::{build_file_tree, FlatTreeEntry};
use crate::fix::{render_detail, FixId, FixList};
use crate::marker::MarkerSync;
use crate::viewer::CodeViewer;
pub use latch::CloseLatch;
use std::fmt;
use tracing::{debug, info, warn};

/// How fixes are chosen for application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewMode {
    /// No choice made yet
    #[default]
    Unset,
    /// Apply every fix; toggling is disabled
    Global,
    /// The reviewer picks fixes one by one
    Manual,
}

impl ReviewMode {
    pub fn as_wire(&self) -> &'static str {
        match self {
            ReviewMode::Unset => "unset",
            ReviewMode::Global => "global",
            ReviewMode::Manual => "manual",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "global" => Some(ReviewMode::Global),
            "manual" => Some(ReviewMode::Manual),
            _ => None,
        }
    }

    /// Mode sent with the close request: no choice means "apply all"
    pub fn resolved(&self) -> Self {
        match self {
            ReviewMode::Unset => ReviewMode::Global,
            other => *other,
        }
    }
}

impl fmt::Display for ReviewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReviewMode::Unset => "No mode",
            ReviewMode::Global => "Global",
            ReviewMode::Manual => "Manual",
        };
        f.write_str(label)
    }
}

/// Outcome of asking to end the review
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReview {
    /// No mode chosen; ask the user before applying everything
    NeedsConfirmation,
    /// Close request issued
    Closing,
    /// The review already ended
    AlreadyClosed,
}

/// What a completion changed, for status display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    FileTreeReady(usize),
    SourceShown(String),
    FixesReplaced { file: String, count: usize },
    FixInspected(FixId),
    /// Close finished; the surface should exit
    Closed,
    /// Something failed; prior state is still shown
    Failed(String),
}

pub struct SessionController<D: Dispatcher, V: CodeViewer> {
    dispatcher: D,
    viewer: V,
    mode: ReviewMode,
    current_file: Option<String>,
    fixes: FixList,
    fixes_loaded: bool,
    file_tree: Vec<FlatTreeEntry>,
    marker: MarkerSync,
    detail: Option<String>,
    latch: CloseLatch,
    load_ticket: u64,
}

impl<D: Dispatcher, V: CodeViewer> SessionController<D, V> {
    pub fn new(dispatcher: D, viewer: V) -> Self {
        Self {
            dispatcher,
            viewer,
            mode: ReviewMode::Unset,
            current_file: None,
            fixes: FixList::default(),
            fixes_loaded: false,
            file_tree: Vec::new(),
            marker: MarkerSync::new(),
            detail: None,
            latch: CloseLatch::new(),
            load_ticket: 0,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn mode(&self) -> ReviewMode {
        self.mode
    }

    pub fn current_file(&self) -> Option<&str> {
        self.current_file.as_deref()
    }

    pub fn fixes(&self) -> &FixList {
        &self.fixes
    }

    pub fn fixes_loaded(&self) -> bool {
        self.fixes_loaded
    }

    pub fn file_tree(&self) -> &[FlatTreeEntry] {
        &self.file_tree
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut V {
        &mut self.viewer
    }

    /// Fix whose range is highlighted
    pub fn highlighted_fix(&self) -> Option<&FixId> {
        self.marker.highlighted_fix()
    }

    /// Fix whose geometry is in flight
    pub fn pending_fix(&self) -> Option<&FixId> {
        self.marker.pending_fix()
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn is_closed(&self) -> bool {
        self.latch.is_closed()
    }

    /// Toggling only does anything in Manual mode
    pub fn can_toggle(&self) -> bool {
        self.mode == ReviewMode::Manual && !self.is_closed()
    }

    // ========================================================================
    // User actions
    // ========================================================================

    pub fn load_file_tree(&mut self) {
        if self.is_closed() {
            return;
        }
        self.dispatcher.dispatch(Request::FileTree);
    }

    /// Choose the review mode. Unset can't be chosen.
    pub fn select_mode(&mut self, mode: ReviewMode) -> bool {
        if self.is_closed() || mode == ReviewMode::Unset {
            return false;
        }
        let previous = self.mode;
        self.mode = mode;
        info!(from = %previous, to = %mode, "review mode selected");

        if mode == ReviewMode::Global && previous != ReviewMode::Global {
            self.dispatcher.dispatch(Request::Clear);
            self.fixes.activate_all();
        }
        true
    }

    /// Switch the displayed file.
    pub fn open_file(&mut self, file: impl Into<String>) {
        if self.is_closed() {
            return;
        }
        let file = file.into();

        if self.mode == ReviewMode::Manual {
            self.cache_current_selection();
        }

        self.marker.clear(&mut self.viewer);
        self.detail = None;
        self.load_ticket = self.load_ticket.saturating_add(1);
        self.fixes = FixList::new(file.clone(), Vec::new());
        self.fixes_loaded = false;
        self.current_file = Some(file.clone());
        debug!(file = %file, ticket = self.load_ticket, "opening file");

        self.dispatcher.dispatch(Request::Source {
            file: file.clone(),
            ticket: self.load_ticket,
        });
        self.dispatcher.dispatch(Request::FixList {
            file,
            mode: self.mode,
            ticket: self.load_ticket,
        });
    }

    /// Flip a fix and cascade. Returns ids whose state changed.
    pub fn toggle(&mut self, id: &FixId) -> Vec<FixId> {
        if !self.can_toggle() {
            return Vec::new();
        }
        self.fixes.toggle(id, self.mode)
    }

    /// Ask for a fix's geometry so it can be highlighted and explained
    pub fn select_fix(&mut self, id: &FixId) -> bool {
        if self.is_closed() || self.fixes.find(id).is_none() {
            return false;
        }
        let ticket = self.marker.begin(id.clone());
        self.dispatcher.dispatch(Request::FixDraw {
            id: id.clone(),
            ticket,
        });
        true
    }

    /// Explicit end of review.
    pub fn request_end_review(&mut self) -> EndReview {
        if self.is_closed() {
            return EndReview::AlreadyClosed;
        }
        if self.mode == ReviewMode::Unset {
            return EndReview::NeedsConfirmation;
        }
        self.finish("user")
    }

    /// Proceed after the "apply all fixes?" confirmation
    pub fn confirm_end_review(&mut self) -> EndReview {
        if self.is_closed() {
            return EndReview::AlreadyClosed;
        }
        self.mode = self.mode.resolved();
        self.finish("user")
    }

    /// Abnormal termination hook. Runs the end sequence unless the review
    /// already ended; returns true if a close request went out.
    pub fn on_teardown(&mut self) -> bool {
        if self.is_closed() {
            debug!("teardown after normal end; nothing to do");
            return false;
        }
        warn!("review surface torn down before the review ended");
        self.mode = self.mode.resolved();
        self.finish("teardown") == EndReview::Closing
    }

    fn finish(&mut self, trigger: &'static str) -> EndReview {
        if !self.latch.try_close() {
            return EndReview::AlreadyClosed;
        }
        if self.mode == ReviewMode::Manual {
            self.cache_current_selection();
        }
        info!(trigger, mode = %self.mode, "closing review session");
        self.dispatcher.dispatch(Request::Close { mode: self.mode });
        EndReview::Closing
    }

    fn cache_current_selection(&mut self) {
        let Some(file) = self.current_file.clone() else {
            return;
        };
        if !self.fixes_loaded || self.fixes.file() != Some(file.as_str()) {
            debug!(file = %file, "fix list never loaded; skipping cache");
            return;
        }
        let ids = self.fixes.active_ids();
        debug!(file = %file, count = ids.len(), "caching selection");
        self.dispatcher.dispatch(Request::Cache { file, ids });
    }

    // ========================================================================
    // Completions
    // ========================================================================

    pub fn handle(&mut self, message: BackgroundMessage) -> Option<SessionEvent> {
        match message {
            BackgroundMessage::FileTreeLoaded(result) => match result {
                Ok(roots) => {
                    self.file_tree = build_file_tree(&roots);
                    Some(SessionEvent::FileTreeReady(self.file_tree.len()))
                }
                Err(e) => {
                    warn!(error = %e, "file tree failed");
                    Some(SessionEvent::Failed(format!("File tree: {}", e)))
                }
            },
            BackgroundMessage::SourceLoaded {
                file,
                ticket,
                result,
            } => {
                if !self.is_current_load(&file, ticket) {
                    debug!(file = %file, ticket, "dropping stale source");
                    return None;
                }
                match result {
                    Ok(text) => {
                        // Geometry may have landed before the text did
                        self.viewer.clear_annotations();
                        self.viewer.set_text(&text);
                        self.marker.reinstall(&mut self.viewer);
                        Some(SessionEvent::SourceShown(file))
                    }
                    Err(e) => {
                        warn!(file = %file, error = %e, "source load failed");
                        Some(SessionEvent::Failed(format!("Could not load {}: {}", file, e)))
                    }
                }
            }
            BackgroundMessage::FixListLoaded {
                file,
                ticket,
                result,
            } => {
                if !self.is_current_load(&file, ticket) {
                    debug!(file = %file, ticket, "dropping stale fix list");
                    return None;
                }
                match result {
                    Ok(records) => {
                        self.fixes = FixList::new(file.clone(), records);
                        if self.mode == ReviewMode::Global {
                            self.fixes.activate_all();
                        }
                        self.fixes_loaded = true;
                        let count = self.fixes.len();
                        Some(SessionEvent::FixesReplaced { file, count })
                    }
                    Err(e) => {
                        warn!(file = %file, error = %e, "fix list load failed");
                        Some(SessionEvent::Failed(format!("Fixes for {}: {}", file, e)))
                    }
                }
            }
            BackgroundMessage::FixDrawLoaded { id, ticket, result } => {
                if !self.marker.is_current(ticket) {
                    debug!(fix = %id, ticket, "dropping stale fix geometry");
                    return None;
                }
                match result {
                    Ok(geometry) => {
                        self.marker
                            .complete(&mut self.viewer, ticket, &geometry.range);
                        self.detail = Some(render_detail(&geometry.mode, &geometry.payload));
                        Some(SessionEvent::FixInspected(id))
                    }
                    Err(e) => {
                        self.marker.abandon(ticket);
                        warn!(fix = %id, error = %e, "fix geometry failed");
                        Some(SessionEvent::Failed(format!("Fix {}: {}", id, e)))
                    }
                }
            }
            BackgroundMessage::Acknowledged { request, result } => {
                if let Err(e) = result {
                    warn!(request, error = %e, "request failed");
                    return Some(SessionEvent::Failed(format!("{} failed: {}", request, e)));
                }
                None
            }
            BackgroundMessage::Closed(result) => {
                if let Err(e) = result {
                    warn!(error = %e, "close request failed");
                }
                Some(SessionEvent::Closed)
            }
            BackgroundMessage::Error(e) => Some(SessionEvent::Failed(e)),
        }
    }

    fn is_current_load(&self, file: &str, ticket: u64) -> bool {
        ticket == self.load_ticket && self.current_file.as_deref() == Some(file)
    }
}
