//! fix-review UI - three panels around the code viewer
//!
//! Layout:
//! ╔══════════════════════════════════════════════════════════════════╗
//! ║  fix-review · Manual · /src/main.c                               ║
//! ╠══════════════╦══════════════════════╦════════════════════════════╣
//! ║  FILES       ║  FIXES               ║  SOURCE                    ║
//! ║  ▾ src       ║  [x] 1 Cast          ║  12 int x = a + b;         ║
//! ║    main.c    ║    [x] 2 Check arith ║  13 ...                    ║
//! ║    util.c    ║  [ ] 3 Specifier     ╠════════════════════════════╣
//! ║              ║                      ║  DETAIL                    ║
//! ╠══════════════╩══════════════════════╩════════════════════════════╣
//! ║  g global  m manual  ␣ toggle  ↵ open  ? help  q end review      ║
//! ╚══════════════════════════════════════════════════════════════════╝

mod render;
pub mod theme;

pub use render::render;

use crate::endpoint::Dispatcher;
use crate::filetree::FlatTreeEntry;
use crate::fix::FixId;
use crate::session::{EndReview, ReviewMode, SessionController, SessionEvent};
use crate::viewer::BufferViewer;
use std::time::Instant;
use tracing::debug;

/// Active panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivePanel {
    #[default]
    Files,
    Fixes,
    Source,
}

impl ActivePanel {
    pub fn next(&self) -> Self {
        match self {
            ActivePanel::Files => ActivePanel::Fixes,
            ActivePanel::Fixes => ActivePanel::Source,
            ActivePanel::Source => ActivePanel::Files,
        }
    }
}

/// Overlay state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    Help,
    /// No mode chosen and the user asked to end the review
    ConfirmApplyAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Error,
}

impl ToastKind {
    /// Duration in seconds before toast expires
    pub fn duration_secs(&self) -> u64 {
        match self {
            ToastKind::Info => 3,
            ToastKind::Success => 3,
            ToastKind::Error => 10, // Errors stay longer
        }
    }
}

/// Toast notification
pub struct Toast {
    pub message: String,
    pub created_at: Instant,
    pub kind: ToastKind,
}

impl Toast {
    pub fn new(message: &str, kind: ToastKind) -> Self {
        Self {
            message: message.to_string(),
            created_at: Instant::now(),
            kind,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed().as_secs() >= self.kind.duration_secs()
    }
}

/// Main application state
pub struct App<D: Dispatcher> {
    pub session: SessionController<D, BufferViewer>,
    pub active_panel: ActivePanel,
    pub tree_selected: usize,
    pub fix_selected: usize,
    pub overlay: Overlay,
    pub toast: Option<Toast>,
    pub endpoint: String,
    pub should_quit: bool,
    /// Set when the close request went out; the runtime exits once it
    /// completes or the grace period runs out
    pub closing_since: Option<Instant>,
}

impl<D: Dispatcher> App<D> {
    pub fn new(session: SessionController<D, BufferViewer>, endpoint: impl Into<String>) -> Self {
        Self {
            session,
            active_panel: ActivePanel::default(),
            tree_selected: 0,
            fix_selected: 0,
            overlay: Overlay::None,
            toast: None,
            endpoint: endpoint.into(),
            should_quit: false,
            closing_since: None,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    //  NAVIGATION
    // ═══════════════════════════════════════════════════════════════════════

    pub fn toggle_panel(&mut self) {
        self.active_panel = self.active_panel.next();
    }

    pub fn navigate_down(&mut self) {
        match self.active_panel {
            ActivePanel::Files => {
                let max = self.session.file_tree().len().saturating_sub(1);
                self.tree_selected = (self.tree_selected + 1).min(max);
            }
            ActivePanel::Fixes => {
                let max = self.session.fixes().len().saturating_sub(1);
                self.fix_selected = (self.fix_selected + 1).min(max);
            }
            ActivePanel::Source => self.session.viewer_mut().scroll_by(1),
        }
    }

    pub fn navigate_up(&mut self) {
        match self.active_panel {
            ActivePanel::Files => self.tree_selected = self.tree_selected.saturating_sub(1),
            ActivePanel::Fixes => self.fix_selected = self.fix_selected.saturating_sub(1),
            ActivePanel::Source => self.session.viewer_mut().scroll_by(-1),
        }
    }

    pub fn page(&mut self, lines: isize) {
        self.session.viewer_mut().scroll_by(lines);
    }

    pub fn selected_tree_entry(&self) -> Option<&FlatTreeEntry> {
        self.session.file_tree().get(self.tree_selected)
    }

    pub fn selected_fix_id(&self) -> Option<FixId> {
        self.session
            .fixes()
            .get(self.fix_selected)
            .map(|r| r.id.clone())
    }

    // ═══════════════════════════════════════════════════════════════════════
    //  ACTIONS
    // ═══════════════════════════════════════════════════════════════════════

    /// Enter on the focused panel
    pub fn activate(&mut self) {
        match self.active_panel {
            ActivePanel::Files => self.open_selected_file(),
            ActivePanel::Fixes => self.inspect_selected_fix(),
            ActivePanel::Source => {}
        }
    }

    pub fn open_selected_file(&mut self) {
        let Some(entry) = self.selected_tree_entry() else {
            return;
        };
        if entry.is_dir {
            return;
        }
        let file = entry.path.to_string_lossy().to_string();
        self.fix_selected = 0;
        self.session.open_file(file);
        self.active_panel = ActivePanel::Fixes;
    }

    pub fn inspect_selected_fix(&mut self) {
        if let Some(id) = self.selected_fix_id() {
            self.session.select_fix(&id);
        }
    }

    pub fn toggle_selected_fix(&mut self) {
        let Some(id) = self.selected_fix_id() else {
            return;
        };
        if self.session.mode() != ReviewMode::Manual {
            self.show_toast("Switch to Manual (m) to pick fixes", ToastKind::Info);
            return;
        }
        let changed = self.session.toggle(&id);
        debug!(fix = %id, changed = changed.len(), "toggled fix");
    }

    pub fn select_mode(&mut self, mode: ReviewMode) {
        if self.session.mode() == mode {
            return;
        }
        if self.session.select_mode(mode) {
            let note = match mode {
                ReviewMode::Global => "Global: every fix will be applied",
                _ => "Manual: pick fixes with space",
            };
            self.show_toast(note, ToastKind::Success);
        }
    }

    /// `q`: end the review, asking first if no mode was chosen
    pub fn request_end_review(&mut self) {
        match self.session.request_end_review() {
            EndReview::NeedsConfirmation => self.overlay = Overlay::ConfirmApplyAll,
            outcome => self.note_end_review(outcome),
        }
    }

    pub fn confirm_end_review(&mut self) {
        self.overlay = Overlay::None;
        let outcome = self.session.confirm_end_review();
        self.note_end_review(outcome);
    }

    pub fn cancel_overlay(&mut self) {
        self.overlay = Overlay::None;
    }

    pub fn toggle_help(&mut self) {
        self.overlay = match self.overlay {
            Overlay::Help => Overlay::None,
            _ => Overlay::Help,
        };
    }

    /// Leave without ending the review; the runtime's teardown guard closes it
    pub fn abort(&mut self) {
        self.should_quit = true;
    }

    fn note_end_review(&mut self, outcome: EndReview) {
        match outcome {
            EndReview::Closing => {
                self.closing_since = Some(Instant::now());
                self.show_toast("Ending review...", ToastKind::Info);
            }
            EndReview::AlreadyClosed => self.should_quit = true,
            EndReview::NeedsConfirmation => {}
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    //  COMPLETIONS
    // ═══════════════════════════════════════════════════════════════════════

    pub fn apply_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::FileTreeReady(count) => {
                self.tree_selected = self.tree_selected.min(count.saturating_sub(1));
            }
            SessionEvent::SourceShown(_) => {}
            SessionEvent::FixesReplaced { count, .. } => {
                self.fix_selected = self.fix_selected.min(count.saturating_sub(1));
            }
            SessionEvent::FixInspected(_) => {}
            SessionEvent::Closed => self.should_quit = true,
            SessionEvent::Failed(message) => self.show_toast(&message, ToastKind::Error),
        }
    }

    pub fn clear_expired_toast(&mut self) {
        if let Some(ref toast) = self.toast {
            if toast.is_expired() {
                self.toast = None;
            }
        }
    }

    pub fn show_toast(&mut self, message: &str, kind: ToastKind) {
        self.toast = Some(Toast::new(message, kind));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::app::messages::BackgroundMessage;
    use crate::endpoint::Request;
    use crate::filetree::FileNode;
    use crate::fix::{FixMode, FixRecord};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    pub(crate) struct Recorder(pub Rc<RefCell<Vec<Request>>>);

    impl Dispatcher for Recorder {
        fn dispatch(&self, request: Request) {
            self.0.borrow_mut().push(request);
        }
    }

    pub(crate) fn app_with_file() -> (App<Recorder>, Recorder) {
        let recorder = Recorder::default();
        let session = SessionController::new(recorder.clone(), BufferViewer::new());
        let mut app = App::new(session, "http://localhost:9026/");
        let tree = vec![FileNode::dir("proj", vec![FileNode::file("main.c")])];
        let event = app.session.handle(BackgroundMessage::FileTreeLoaded(Ok(tree)));
        if let Some(event) = event {
            app.apply_event(event);
        }
        (app, recorder)
    }

    #[test]
    fn test_enter_on_folder_does_nothing() {
        let (mut app, recorder) = app_with_file();
        app.activate();
        assert!(recorder.0.borrow().is_empty());
        assert_eq!(app.active_panel, ActivePanel::Files);
    }

    #[test]
    fn test_enter_on_file_opens_it() {
        let (mut app, recorder) = app_with_file();
        app.navigate_down();
        app.activate();
        assert_eq!(app.session.current_file(), Some("proj/main.c"));
        assert_eq!(app.active_panel, ActivePanel::Fixes);
        assert_eq!(recorder.0.borrow().len(), 2);
    }

    #[test]
    fn test_quit_without_mode_asks_first() {
        let (mut app, recorder) = app_with_file();
        app.request_end_review();
        assert_eq!(app.overlay, Overlay::ConfirmApplyAll);
        assert!(recorder.0.borrow().is_empty());

        app.confirm_end_review();
        assert_eq!(app.overlay, Overlay::None);
        assert!(app.closing_since.is_some());
        assert_eq!(
            recorder.0.borrow().last(),
            Some(&Request::Close {
                mode: ReviewMode::Global
            })
        );

        app.apply_event(SessionEvent::Closed);
        assert!(app.should_quit);
    }

    #[test]
    fn test_space_outside_manual_shows_hint() {
        let (mut app, _recorder) = app_with_file();
        app.navigate_down();
        app.activate();
        // first load carries ticket 1
        app.session.handle(BackgroundMessage::FixListLoaded {
            file: "proj/main.c".to_string(),
            ticket: 1,
            result: Ok(vec![FixRecord::new("1", 0, FixMode::Cast)]),
        });
        app.toggle_selected_fix();
        assert!(app.toast.is_some());
        assert!(app.session.fixes().active_ids().is_empty());

        app.select_mode(ReviewMode::Manual);
        app.toggle_selected_fix();
        assert_eq!(app.session.fixes().active_ids(), vec![FixId::new("1")]);
    }

    #[test]
    fn test_panels_cycle() {
        let (mut app, _recorder) = app_with_file();
        app.toggle_panel();
        app.toggle_panel();
        assert_eq!(app.active_panel, ActivePanel::Source);
        app.toggle_panel();
        assert_eq!(app.active_panel, ActivePanel::Files);
    }
}
