//! Single-slot highlight tracking for the selected fix
//!
//! At most one highlight is shown: installing a new one always removes the
//! previous handle first. Geometry responses carry the selection ticket they
//! were requested under, and anything but the newest ticket is dropped.

use crate::fix::{FixId, FixRange};
use crate::viewer::{CodeViewer, HighlightSpan, MarkerHandle};
use tracing::debug;

/// Convert a 1-based backend range into viewer coordinates
pub fn to_viewer_span(range: &FixRange) -> HighlightSpan {
    HighlightSpan {
        start_line: range.start_line.saturating_sub(1),
        start_offset: range.start_offset,
        end_line: range.end_line.saturating_sub(1),
        end_offset: range.end_offset,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Installed {
    fix: FixId,
    handle: MarkerHandle,
    span: HighlightSpan,
}

#[derive(Debug, Default)]
pub struct MarkerSync {
    installed: Option<Installed>,
    pending: Option<(u64, FixId)>,
    next_ticket: u64,
}

impl MarkerSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a selection; returns the ticket the geometry request must carry.
    pub fn begin(&mut self, fix: FixId) -> u64 {
        self.next_ticket = self.next_ticket.saturating_add(1);
        self.pending = Some((self.next_ticket, fix));
        self.next_ticket
    }

    /// True if `ticket` is the latest selection still waiting for geometry
    pub fn is_current(&self, ticket: u64) -> bool {
        matches!(&self.pending, Some((t, _)) if *t == ticket)
    }

    /// Fix currently waiting for geometry
    pub fn pending_fix(&self) -> Option<&FixId> {
        self.pending.as_ref().map(|(_, id)| id)
    }

    /// Fix whose range is currently highlighted
    pub fn highlighted_fix(&self) -> Option<&FixId> {
        self.installed.as_ref().map(|i| &i.fix)
    }

    pub fn highlighted_span(&self) -> Option<HighlightSpan> {
        self.installed.as_ref().map(|i| i.span)
    }

    /// Install the highlight for a completed selection.
    ///
    /// Returns false (and leaves the viewer untouched) for stale tickets.
    pub fn complete<V: CodeViewer>(
        &mut self,
        viewer: &mut V,
        ticket: u64,
        range: &FixRange,
    ) -> bool {
        if !self.is_current(ticket) {
            debug!(ticket, "dropping stale fix geometry");
            return false;
        }
        let Some((_, fix)) = self.pending.take() else {
            return false;
        };
        self.remove_installed(viewer);

        let span = to_viewer_span(range);
        let handle = viewer.add_highlight(span);
        viewer.scroll_to_line(span.start_line);
        self.installed = Some(Installed { fix, handle, span });
        true
    }

    /// Give up on a selection whose geometry failed; the old highlight stays.
    pub fn abandon(&mut self, ticket: u64) -> bool {
        if self.is_current(ticket) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Drop any highlight and any pending selection (file switch)
    pub fn clear<V: CodeViewer>(&mut self, viewer: &mut V) {
        self.pending = None;
        self.remove_installed(viewer);
    }

    /// Put the current highlight back after the viewer's text was replaced.
    pub fn reinstall<V: CodeViewer>(&mut self, viewer: &mut V) {
        if let Some(installed) = self.installed.as_mut() {
            installed.handle = viewer.add_highlight(installed.span);
            viewer.scroll_to_line(installed.span.start_line);
        }
    }

    fn remove_installed<V: CodeViewer>(&mut self, viewer: &mut V) {
        if let Some(old) = self.installed.take() {
            viewer.remove_highlight(old.handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::BufferViewer;

    fn range(start_line: usize, end_line: usize) -> FixRange {
        FixRange {
            start_line,
            end_line,
            start_offset: 2,
            end_offset: 5,
        }
    }

    fn viewer() -> BufferViewer {
        let mut viewer = BufferViewer::new();
        let text: Vec<String> = (1..=40).map(|i| format!("line {}", i)).collect();
        viewer.set_text(&text.join("\n"));
        viewer
    }

    #[test]
    fn test_range_is_converted_to_zero_based_lines() {
        let mut viewer = viewer();
        let mut sync = MarkerSync::new();
        let ticket = sync.begin(FixId::new("f1"));
        assert!(sync.complete(&mut viewer, ticket, &range(10, 12)));

        let span = viewer.highlights().next().copied().unwrap();
        assert_eq!(
            span,
            HighlightSpan {
                start_line: 9,
                start_offset: 2,
                end_line: 11,
                end_offset: 5
            }
        );
        assert_eq!(viewer.scroll_top(), 9);
        assert_eq!(sync.highlighted_fix(), Some(&FixId::new("f1")));
    }

    #[test]
    fn test_new_selection_replaces_old_highlight() {
        let mut viewer = viewer();
        let mut sync = MarkerSync::new();
        let first = sync.begin(FixId::new("a"));
        sync.complete(&mut viewer, first, &range(1, 1));
        let second = sync.begin(FixId::new("b"));
        sync.complete(&mut viewer, second, &range(20, 21));

        assert_eq!(viewer.highlight_count(), 1);
        assert_eq!(sync.highlighted_span().map(|s| s.start_line), Some(19));
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut viewer = viewer();
        let mut sync = MarkerSync::new();
        let stale = sync.begin(FixId::new("a"));
        let fresh = sync.begin(FixId::new("b"));

        assert!(!sync.complete(&mut viewer, stale, &range(3, 3)));
        assert_eq!(viewer.highlight_count(), 0);
        assert!(sync.complete(&mut viewer, fresh, &range(4, 4)));
        assert!(!sync.complete(&mut viewer, fresh, &range(5, 5)));
        assert_eq!(viewer.highlight_count(), 1);
    }

    #[test]
    fn test_abandon_keeps_previous_highlight() {
        let mut viewer = viewer();
        let mut sync = MarkerSync::new();
        let first = sync.begin(FixId::new("a"));
        sync.complete(&mut viewer, first, &range(2, 2));
        let failed = sync.begin(FixId::new("b"));
        assert!(sync.abandon(failed));

        assert_eq!(viewer.highlight_count(), 1);
        assert_eq!(sync.highlighted_fix(), Some(&FixId::new("a")));
        assert!(sync.pending_fix().is_none());
    }

    #[test]
    fn test_clear_invalidates_pending_selection() {
        let mut viewer = viewer();
        let mut sync = MarkerSync::new();
        let first = sync.begin(FixId::new("a"));
        sync.complete(&mut viewer, first, &range(2, 2));
        let pending = sync.begin(FixId::new("b"));
        sync.clear(&mut viewer);

        assert_eq!(viewer.highlight_count(), 0);
        assert!(!sync.complete(&mut viewer, pending, &range(3, 3)));
        assert_eq!(viewer.highlight_count(), 0);
    }

    #[test]
    fn test_reinstall_after_text_replaced() {
        let mut viewer = viewer();
        let mut sync = MarkerSync::new();
        let ticket = sync.begin(FixId::new("a"));
        sync.complete(&mut viewer, ticket, &range(12, 13));
        viewer.set_text("fresh\ntext\n");
        assert_eq!(viewer.highlight_count(), 0);

        sync.reinstall(&mut viewer);
        assert_eq!(viewer.highlight_count(), 1);
        sync.clear(&mut viewer);
        assert_eq!(viewer.highlight_count(), 0);
    }
}
