//! Read-only code viewer contract
//!
//! The session drives the viewer through `CodeViewer`; coordinates are
//! 0-based lines with column offsets. `BufferViewer` is the in-memory
//! implementation the source pane renders from.

use std::collections::BTreeMap;

/// Handle returned by `add_highlight`, used to remove it later
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerHandle(u64);

/// A highlighted region in viewer coordinates (0-based lines)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    pub start_line: usize,
    pub start_offset: usize,
    pub end_line: usize,
    pub end_offset: usize,
}

impl HighlightSpan {
    pub fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }

    /// Column range covered on `line`, given the line's length
    pub fn columns_on(&self, line: usize, line_len: usize) -> Option<(usize, usize)> {
        if !self.contains_line(line) {
            return None;
        }
        let start = if line == self.start_line {
            self.start_offset.min(line_len)
        } else {
            0
        };
        let end = if line == self.end_line {
            self.end_offset.min(line_len)
        } else {
            line_len
        };
        Some((start, end.max(start)))
    }
}

pub trait CodeViewer {
    fn set_text(&mut self, content: &str);
    fn clear_annotations(&mut self);
    fn add_highlight(&mut self, span: HighlightSpan) -> MarkerHandle;
    fn remove_highlight(&mut self, handle: MarkerHandle);
    fn scroll_to_line(&mut self, line: usize);
}

/// In-memory viewer state
#[derive(Debug, Clone, Default)]
pub struct BufferViewer {
    lines: Vec<String>,
    highlights: BTreeMap<MarkerHandle, HighlightSpan>,
    next_handle: u64,
    scroll_top: usize,
}

impl BufferViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    pub fn highlights(&self) -> impl Iterator<Item = &HighlightSpan> {
        self.highlights.values()
    }

    pub fn highlight_count(&self) -> usize {
        self.highlights.len()
    }

    /// Scroll by a signed number of lines, clamped to the text
    pub fn scroll_by(&mut self, delta: isize) {
        let max = self.lines.len().saturating_sub(1);
        self.scroll_top = self.scroll_top.saturating_add_signed(delta).min(max);
    }
}

impl CodeViewer for BufferViewer {
    fn set_text(&mut self, content: &str) {
        self.lines = content.lines().map(str::to_string).collect();
        self.highlights.clear();
        self.scroll_top = 0;
    }

    fn clear_annotations(&mut self) {
        self.highlights.clear();
    }

    fn add_highlight(&mut self, span: HighlightSpan) -> MarkerHandle {
        let handle = MarkerHandle(self.next_handle);
        self.next_handle = self.next_handle.saturating_add(1);
        self.highlights.insert(handle, span);
        handle
    }

    fn remove_highlight(&mut self, handle: MarkerHandle) {
        self.highlights.remove(&handle);
    }

    fn scroll_to_line(&mut self, line: usize) {
        self.scroll_top = line.min(self.lines.len().saturating_sub(1));
    }
}
