//! Fix records for the file under review
//!
//! A file's fixes arrive from the endpoint as a flat list where nesting is
//! encoded by `depth` in pre-order: a record at depth `d` owns the contiguous
//! run of following records deeper than `d`. `FixList` keeps that flat shape
//! (it is what the backend delivers and what the list panel renders) and
//! answers parent/children/subtree questions on demand.

pub mod cascade;
pub mod detail;
pub mod hierarchy;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use cascade::{cascade, Direction};
pub use detail::{render_detail, FixDetail, FixPayload};

/// Opaque fix identifier, unique within one file's list
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixId(pub String);

impl FixId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FixId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FixId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Category of a suggested fix
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixMode {
    /// Change a declared type
    Specifier,
    /// Insert an arithmetic overflow check
    CheckArith,
    /// Insert a range check before a conversion
    CheckConv,
    /// Insert an explicit cast
    Cast,
    /// Anything the backend sent that we don't recognize
    Unknown(String),
}

impl FixMode {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "SPECIFIER" => FixMode::Specifier,
            "CHECK_ARITH" => FixMode::CheckArith,
            "CHECK_CONV" => FixMode::CheckConv,
            "CAST" => FixMode::Cast,
            _ => FixMode::Unknown(raw.to_string()),
        }
    }

    /// Short label for the fix list
    pub fn label(&self) -> &str {
        match self {
            FixMode::Specifier => "Specifier",
            FixMode::CheckArith => "Arith check",
            FixMode::CheckConv => "Conv check",
            FixMode::Cast => "Cast",
            FixMode::Unknown(raw) => raw.as_str(),
        }
    }
}

/// 1-based source range as reported by the backend.
///
/// Offsets are column offsets within the start and end lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixRange {
    pub start_line: usize,
    pub end_line: usize,
    pub start_offset: usize,
    pub end_offset: usize,
}

impl FixRange {
    pub fn is_valid(&self) -> bool {
        self.start_line >= 1 && self.end_line >= self.start_line
    }
}

/// One suggested fix in the current file's list
#[derive(Debug, Clone, PartialEq)]
pub struct FixRecord {
    pub id: FixId,
    pub depth: usize,
    pub mode: FixMode,
    pub range: Option<FixRange>,
    pub active: bool,
}

impl FixRecord {
    pub fn new(id: impl Into<FixId>, depth: usize, mode: FixMode) -> Self {
        Self {
            id: id.into(),
            depth,
            mode,
            range: None,
            active: false,
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_range(mut self, range: FixRange) -> Self {
        self.range = Some(range);
        self
    }
}

impl From<String> for FixId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The fix store for the file currently displayed.
///
/// Replaced wholesale on every file switch, never merged.
#[derive(Debug, Clone, Default)]
pub struct FixList {
    file: Option<String>,
    records: Vec<FixRecord>,
}

impl FixList {
    pub fn new(file: impl Into<String>, records: Vec<FixRecord>) -> Self {
        Self {
            file: Some(file.into()),
            records,
        }
    }

    /// File these records belong to (None before the first load)
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn records(&self) -> &[FixRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&FixRecord> {
        self.records.get(idx)
    }

    pub fn position(&self, id: &FixId) -> Option<usize> {
        self.records.iter().position(|r| &r.id == id)
    }

    pub fn find(&self, id: &FixId) -> Option<&FixRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Ids of every active record, in list order
    pub fn active_ids(&self) -> Vec<FixId> {
        self.records
            .iter()
            .filter(|r| r.active)
            .map(|r| r.id.clone())
            .collect()
    }

    pub fn activate_all(&mut self) {
        for record in &mut self.records {
            record.active = true;
        }
    }

    /// Exclusive end of the subtree rooted at `idx`.
    pub fn subtree_end(&self, idx: usize) -> usize {
        subtree_end(&self.records, idx)
    }

    /// Nearest enclosing record, if any.
    pub fn parent(&self, idx: usize) -> Option<usize> {
        parent(&self.records, idx)
    }

    /// Strict ancestors from nearest to the root.
    pub fn ancestors(&self, idx: usize) -> Vec<usize> {
        ancestors(&self.records, idx)
    }

    /// Direct children of `idx`.
    ///
    /// With depth jumps larger than one, a child is any record in the subtree
    /// whose nearest enclosing record is `idx`.
    pub fn children(&self, idx: usize) -> Vec<usize> {
        let end = self.subtree_end(idx);
        ((idx + 1)..end)
            .filter(|&j| self.parent(j) == Some(idx))
            .collect()
    }

    /// Indexes of every record in the subtree below `idx` (excluding `idx`)
    pub fn descendants(&self, idx: usize) -> std::ops::Range<usize> {
        let start = (idx + 1).min(self.records.len());
        start..self.subtree_end(idx).max(start)
    }

    /// Indexes of the depth-0 roots
    pub fn roots(&self) -> Vec<usize> {
        (0..self.records.len())
            .filter(|&i| self.parent(i).is_none())
            .collect()
    }

    pub(crate) fn records_mut(&mut self) -> &mut [FixRecord] {
        &mut self.records
    }
}

pub(crate) fn subtree_end(records: &[FixRecord], idx: usize) -> usize {
    let Some(root) = records.get(idx) else {
        return records.len();
    };
    records[idx + 1..]
        .iter()
        .position(|r| r.depth <= root.depth)
        .map(|offset| idx + 1 + offset)
        .unwrap_or(records.len())
}

pub(crate) fn parent(records: &[FixRecord], idx: usize) -> Option<usize> {
    let depth = records.get(idx)?.depth;
    records[..idx].iter().rposition(|r| r.depth < depth)
}

pub(crate) fn ancestors(records: &[FixRecord], idx: usize) -> Vec<usize> {
    let mut chain = Vec::new();
    let mut current = idx;
    while let Some(p) = parent(records, current) {
        chain.push(p);
        current = p;
    }
    chain
}
