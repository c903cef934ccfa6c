//! Remote session endpoint
//!
//! Request shapes, response parsing, and the `Dispatcher` seam through which
//! the session issues fire-and-continue requests. The HTTP side lives in
//! `client`; completions come back to the UI thread as background messages.

pub mod client;

use crate::filetree::FileNode;
use crate::fix::hierarchy::{self, FixListEntry};
use crate::fix::{FixId, FixMode, FixPayload, FixRange, FixRecord};
use crate::session::ReviewMode;
use serde_json::{Map, Value};
use thiserror::Error;

pub use client::EndpointClient;

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("endpoint unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("endpoint returned HTTP {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl EndpointError {
    /// Transport-level failure (unreachable, timeout, bad status)
    pub fn is_transport(&self) -> bool {
        matches!(self, EndpointError::Transport(_) | EndpointError::Status(_))
    }
}

/// One request to the endpoint.
///
/// Requests whose response feeds back into state carry the ticket they were
/// issued under, so late responses can be recognized and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    FileTree,
    Source {
        file: String,
        ticket: u64,
    },
    FixList {
        file: String,
        mode: ReviewMode,
        ticket: u64,
    },
    FixDraw {
        id: FixId,
        ticket: u64,
    },
    Cache {
        file: String,
        ids: Vec<FixId>,
    },
    Close {
        mode: ReviewMode,
    },
    Clear,
}

impl Request {
    /// Short name for logs and background task labels
    pub fn name(&self) -> &'static str {
        match self {
            Request::FileTree => "file_tree",
            Request::Source { .. } => "source",
            Request::FixList { .. } => "fix_list",
            Request::FixDraw { .. } => "fix_draw",
            Request::Cache { .. } => "cache",
            Request::Close { .. } => "close",
            Request::Clear => "clear",
        }
    }

    /// Form fields for POST requests; `None` for the GET source request
    pub fn form(&self) -> Option<Vec<(&'static str, String)>> {
        let fields = match self {
            Request::Source { .. } => return None,
            Request::FileTree => vec![("dir", "fileTree".to_string())],
            Request::FixList { file, mode, .. } => vec![
                ("dir", "fixList".to_string()),
                ("file", file.clone()),
                ("mode", mode.as_wire().to_string()),
            ],
            Request::FixDraw { id, .. } => {
                vec![("dir", "fixDraw".to_string()), ("id", id.to_string())]
            }
            Request::Cache { file, ids } => vec![
                ("op", "cache".to_string()),
                ("file", file.clone()),
                ("list", encode_id_list(ids)),
            ],
            Request::Close { mode } => vec![
                ("op", "close".to_string()),
                ("mode", mode.as_wire().to_string()),
            ],
            Request::Clear => vec![("op", "clear".to_string())],
        };
        Some(fields)
    }
}

/// Issues requests without waiting for them.
///
/// Implementations deliver completions back to the session asynchronously.
pub trait Dispatcher {
    fn dispatch(&self, request: Request);
}

/// Stringified id collection for cache requests
pub fn encode_id_list(ids: &[FixId]) -> String {
    let raw: Vec<&str> = ids.iter().map(FixId::as_str).collect();
    serde_json::to_string(&raw).unwrap_or_else(|_| "[]".to_string())
}

/// Geometry and payload for one fix
#[derive(Debug, Clone, PartialEq)]
pub struct FixGeometry {
    pub range: FixRange,
    pub mode: FixMode,
    pub payload: FixPayload,
}

pub fn parse_fix_list(body: &str) -> Result<Vec<FixRecord>, EndpointError> {
    let entries: Vec<FixListEntry> =
        serde_json::from_str(body).map_err(|e| EndpointError::Malformed(e.to_string()))?;
    hierarchy::flatten(&entries).map_err(|e| EndpointError::Malformed(e.to_string()))
}

pub fn parse_file_tree(body: &str) -> Result<Vec<FileNode>, EndpointError> {
    serde_json::from_str(body).map_err(|e| EndpointError::Malformed(e.to_string()))
}

pub fn parse_fix_draw(body: &str) -> Result<FixGeometry, EndpointError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| EndpointError::Malformed(e.to_string()))?;
    let Value::Object(map) = value else {
        return Err(EndpointError::Malformed(
            "fix geometry is not an object".to_string(),
        ));
    };

    let required = |key: &str| {
        int_field(&map, key)
            .ok_or_else(|| EndpointError::Malformed(format!("missing or invalid {}", key)))
    };
    let range = FixRange {
        start_line: required("startLine")?,
        end_line: required("endLine")?,
        start_offset: required("startOffset")?,
        end_offset: required("endOffset")?,
    };
    if !range.is_valid() {
        return Err(EndpointError::Malformed(format!(
            "invalid range {}..{}",
            range.start_line, range.end_line
        )));
    }

    let mode = FixMode::parse(&str_field(&map, "mode").unwrap_or_default());
    Ok(FixGeometry {
        range,
        mode,
        payload: payload_from_map(&map),
    })
}

/// Build a payload field by field so one odd value doesn't sink the rest
fn payload_from_map(map: &Map<String, Value>) -> FixPayload {
    FixPayload {
        defect: str_field(map, "_defect"),
        arity: int_field(map, "_ary").and_then(|n| u8::try_from(n).ok()),
        operand: str_field(map, "_op"),
        left: str_field(map, "_op1"),
        right: str_field(map, "_op2"),
        operator: str_field(map, "_optr"),
        signed: int_field(map, "_sign")
            .and_then(|n| u8::try_from(n).ok())
            .or_else(|| map.get("_sign").and_then(Value::as_bool).map(u8::from)),
        origin: str_field(map, "_origin"),
        target: str_field(map, "_target"),
        variable: str_field(map, "_var"),
    }
}

fn str_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn int_field(map: &Map<String, Value>, key: &str) -> Option<usize> {
    match map.get(key)? {
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
