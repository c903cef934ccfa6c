//! Fix list wire entries and their flattening into depth-ordered records
//!
//! The backend may deliver fixes either nested (`children` arrays, one level
//! per enclosing fix) or already flat with an explicit `depth`. Both end up
//! as the same pre-order list.

use super::{FixId, FixMode, FixRange, FixRecord};
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("duplicate fix id {0}")]
    DuplicateId(FixId),
    #[error("fix entry has an empty id")]
    EmptyId,
}

/// One entry of a fix list as sent by the backend
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixListEntry {
    #[serde(deserialize_with = "id_from_any")]
    pub id: FixId,
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub depth: Option<usize>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub children: Vec<FixListEntry>,
    #[serde(default)]
    pub start_line: Option<usize>,
    #[serde(default)]
    pub end_line: Option<usize>,
    #[serde(default)]
    pub start_offset: Option<usize>,
    #[serde(default)]
    pub end_offset: Option<usize>,
}

impl FixListEntry {
    fn range(&self) -> Option<FixRange> {
        let range = FixRange {
            start_line: self.start_line?,
            end_line: self.end_line?,
            start_offset: self.start_offset?,
            end_offset: self.end_offset?,
        };
        range.is_valid().then_some(range)
    }
}

/// Ids may come as strings or numbers
fn id_from_any<'de, D>(deserializer: D) -> Result<FixId, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(FixId(s)),
        serde_json::Value::Number(n) => Ok(FixId(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "fix id must be a string or number, got {}",
            other
        ))),
    }
}

/// Flatten nested entries into pre-order records.
pub fn flatten(entries: &[FixListEntry]) -> Result<Vec<FixRecord>, HierarchyError> {
    let mut records = Vec::new();
    let mut seen = HashSet::new();
    flatten_into(entries, 0, &mut records, &mut seen)?;
    Ok(records)
}

fn flatten_into(
    entries: &[FixListEntry],
    level: usize,
    out: &mut Vec<FixRecord>,
    seen: &mut HashSet<FixId>,
) -> Result<(), HierarchyError> {
    for entry in entries {
        if entry.id.as_str().trim().is_empty() {
            return Err(HierarchyError::EmptyId);
        }
        if !seen.insert(entry.id.clone()) {
            return Err(HierarchyError::DuplicateId(entry.id.clone()));
        }
        out.push(FixRecord {
            id: entry.id.clone(),
            depth: entry.depth.unwrap_or(level),
            mode: FixMode::parse(&entry.mode),
            range: entry.range(),
            active: entry.active,
        });
        flatten_into(&entry.children, level + 1, out, seen)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Vec<FixListEntry> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_nested_entries_flatten_in_preorder() {
        let entries = parse(
            r#"[
                {"id":"A","mode":"CHECK_ARITH","children":[
                    {"id":"B","mode":"CAST","children":[{"id":"C","mode":"CAST"}]},
                    {"id":"D","mode":"CHECK_CONV"}
                ]},
                {"id":"E","mode":"SPECIFIER"}
            ]"#,
        );
        let records = flatten(&entries).unwrap();
        let shape: Vec<(&str, usize)> = records.iter().map(|r| (r.id.as_str(), r.depth)).collect();
        assert_eq!(shape, vec![("A", 0), ("B", 1), ("C", 2), ("D", 1), ("E", 0)]);
        assert_eq!(records[4].mode, FixMode::Specifier);
    }

    #[test]
    fn test_flat_entries_keep_explicit_depth_and_active() {
        let entries = parse(
            r#"[
                {"id":3,"mode":"CAST","depth":0,"active":true,
                 "startLine":4,"endLine":4,"startOffset":2,"endOffset":9},
                {"id":7,"mode":"CAST","depth":2}
            ]"#,
        );
        let records = flatten(&entries).unwrap();
        assert_eq!(records[0].id, FixId::new("3"));
        assert!(records[0].active);
        assert_eq!(
            records[0].range,
            Some(FixRange {
                start_line: 4,
                end_line: 4,
                start_offset: 2,
                end_offset: 9
            })
        );
        assert_eq!(records[1].depth, 2);
        assert!(!records[1].active);
        assert!(records[1].range.is_none());
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let entries = parse(r#"[{"id":"A","children":[{"id":"A"}]}]"#);
        assert_eq!(
            flatten(&entries),
            Err(HierarchyError::DuplicateId(FixId::new("A")))
        );
    }

    #[test]
    fn test_non_scalar_id_fails_to_parse() {
        let result: Result<Vec<FixListEntry>, _> = serde_json::from_str(r#"[{"id":[1]}]"#);
        assert!(result.is_err());
    }
}
