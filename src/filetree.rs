use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Explicit node kind, when the backend says which one it is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    #[serde(alias = "directory", alias = "folder")]
    Dir,
    File,
}

/// A node of the file tree the backend sends.
///
/// A `type` hint wins. Without one, a node carrying a `children` key is a
/// folder (even an empty one) and a node without it is a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileNode>>,
}

impl FileNode {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            children: None,
        }
    }

    pub fn dir(name: impl Into<String>, children: Vec<FileNode>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            children: Some(children),
        }
    }

    pub fn is_dir(&self) -> bool {
        match self.kind {
            Some(kind) => kind == NodeKind::Dir,
            None => self.children.is_some(),
        }
    }

    pub fn children(&self) -> &[FileNode] {
        self.children.as_deref().unwrap_or(&[])
    }
}

/// One row of the flattened tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatTreeEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub depth: usize,
}

/// Build a flat file tree for display.
///
/// At each level folders come before files, each sorted by name
/// (case-insensitive).
pub fn build_file_tree(roots: &[FileNode]) -> Vec<FlatTreeEntry> {
    let mut entries = Vec::new();
    push_level(roots, &PathBuf::new(), 0, &mut entries);
    entries
}

fn push_level(
    nodes: &[FileNode],
    parent: &PathBuf,
    depth: usize,
    out: &mut Vec<FlatTreeEntry>,
) {
    let mut sorted: Vec<&FileNode> = nodes.iter().collect();
    sorted.sort_by(|a, b| {
        b.is_dir()
            .cmp(&a.is_dir())
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });

    for node in sorted {
        let path = parent.join(&node.name);
        out.push(FlatTreeEntry {
            name: node.name.clone(),
            path: path.clone(),
            is_dir: node.is_dir(),
            depth,
        });
        if node.is_dir() {
            push_level(node.children(), &path, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folders_before_files_and_paths_joined() {
        let roots = vec![FileNode::dir(
            "/home/u/proj",
            vec![
                FileNode::file("main.c"),
                FileNode::dir("lib", vec![FileNode::file("b.c"), FileNode::file("A.c")]),
            ],
        )];
        let flat = build_file_tree(&roots);
        let shape: Vec<(&str, usize, bool)> = flat
            .iter()
            .map(|e| (e.name.as_str(), e.depth, e.is_dir))
            .collect();
        assert_eq!(
            shape,
            vec![
                ("/home/u/proj", 0, true),
                ("lib", 1, true),
                ("A.c", 2, false),
                ("b.c", 2, false),
                ("main.c", 1, false),
            ]
        );
        assert_eq!(flat[2].path, PathBuf::from("/home/u/proj/lib/A.c"));
    }

    #[test]
    fn test_parse_from_backend_json() {
        let roots: Vec<FileNode> =
            serde_json::from_str(r#"[{"name":"src","children":[{"name":"x.c"}]}]"#).unwrap();
        let flat = build_file_tree(&roots);
        assert_eq!(flat.len(), 2);
        assert!(flat[0].is_dir);
        assert!(!flat[1].is_dir);
    }

    #[test]
    fn test_empty_folder_stays_a_folder() {
        let roots: Vec<FileNode> = serde_json::from_str(
            r#"[{"name":"proj","children":[{"name":"empty","children":[]},{"name":"a.c"}]}]"#,
        )
        .unwrap();
        let flat = build_file_tree(&roots);
        let shape: Vec<(&str, bool)> = flat.iter().map(|e| (e.name.as_str(), e.is_dir)).collect();
        assert_eq!(shape, vec![("proj", true), ("empty", true), ("a.c", false)]);
    }

    #[test]
    fn test_type_hint_overrides_children() {
        let roots: Vec<FileNode> = serde_json::from_str(
            r#"[
                {"name":"vendor","type":"directory"},
                {"name":"gen.c","type":"file","children":[]}
            ]"#,
        )
        .unwrap();
        let flat = build_file_tree(&roots);
        let shape: Vec<(&str, bool)> = flat.iter().map(|e| (e.name.as_str(), e.is_dir)).collect();
        assert_eq!(shape, vec![("vendor", true), ("gen.c", false)]);
    }
}
