//! Flat tree listing to nested hierarchy.

use std::cmp::Ordering;

use ghostrepo_entity::content::{EntryKind, TreeEntry, TreeNode};

use super::binary::is_binary_path;

/// Builds the nested view of a flat listing.
///
/// Intermediate directories are created on demand and de-duplicated by
/// name within each level. Every level is sorted directories first, then by
/// name.
pub fn build_hierarchy(entries: &[TreeEntry]) -> Vec<TreeNode> {
    let mut roots = Vec::new();
    for entry in entries {
        let segments: Vec<&str> = entry.path.split('/').filter(|s| !s.is_empty()).collect();
        if !segments.is_empty() {
            insert(&mut roots, &segments, 0, entry.kind);
        }
    }
    sort_level(&mut roots);
    roots
}

/// Depth-first listing of a hierarchy, parents before their children.
pub fn flatten_hierarchy(nodes: &[TreeNode]) -> Vec<TreeEntry> {
    let mut out = Vec::new();
    walk(nodes, &mut out);
    out
}

fn insert(level: &mut Vec<TreeNode>, segments: &[&str], depth: usize, leaf_kind: EntryKind) {
    let name = segments[depth];
    let is_leaf = depth + 1 == segments.len();
    let kind = if is_leaf { leaf_kind } else { EntryKind::Tree };

    let index = match level
        .iter()
        .position(|n| n.name == name && n.kind.is_dir() == kind.is_dir())
    {
        Some(index) => index,
        None => {
            level.push(TreeNode {
                name: name.to_string(),
                kind,
                path: segments[..=depth].join("/"),
                children: Vec::new(),
            });
            level.len() - 1
        }
    };

    if !is_leaf {
        insert(&mut level[index].children, segments, depth + 1, leaf_kind);
    }
}

fn sort_level(level: &mut [TreeNode]) {
    level.sort_by(compare);
    for node in level.iter_mut() {
        sort_level(&mut node.children);
    }
}

fn compare(a: &TreeNode, b: &TreeNode) -> Ordering {
    b.kind
        .is_dir()
        .cmp(&a.kind.is_dir())
        .then_with(|| a.name.cmp(&b.name))
}

fn walk(nodes: &[TreeNode], out: &mut Vec<TreeEntry>) {
    for node in nodes {
        out.push(TreeEntry {
            path: node.path.clone(),
            kind: node.kind,
            size: None,
            is_binary: node.kind == EntryKind::Blob && is_binary_path(&node.path),
        });
        walk(&node.children, out);
    }
}
