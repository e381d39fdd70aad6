//! Repository tree listings.

use serde::{Deserialize, Serialize};

/// Kind of an entry in a git tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A directory.
    Tree,
    /// A file.
    Blob,
    /// A submodule pointer.
    Commit,
}

impl EntryKind {
    /// Whether entries of this kind can have children.
    pub fn is_dir(self) -> bool {
        matches!(self, Self::Tree)
    }
}

/// One entry of a flat, recursive tree listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Slash-separated path from the repository root.
    pub path: String,
    /// Entry kind.
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Blob size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Whether the viewer should suppress this file's content.
    #[serde(default)]
    pub is_binary: bool,
}

/// A recursive tree listing pinned to one commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeListing {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Resolved branch name.
    pub branch: String,
    /// Commit SHA the branch pointed to.
    pub sha: String,
    /// Upstream cut the listing short.
    pub truncated: bool,
    /// Flat entries in upstream order.
    pub tree: Vec<TreeEntry>,
}

/// A node of the nested hierarchy built from a flat listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Last path segment.
    pub name: String,
    /// Node kind.
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Full path from the repository root.
    pub path: String,
    /// Child nodes; empty for files.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}
