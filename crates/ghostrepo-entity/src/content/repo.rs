//! Repository content responses.

use serde::{Deserialize, Serialize};

use super::tree::EntryKind;

/// A single directory entry returned by the contents endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    /// Entry name.
    pub name: String,
    /// Full path.
    pub path: String,
    /// Entry kind.
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

/// A single file returned by the contents endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    /// File name.
    pub name: String,
    /// Full path.
    pub path: String,
    /// Whether the content was suppressed as binary.
    pub is_binary: bool,
    /// Decoded UTF-8 text, absent for binary files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Content at a path: either one file or a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RepoContent {
    /// A file.
    File(FileContent),
    /// A directory.
    Directory {
        /// Directory entries.
        files: Vec<DirEntry>,
    },
}
