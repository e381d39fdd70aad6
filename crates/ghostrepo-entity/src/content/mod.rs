//! Repository content views mapped from the source-control API.

pub mod repo;
pub mod tree;

pub use repo::{DirEntry, FileContent, RepoContent};
pub use tree::{EntryKind, TreeEntry, TreeListing, TreeNode};
