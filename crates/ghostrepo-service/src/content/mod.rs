//! Repository content resolution for authorized share links.

pub mod binary;
pub mod resolver;
pub mod tree;

pub use binary::is_binary_path;
pub use resolver::{ContentResolver, Hierarchy, ZipArchive};
pub use tree::{build_hierarchy, flatten_hierarchy};
