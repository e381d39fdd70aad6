//! In-process storage backend.

pub mod share;
pub mod unlock;

pub use share::MemoryShareLinkStore;
pub use unlock::MemoryUnlockStore;
