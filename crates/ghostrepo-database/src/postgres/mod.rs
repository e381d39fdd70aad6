//! PostgreSQL-backed repositories.

pub mod share;
pub mod unlock;

pub use share::ShareLinkRepository;
pub use unlock::UnlockRepository;
