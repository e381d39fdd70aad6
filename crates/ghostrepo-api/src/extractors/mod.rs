//! Custom Axum extractors.

pub mod owner;
pub mod pagination;
pub mod visitor;

pub use owner::OwnerUser;
pub use pagination::PageQuery;
pub use visitor::Visitor;
