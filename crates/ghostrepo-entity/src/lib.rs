//! # ghostrepo-entity
//!
//! Domain entity models for GhostRepo. Structs in this crate are either
//! database rows (deriving `sqlx::FromRow`) or value objects passed between
//! the service and API layers.

pub mod access;
pub mod content;
pub mod share;
pub mod unlock;
