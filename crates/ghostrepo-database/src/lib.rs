//! # ghostrepo-database
//!
//! Durable storage for share links, unlock records and unlock grants.
//! PostgreSQL is the production backend; an in-process backend built on
//! `dashmap` serves local runs and tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod provider;
pub mod store;

pub use provider::Stores;
pub use store::{ShareLinkStore, UnlockStore};
