//! # ghostrepo-service
//!
//! Business logic for GhostRepo. Each service orchestrates storage, signed
//! credentials and upstream clients to implement one part of the sharing
//! flow.
//!
//! Services follow constructor injection: all dependencies are provided at
//! construction time via `Arc` references.

pub mod content;
pub mod context;
pub mod share;
pub mod unlock;

#[cfg(test)]
pub(crate) mod testing;

pub use content::ContentResolver;
pub use context::OwnerContext;
pub use share::{AccessEvaluator, Credentials, Evaluation, LinkRegistry, LinkService};
pub use unlock::{CheckoutService, UnlockLedger};
