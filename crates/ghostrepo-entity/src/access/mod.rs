//! Access gate value objects.

pub mod verdict;

pub use verdict::{AccessVerdict, EXPIRED_MESSAGE, PAYWALL_MESSAGE};
