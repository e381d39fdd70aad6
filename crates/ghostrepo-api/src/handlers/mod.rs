//! Request handlers grouped by domain.

pub mod access;
pub mod content;
pub mod health;
pub mod share;
pub mod stripe;
