//! # ghostrepo-api
//!
//! HTTP API layer for GhostRepo built on Axum.
//!
//! Provides the owner dashboard endpoints, the visitor gate and content
//! endpoints, the checkout round-trip, middleware (CORS, logging), cookie
//! extractors, DTOs and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
