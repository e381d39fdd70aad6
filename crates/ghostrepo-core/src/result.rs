//! Convenience result type alias for GhostRepo.

use crate::error::AppError;

/// A specialized `Result` type for GhostRepo operations.
pub type AppResult<T> = Result<T, AppError>;
