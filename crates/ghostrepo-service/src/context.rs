//! Context of an authenticated repository owner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The owner acting on the dashboard endpoints.
///
/// Extracted from the session cookie by the API layer and passed into
/// service methods so every owner operation knows who is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerContext {
    /// GitHub login from the session.
    pub login: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl OwnerContext {
    /// Creates a new owner context.
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            request_time: Utc::now(),
        }
    }
}
