//! Unlock ledger record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Proof that a buyer started (and possibly completed) a payment to unlock
/// one share token. At most one record exists per (token, email).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UnlockRecord {
    /// Row identifier.
    pub id: Uuid,
    /// Share token the payment unlocks.
    pub share_token: String,
    /// Lowercased buyer email.
    pub buyer_email: String,
    /// Whether the payment was confirmed.
    pub paid: bool,
    /// When checkout was first initiated.
    pub created_at: DateTime<Utc>,
    /// Last change (intent refresh or payment confirmation).
    pub updated_at: DateTime<Utc>,
}

/// Canonical form of a buyer email used for every ledger lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
