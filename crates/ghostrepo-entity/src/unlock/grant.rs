//! Single-use unlock grants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Server-side record of a signed unlock grant handed out after a confirmed
/// payment. The grant's `jti` can be redeemed exactly once.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UnlockGrant {
    /// Grant identifier (the `jti` claim of the signed token).
    pub jti: Uuid,
    /// Share token the grant unlocks.
    pub share_token: String,
    /// Lowercased buyer email.
    pub buyer_email: String,
    /// When the grant was issued.
    pub issued_at: DateTime<Utc>,
    /// When the grant stops being redeemable.
    pub expires_at: DateTime<Utc>,
    /// When the grant was redeemed.
    pub consumed_at: Option<DateTime<Utc>>,
}
