//! JWT claims shared by owner sessions, visitor passes and unlock grants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims payload.
///
/// `sub` is the owner's GitHub login for sessions and the share token for
/// visitor passes and unlock grants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Token ID. Unlock grants are tracked server-side by this value.
    pub jti: Uuid,
    /// Which credential this is.
    pub token_type: TokenType,
    /// Verified buyer email (passes and grants).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// `password_set_at` of the link, in microseconds, when the visitor
    /// presented the correct password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pwd_at: Option<i64>,
}

/// Distinguishes the signed credentials from one another.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Dashboard session of a repository owner.
    OwnerSession,
    /// HttpOnly cookie remembering a visitor's proofs for one share token.
    VisitorPass,
    /// Single-use proof of a confirmed payment.
    UnlockGrant,
}

/// Password proof value for a link's `password_set_at`.
pub fn password_proof(set_at: DateTime<Utc>) -> i64 {
    set_at.timestamp_micros()
}
