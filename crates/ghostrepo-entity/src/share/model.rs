//! Share link entity model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle state of a share link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "share_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ShareStatus {
    /// The link resolves for visitors.
    Active,
    /// The owner unshared the repository; the row is kept for history.
    Inactive,
}

/// A shareable link exposing one repository under an access policy.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShareLink {
    /// Row identifier.
    pub id: Uuid,
    /// Public share token. Unique and immutable once issued.
    pub token: String,
    /// Repository owner login on GitHub.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// GitHub App installation that grants read access to the repository.
    pub installation_id: i64,
    /// GitHub login of the user who shared the repository.
    pub created_by: String,
    /// Argon2id PHC string of the share password.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// When the current password was set. Visitor passes remember this
    /// value so a password change invalidates them.
    pub password_set_at: Option<DateTime<Utc>>,
    /// When the link stops resolving.
    pub expires_at: Option<DateTime<Utc>>,
    /// Unlock price; zero means free.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Pinned to the top of the owner's dashboard.
    pub pinned: bool,
    /// Lifecycle state.
    pub status: ShareStatus,
    /// When the link was created.
    pub created_at: DateTime<Utc>,
    /// Last settings change.
    pub updated_at: DateTime<Utc>,
}

impl ShareLink {
    /// Whether the link is still shared.
    pub fn is_active(&self) -> bool {
        self.status == ShareStatus::Active
    }

    /// Whether the link has an expiry in the past relative to `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires_at) if expires_at < now)
    }

    /// Whether a password must be presented.
    pub fn is_password_protected(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Whether the link is behind a paywall.
    pub fn is_paid(&self) -> bool {
        self.price > Decimal::ZERO
    }

    /// `owner/repo` display name.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// Data required to create a new share link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShareLink {
    /// Generated share token.
    pub token: String,
    /// Repository owner login.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// GitHub App installation ID.
    pub installation_id: i64,
    /// Sharer's GitHub login.
    pub created_by: String,
}
