//! Storage traits implemented by every backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use ghostrepo_core::result::AppResult;
use ghostrepo_core::types::pagination::{PageRequest, PageResponse};
use ghostrepo_entity::share::{CreateShareLink, ShareLink, ShareSettingsPatch, ShareStatus};
use ghostrepo_entity::unlock::{UnlockGrant, UnlockRecord};

/// Durable mapping from share token to repository and access policy.
#[async_trait]
pub trait ShareLinkStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new active link. Fails with a conflict error when the token
    /// is already taken or the repository already has an active link.
    async fn insert(&self, data: &CreateShareLink) -> AppResult<ShareLink>;

    /// Find a link by token regardless of status.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<ShareLink>>;

    /// Find the active link for a repository, if any.
    async fn find_active_for_repo(&self, owner: &str, repo: &str)
    -> AppResult<Option<ShareLink>>;

    /// List links created by a user, pinned first, then newest first.
    async fn list_by_creator(
        &self,
        created_by: &str,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareLink>>;

    /// Apply a settings patch. Setting or clearing the password also resets
    /// `password_set_at`. Returns `None` when the token is unknown.
    async fn update_settings(
        &self,
        token: &str,
        patch: &ShareSettingsPatch,
    ) -> AppResult<Option<ShareLink>>;

    /// Change the lifecycle status. Returns whether a row was touched.
    async fn set_status(&self, token: &str, status: ShareStatus) -> AppResult<bool>;
}

/// Ledger of paywall unlocks and the grants minted from them.
///
/// Emails passed in are expected to be normalized already.
#[async_trait]
pub trait UnlockStore: Send + Sync + std::fmt::Debug + 'static {
    /// Create the (token, email) record unpaid, or refresh it. Never flips a
    /// paid record back to unpaid.
    async fn upsert_intent(&self, token: &str, email: &str) -> AppResult<UnlockRecord>;

    /// Mark the most recent pending record for the token paid, restricted to
    /// `email` when given.
    async fn mark_paid(&self, token: &str, email: Option<&str>) -> AppResult<Option<UnlockRecord>>;

    /// Whether a paid record exists for (token, email).
    async fn has_paid(&self, token: &str, email: &str) -> AppResult<bool>;

    /// Persist a newly minted grant.
    async fn insert_grant(&self, grant: &UnlockGrant) -> AppResult<()>;

    /// Atomically consume an unexpired, unconsumed grant for the token.
    async fn consume_grant(
        &self,
        jti: Uuid,
        token: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<UnlockGrant>>;
}
