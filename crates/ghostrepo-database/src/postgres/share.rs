//! Share link repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use ghostrepo_core::error::{AppError, ErrorKind};
use ghostrepo_core::result::AppResult;
use ghostrepo_core::types::pagination::{PageRequest, PageResponse};
use ghostrepo_entity::share::{CreateShareLink, ShareLink, ShareSettingsPatch, ShareStatus};

use crate::store::ShareLinkStore;

/// Repository for share link CRUD and token lookup.
#[derive(Debug, Clone)]
pub struct ShareLinkRepository {
    pool: PgPool,
}

impl ShareLinkRepository {
    /// Create a new share link repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareLinkStore for ShareLinkRepository {
    async fn insert(&self, data: &CreateShareLink) -> AppResult<ShareLink> {
        sqlx::query_as::<_, ShareLink>(
            "INSERT INTO share_links (token, owner, repo, installation_id, created_by) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&data.token)
        .bind(&data.owner)
        .bind(&data.repo)
        .bind(data.installation_id)
        .bind(&data.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let kind = match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => ErrorKind::Conflict,
                _ => ErrorKind::Database,
            };
            AppError::with_source(kind, "Failed to create share link", e)
        })
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<ShareLink>> {
        sqlx::query_as::<_, ShareLink>("SELECT * FROM share_links WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find share link", e)
            })
    }

    async fn find_active_for_repo(
        &self,
        owner: &str,
        repo: &str,
    ) -> AppResult<Option<ShareLink>> {
        sqlx::query_as::<_, ShareLink>(
            "SELECT * FROM share_links WHERE owner = $1 AND repo = $2 AND status = 'active' \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(owner)
        .bind(repo)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find share link for repo", e)
        })
    }

    async fn list_by_creator(
        &self,
        created_by: &str,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareLink>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM share_links WHERE created_by = $1")
                .bind(created_by)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count share links", e)
                })?;

        let links = sqlx::query_as::<_, ShareLink>(
            "SELECT * FROM share_links WHERE created_by = $1 \
             ORDER BY pinned DESC, created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(created_by)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list share links", e))?;

        Ok(PageResponse::new(
            links,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn update_settings(
        &self,
        token: &str,
        patch: &ShareSettingsPatch,
    ) -> AppResult<Option<ShareLink>> {
        let set_password = patch.password_hash.is_some();
        let password_hash = patch.password_hash.clone().flatten();
        let set_expiry = patch.expires_at.is_some();
        let expires_at = patch.expires_at.flatten();

        sqlx::query_as::<_, ShareLink>(
            "UPDATE share_links SET \
                price = COALESCE($2, price), \
                password_hash = CASE WHEN $3 THEN $4 ELSE password_hash END, \
                password_set_at = CASE WHEN $3 THEN \
                    (CASE WHEN $4::text IS NULL THEN NULL ELSE NOW() END) \
                    ELSE password_set_at END, \
                expires_at = CASE WHEN $5 THEN $6 ELSE expires_at END, \
                pinned = COALESCE($7, pinned), \
                updated_at = NOW() \
             WHERE token = $1 RETURNING *",
        )
        .bind(token)
        .bind(patch.price)
        .bind(set_password)
        .bind(password_hash)
        .bind(set_expiry)
        .bind(expires_at)
        .bind(patch.pinned)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update share link", e))
    }

    async fn set_status(&self, token: &str, status: ShareStatus) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE share_links SET status = $2, updated_at = NOW() WHERE token = $1",
        )
        .bind(token)
        .bind(status)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to change share link status", e)
        })?;
        Ok(result.rows_affected() > 0)
    }
}
