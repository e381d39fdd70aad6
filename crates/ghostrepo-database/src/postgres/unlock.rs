//! Unlock ledger repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use ghostrepo_core::error::{AppError, ErrorKind};
use ghostrepo_core::result::AppResult;
use ghostrepo_entity::unlock::{UnlockGrant, UnlockRecord};

use crate::store::UnlockStore;

/// Repository for unlock records and unlock grants.
#[derive(Debug, Clone)]
pub struct UnlockRepository {
    pool: PgPool,
}

impl UnlockRepository {
    /// Create a new unlock repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnlockStore for UnlockRepository {
    async fn upsert_intent(&self, token: &str, email: &str) -> AppResult<UnlockRecord> {
        sqlx::query_as::<_, UnlockRecord>(
            "INSERT INTO unlock_records (share_token, buyer_email) VALUES ($1, $2) \
             ON CONFLICT (share_token, buyer_email) DO UPDATE SET updated_at = NOW() \
             RETURNING *",
        )
        .bind(token)
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record unlock intent", e)
        })
    }

    async fn mark_paid(&self, token: &str, email: Option<&str>) -> AppResult<Option<UnlockRecord>> {
        sqlx::query_as::<_, UnlockRecord>(
            "UPDATE unlock_records SET paid = TRUE, updated_at = NOW() \
             WHERE id = ( \
                SELECT id FROM unlock_records \
                WHERE share_token = $1 AND paid = FALSE \
                  AND ($2::text IS NULL OR buyer_email = $2) \
                ORDER BY updated_at DESC LIMIT 1 \
             ) RETURNING *",
        )
        .bind(token)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark unlock paid", e))
    }

    async fn has_paid(&self, token: &str, email: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM unlock_records \
             WHERE share_token = $1 AND lower(buyer_email) = lower($2) AND paid = TRUE)",
        )
        .bind(token)
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check unlock", e))
    }

    async fn insert_grant(&self, grant: &UnlockGrant) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO unlock_grants (jti, share_token, buyer_email, issued_at, expires_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(grant.jti)
        .bind(&grant.share_token)
        .bind(&grant.buyer_email)
        .bind(grant.issued_at)
        .bind(grant.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to store unlock grant", e))?;
        Ok(())
    }

    async fn consume_grant(
        &self,
        jti: Uuid,
        token: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<UnlockGrant>> {
        sqlx::query_as::<_, UnlockGrant>(
            "UPDATE unlock_grants SET consumed_at = $3 \
             WHERE jti = $1 AND share_token = $2 AND consumed_at IS NULL AND expires_at > $3 \
             RETURNING *",
        )
        .bind(jti)
        .bind(token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to redeem unlock grant", e))
    }
}
