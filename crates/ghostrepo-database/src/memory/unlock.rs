//! In-memory unlock ledger built on `dashmap`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use ghostrepo_core::result::AppResult;
use ghostrepo_entity::unlock::{UnlockGrant, UnlockRecord};

use crate::store::UnlockStore;

/// Unlock records keyed by (token, email) and grants keyed by jti.
#[derive(Debug, Clone, Default)]
pub struct MemoryUnlockStore {
    records: Arc<DashMap<(String, String), UnlockRecord>>,
    grants: Arc<DashMap<Uuid, UnlockGrant>>,
}

impl MemoryUnlockStore {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UnlockStore for MemoryUnlockStore {
    async fn upsert_intent(&self, token: &str, email: &str) -> AppResult<UnlockRecord> {
        let now = Utc::now();
        let mut record = self
            .records
            .entry((token.to_string(), email.to_string()))
            .or_insert_with(|| UnlockRecord {
                id: Uuid::new_v4(),
                share_token: token.to_string(),
                buyer_email: email.to_string(),
                paid: false,
                created_at: now,
                updated_at: now,
            });
        record.updated_at = now;
        Ok(record.clone())
    }

    async fn mark_paid(&self, token: &str, email: Option<&str>) -> AppResult<Option<UnlockRecord>> {
        let key = self
            .records
            .iter()
            .filter(|r| r.share_token == token && !r.paid)
            .filter(|r| email.is_none_or(|e| r.buyer_email == e))
            .max_by_key(|r| r.updated_at)
            .map(|r| r.key().clone());

        let Some(key) = key else {
            return Ok(None);
        };
        Ok(self.records.get_mut(&key).map(|mut record| {
            record.paid = true;
            record.updated_at = Utc::now();
            record.clone()
        }))
    }

    async fn has_paid(&self, token: &str, email: &str) -> AppResult<bool> {
        Ok(self.records.iter().any(|r| {
            r.share_token == token && r.paid && r.buyer_email.eq_ignore_ascii_case(email)
        }))
    }

    async fn insert_grant(&self, grant: &UnlockGrant) -> AppResult<()> {
        self.grants.insert(grant.jti, grant.clone());
        Ok(())
    }

    async fn consume_grant(
        &self,
        jti: Uuid,
        token: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<UnlockGrant>> {
        let Some(mut grant) = self.grants.get_mut(&jti) else {
            return Ok(None);
        };
        if grant.share_token != token || grant.consumed_at.is_some() || grant.expires_at <= now {
            return Ok(None);
        }
        grant.consumed_at = Some(now);
        Ok(Some(grant.clone()))
    }
}
