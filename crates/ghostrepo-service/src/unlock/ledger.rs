//! Unlock ledger: which buyer emails paid for which share token.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use ghostrepo_auth::jwt::{JwtDecoder, JwtEncoder};
use ghostrepo_core::error::AppError;
use ghostrepo_core::result::AppResult;
use ghostrepo_database::UnlockStore;
use ghostrepo_entity::unlock::{UnlockGrant, UnlockRecord, normalize_email};

/// Durable record of completed payments, plus single-use grants proving them.
#[derive(Debug, Clone)]
pub struct UnlockLedger {
    store: Arc<dyn UnlockStore>,
    encoder: Arc<JwtEncoder>,
    decoder: Arc<JwtDecoder>,
}

impl UnlockLedger {
    /// Creates a new unlock ledger.
    pub fn new(
        store: Arc<dyn UnlockStore>,
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
    ) -> Self {
        Self {
            store,
            encoder,
            decoder,
        }
    }

    /// Records that `email` started paying for `token`. Idempotent; a paid
    /// record stays paid.
    pub async fn record_unlock_intent(&self, token: &str, email: &str) -> AppResult<UnlockRecord> {
        let email = checked_email(email)?;
        self.store.upsert_intent(token, &email).await
    }

    /// Marks the most recent pending record for `token` paid, restricted to
    /// `email` when known. A miss is logged and yields `None`.
    pub async fn mark_paid(
        &self,
        token: &str,
        email: Option<&str>,
    ) -> AppResult<Option<UnlockRecord>> {
        let email = email.map(normalize_email);
        let record = self.store.mark_paid(token, email.as_deref()).await?;
        match &record {
            Some(record) => info!(
                share_token = %token,
                buyer_email = %record.buyer_email,
                "Unlock marked paid"
            ),
            None => warn!(
                share_token = %token,
                buyer_email = ?email,
                "No pending unlock to mark paid"
            ),
        }
        Ok(record)
    }

    /// Whether `email` has a paid unlock for `token`. The only authority for
    /// bypassing a paywall.
    pub async fn has_paid_unlock(&self, token: &str, email: &str) -> AppResult<bool> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Ok(false);
        }
        self.store.has_paid(token, &email).await
    }

    /// Mints a signed single-use grant for a paid (token, email) pair.
    pub async fn issue_grant(&self, token: &str, email: &str) -> AppResult<String> {
        let email = normalize_email(email);
        let jti = Uuid::new_v4();
        let issued_at = Utc::now();
        let (signed, expires_at) = self.encoder.unlock_grant(token, &email, jti, issued_at)?;

        self.store
            .insert_grant(&UnlockGrant {
                jti,
                share_token: token.to_string(),
                buyer_email: email,
                issued_at,
                expires_at,
                consumed_at: None,
            })
            .await?;
        Ok(signed)
    }

    /// Consumes a grant for `token` and returns the verified buyer email.
    pub async fn redeem_grant(&self, token: &str, grant: &str) -> AppResult<String> {
        let claims = self.decoder.decode_unlock_grant(grant, token)?;
        let consumed = self
            .store
            .consume_grant(claims.jti, token, Utc::now())
            .await?
            .ok_or_else(|| AppError::conflict("Unlock grant was already used or has expired"))?;

        if !self.has_paid_unlock(token, &consumed.buyer_email).await? {
            return Err(AppError::authorization("No confirmed payment for this grant"));
        }
        info!(share_token = %token, buyer_email = %consumed.buyer_email, "Unlock grant redeemed");
        Ok(consumed.buyer_email)
    }
}

/// Normalizes an email and rejects obviously unusable values.
pub(crate) fn checked_email(email: &str) -> AppResult<String> {
    let email = normalize_email(email);
    let valid = email.len() <= 254
        && !email.chars().any(char::is_whitespace)
        && matches!(email.split_once('@'), Some((local, domain)) if !local.is_empty() && domain.contains('.') && !domain.contains('@'));
    if !valid {
        return Err(AppError::validation("A valid email address is required"));
    }
    Ok(email)
}
