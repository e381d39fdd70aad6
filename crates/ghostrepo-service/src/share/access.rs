//! The access gate deciding whether a visitor may view a shared repository.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, warn};

use ghostrepo_auth::jwt::claims::password_proof;
use ghostrepo_auth::password::PasswordHasher;
use ghostrepo_core::error::AppError;
use ghostrepo_core::result::AppResult;
use ghostrepo_entity::access::{AccessVerdict, EXPIRED_MESSAGE, PAYWALL_MESSAGE};
use ghostrepo_entity::share::ShareLink;

use super::registry::LinkRegistry;
use crate::unlock::UnlockLedger;

/// Message shown when a lookup fails for reasons the visitor cannot act on.
const GENERIC_INVALID: &str = "This link could not be opened";

/// What a visitor presents to the gate.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Password typed in this request.
    pub password: Option<String>,
    /// Password proof remembered by the visitor pass.
    pub password_proof: Option<i64>,
    /// Buyer email verified by a redeemed unlock grant.
    pub verified_email: Option<String>,
}

/// A verdict together with the link it was computed for.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// The decision.
    pub verdict: AccessVerdict,
    /// The resolved link, absent for invalid tokens.
    pub link: Option<ShareLink>,
}

impl Evaluation {
    fn without_link(verdict: AccessVerdict) -> Self {
        Self {
            verdict,
            link: None,
        }
    }

    /// Proof to remember in a visitor pass once the password check passed.
    pub fn password_proof(&self) -> Option<i64> {
        self.link
            .as_ref()
            .and_then(|l| l.password_set_at)
            .map(password_proof)
    }
}

/// Evaluates share tokens against visitor credentials.
#[derive(Debug, Clone)]
pub struct AccessEvaluator {
    registry: Arc<LinkRegistry>,
    ledger: Arc<UnlockLedger>,
    hasher: Arc<PasswordHasher>,
}

impl AccessEvaluator {
    /// Creates a new access evaluator.
    pub fn new(
        registry: Arc<LinkRegistry>,
        ledger: Arc<UnlockLedger>,
        hasher: Arc<PasswordHasher>,
    ) -> Self {
        Self {
            registry,
            ledger,
            hasher,
        }
    }

    /// Computes the verdict for `token`.
    ///
    /// Precedence: invalid, expired, password, paywall, open. Storage
    /// failures yield an invalid verdict and are logged.
    pub async fn evaluate(&self, token: &str, credentials: &Credentials) -> Evaluation {
        self.evaluate_at(token, credentials, Utc::now()).await
    }

    /// Like [`evaluate`](Self::evaluate) with an explicit clock.
    pub async fn evaluate_at(
        &self,
        token: &str,
        credentials: &Credentials,
        now: DateTime<Utc>,
    ) -> Evaluation {
        let link = match self.registry.get(token).await {
            Ok(Some(link)) if link.is_active() => link,
            Ok(_) => return Evaluation::without_link(AccessVerdict::invalid()),
            Err(e) => {
                error!(error = %e, "Share link lookup failed");
                return Evaluation::without_link(AccessVerdict::Invalid {
                    message: GENERIC_INVALID.to_string(),
                });
            }
        };

        let verdict = match self.decide(&link, credentials, now).await {
            Ok(verdict) => verdict,
            Err(e) => {
                error!(error = %e, repo = %link.full_name(), "Access evaluation failed");
                return Evaluation::without_link(AccessVerdict::Invalid {
                    message: GENERIC_INVALID.to_string(),
                });
            }
        };
        Evaluation {
            verdict,
            link: Some(link),
        }
    }

    /// Resolves a link the visitor may browse, or the error to report.
    pub async fn authorize(&self, token: &str, credentials: &Credentials) -> AppResult<ShareLink> {
        let evaluation = self.evaluate(token, credentials).await;
        match (evaluation.verdict, evaluation.link) {
            (AccessVerdict::Open, Some(link)) => Ok(link),
            (AccessVerdict::Invalid { message }, _) => Err(AppError::not_found(message)),
            (AccessVerdict::Expired, _) => Err(AppError::authorization(EXPIRED_MESSAGE)),
            (AccessVerdict::PasswordRequired { .. }, _) => {
                Err(AppError::authorization("Password required"))
            }
            (AccessVerdict::Paywall { .. }, _) => {
                Err(AppError::authorization(PAYWALL_MESSAGE))
            }
            (AccessVerdict::Open, None) => Err(AppError::not_found("Invalid token")),
        }
    }

    async fn decide(
        &self,
        link: &ShareLink,
        credentials: &Credentials,
        now: DateTime<Utc>,
    ) -> AppResult<AccessVerdict> {
        if link.is_expired_at(now) {
            return Ok(AccessVerdict::Expired);
        }

        if let Some(hash) = &link.password_hash {
            match &credentials.password {
                Some(password) => {
                    if !self.hasher.verify_password(password, hash)? {
                        warn!(repo = %link.full_name(), "Incorrect share password");
                        return Ok(AccessVerdict::PasswordRequired {
                            message: Some("Incorrect password".to_string()),
                        });
                    }
                }
                None => {
                    let expected = link.password_set_at.map(password_proof);
                    if expected.is_none() || credentials.password_proof != expected {
                        return Ok(AccessVerdict::PasswordRequired { message: None });
                    }
                }
            }
        }

        if link.is_paid() {
            let paid = match &credentials.verified_email {
                Some(email) => self.ledger.has_paid_unlock(&link.token, email).await?,
                None => false,
            };
            if !paid {
                return Ok(AccessVerdict::Paywall { price: link.price });
            }
        }

        Ok(AccessVerdict::Open)
    }
}
