//! Hosted checkout for paywalled links.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

use ghostrepo_billing::{CheckoutRequest, PaymentGateway};
use ghostrepo_core::config::{PaymentConfig, ServerConfig};
use ghostrepo_core::error::{AppError, ErrorKind};
use ghostrepo_core::result::AppResult;
use ghostrepo_entity::share::ShareLink;

use super::ledger::{UnlockLedger, checked_email};
use crate::share::LinkRegistry;

/// Visitor request to pay for a link.
#[derive(Debug, Clone, Deserialize)]
pub struct StartCheckout {
    /// Share token to unlock.
    pub token: String,
    /// Amount the visitor saw; must match the stored price when given.
    pub amount: Option<Decimal>,
    /// Display name of the repository.
    pub repo_name: Option<String>,
    /// Buyer email.
    pub email: String,
}

/// Starts checkouts and turns confirmed payments into unlock grants.
#[derive(Debug, Clone)]
pub struct CheckoutService {
    registry: Arc<LinkRegistry>,
    ledger: Arc<UnlockLedger>,
    gateway: Arc<dyn PaymentGateway>,
    public_base_url: String,
    currency: String,
}

impl CheckoutService {
    /// Creates a new checkout service.
    pub fn new(
        registry: Arc<LinkRegistry>,
        ledger: Arc<UnlockLedger>,
        gateway: Arc<dyn PaymentGateway>,
        server: &ServerConfig,
        payment: &PaymentConfig,
    ) -> Self {
        Self {
            registry,
            ledger,
            gateway,
            public_base_url: server.public_base_url.trim_end_matches('/').to_string(),
            currency: payment.currency.clone(),
        }
    }

    /// Records the unlock intent and opens a checkout session for the
    /// stored price. Returns the hosted checkout URL.
    pub async fn start(&self, req: StartCheckout) -> AppResult<String> {
        let link = self.payable_link(&req.token).await?;
        if let Some(amount) = req.amount {
            if amount.round_dp(2) != link.price.round_dp(2) {
                return Err(AppError::validation(
                    "Amount does not match the price of this link",
                ));
            }
        }
        let email = checked_email(&req.email)?;
        let amount_minor = (link.price * Decimal::ONE_HUNDRED)
            .round()
            .to_i64()
            .ok_or_else(|| AppError::validation("Price is out of range"))?;

        self.ledger.record_unlock_intent(&link.token, &email).await?;

        let name = req
            .repo_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| link.full_name());
        let request = CheckoutRequest {
            share_token: link.token.clone(),
            buyer_email: email,
            amount_minor,
            currency: self.currency.clone(),
            product_name: format!("Access to {name}"),
            success_url: format!(
                "{}/api/stripe/success?token={}&session_id={{CHECKOUT_SESSION_ID}}",
                self.public_base_url, link.token
            ),
            cancel_url: self.share_page(&link.token, &[("canceled", "true")])?,
        };
        let session = self.gateway.create_checkout(&request).await?;

        session.url.ok_or_else(|| {
            AppError::upstream(None, "Payment processor did not return a checkout URL")
        })
    }

    /// Confirms a checkout session and returns the URL to send the buyer to.
    ///
    /// A paid session marks the ledger and carries a single-use grant on the
    /// redirect; anything else returns the buyer to the share page.
    pub async fn complete(&self, session_id: &str, token: &str) -> AppResult<String> {
        if session_id.trim().is_empty() || token.trim().is_empty() {
            return Err(AppError::validation("Missing session or token"));
        }
        let session = self.gateway.retrieve_session(session_id).await?;
        if session.share_token() != Some(token) {
            return Err(AppError::validation(
                "Checkout session does not belong to this link",
            ));
        }

        if !session.is_paid() {
            info!(session_id, share_token = %token, "Checkout not paid");
            return self.share_page(token, &[("canceled", "true")]);
        }

        let email = session.buyer_email();
        let record = self.ledger.mark_paid(token, email).await?;
        let email = match (email, record) {
            (Some(email), _) => email.to_string(),
            (None, Some(record)) => record.buyer_email,
            (None, None) => {
                warn!(session_id, share_token = %token, "Paid session without buyer email");
                return self.share_page(token, &[]);
            }
        };

        if !self.ledger.has_paid_unlock(token, &email).await? {
            warn!(session_id, share_token = %token, "Paid session without ledger record");
            return self.share_page(token, &[]);
        }
        let grant = self.ledger.issue_grant(token, &email).await?;
        self.share_page(token, &[("grant", grant.as_str())])
    }

    async fn payable_link(&self, token: &str) -> AppResult<ShareLink> {
        let link = self
            .registry
            .get(token)
            .await?
            .filter(ShareLink::is_active)
            .ok_or_else(|| AppError::not_found("Invalid token"))?;
        if link.is_expired_at(chrono::Utc::now()) {
            return Err(AppError::new(ErrorKind::Authorization, "Link expired"));
        }
        if !link.is_paid() {
            return Err(AppError::validation("This link does not require payment"));
        }
        Ok(link)
    }

    fn share_page(&self, token: &str, params: &[(&str, &str)]) -> AppResult<String> {
        let base = format!("{}/share/{token}", self.public_base_url);
        let url = if params.is_empty() {
            Url::parse(&base)
        } else {
            Url::parse_with_params(&base, params)
        }
        .map_err(|e| AppError::with_source(ErrorKind::Configuration, "Invalid public_base_url", e))?;
        Ok(url.to_string())
    }
}
