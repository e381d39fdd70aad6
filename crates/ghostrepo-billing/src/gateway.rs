//! Payment gateway abstraction.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

use ghostrepo_core::result::AppResult;

/// Metadata key carrying the share token on a checkout session.
pub const META_SHARE_TOKEN: &str = "share_token";
/// Metadata key carrying the lowercased buyer email on a checkout session.
pub const META_EMAIL: &str = "email";

/// Parameters of a one-off hosted checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    /// Share token being unlocked.
    pub share_token: String,
    /// Lowercased buyer email.
    pub buyer_email: String,
    /// Amount in the currency's minor unit.
    pub amount_minor: i64,
    /// ISO currency code.
    pub currency: String,
    /// Line item label.
    pub product_name: String,
    /// Redirect after payment. May contain `{CHECKOUT_SESSION_ID}`.
    pub success_url: String,
    /// Redirect when the buyer backs out.
    pub cancel_url: String,
}

/// Payment state of a checkout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Funds captured.
    Paid,
    /// Not paid yet.
    Unpaid,
    /// Nothing to pay.
    NoPaymentRequired,
}

/// A checkout session as reported by the processor.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    /// Processor session ID.
    pub id: String,
    /// Hosted page URL; only present while the session is open.
    #[serde(default)]
    pub url: Option<String>,
    /// Payment state.
    pub payment_status: PaymentStatus,
    /// Metadata attached at creation.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl CheckoutSession {
    /// Whether the payment is confirmed.
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    /// Share token recorded at creation.
    pub fn share_token(&self) -> Option<&str> {
        self.metadata.get(META_SHARE_TOKEN).map(String::as_str)
    }

    /// Buyer email recorded at creation.
    pub fn buyer_email(&self) -> Option<&str> {
        self.metadata
            .get(META_EMAIL)
            .map(String::as_str)
            .filter(|e| !e.is_empty())
    }
}

/// Hosted checkout operations.
#[async_trait]
pub trait PaymentGateway: Send + Sync + std::fmt::Debug + 'static {
    /// Open a checkout session.
    async fn create_checkout(&self, request: &CheckoutRequest) -> AppResult<CheckoutSession>;

    /// Fetch a checkout session by ID.
    async fn retrieve_session(&self, session_id: &str) -> AppResult<CheckoutSession>;
}
