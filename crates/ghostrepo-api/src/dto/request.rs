//! Request DTOs with validation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub use ghostrepo_service::share::UpdateShareRequest;
use ghostrepo_service::unlock::StartCheckout;

/// Visitor gate request. The path token is authoritative.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidateRequest {
    /// Share token echoed by older viewers.
    pub token: Option<String>,
    /// Share password, when the visitor typed one.
    pub password: Option<String>,
}

/// Paid-unlock lookup.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckAccessRequest {
    /// Share token.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    /// Buyer email.
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
}

/// Unlock grant redemption.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RedeemRequest {
    /// Signed grant from the checkout redirect.
    #[validate(length(min = 1, message = "Grant is required"))]
    pub grant: String,
}

/// Start of a checkout for a paywalled link.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Share token to unlock.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    /// Price shown to the visitor.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    /// Display name of the repository.
    pub repo_name: Option<String>,
    /// Buyer email.
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
}

impl From<CheckoutRequest> for StartCheckout {
    fn from(req: CheckoutRequest) -> Self {
        Self {
            token: req.token,
            amount: req.amount,
            repo_name: req.repo_name,
            email: req.email,
        }
    }
}

/// Query of the checkout success redirect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSuccessQuery {
    /// Checkout session identifier.
    #[serde(default)]
    pub session_id: String,
    /// Share token the session was opened for.
    #[serde(default)]
    pub token: String,
}

/// Owner request to share a repository.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateShareRequest {
    /// Repository owner login.
    #[validate(length(min = 1, max = 100, message = "Repository owner is required"))]
    pub owner: String,
    /// Repository name.
    #[validate(length(min = 1, max = 100, message = "Repository name is required"))]
    pub repo: String,
    /// GitHub App installation granting access.
    #[validate(range(min = 1, message = "Installation ID must be positive"))]
    pub installation_id: i64,
}

/// Optional branch selector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchQuery {
    /// Branch name; the default branch when absent.
    pub branch: Option<String>,
}

/// File lookup query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileQuery {
    /// Share token.
    pub token: String,
    /// Path inside the repository.
    #[serde(default)]
    pub path: String,
    /// Branch name.
    pub branch: Option<String>,
}
