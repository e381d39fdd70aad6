//! Response DTOs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ghostrepo_entity::access::AccessVerdict;
use ghostrepo_entity::share::ShareLink;

/// Gate answer consumed by the viewer page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    /// Whether the visitor may browse.
    pub valid: bool,
    /// A password is needed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_required: Option<bool>,
    /// Payment is needed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paywall: Option<bool>,
    /// Unlock price when behind the paywall.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub price: Option<Decimal>,
    /// The link expired.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired: Option<bool>,
    /// Message for the visitor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&AccessVerdict> for ValidateResponse {
    fn from(verdict: &AccessVerdict) -> Self {
        let base = Self {
            message: verdict.message().map(str::to_string),
            ..Self::default()
        };
        match verdict {
            AccessVerdict::Open => Self { valid: true, ..base },
            AccessVerdict::PasswordRequired { .. } => Self {
                password_required: Some(true),
                ..base
            },
            AccessVerdict::Paywall { price } => Self {
                paywall: Some(true),
                price: Some(*price),
                ..base
            },
            AccessVerdict::Expired => Self {
                expired: Some(true),
                ..base
            },
            AccessVerdict::Invalid { .. } => base,
        }
    }
}

/// Yes/no access answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessResponse {
    /// Whether access is granted.
    pub valid: bool,
}

/// A share link as shown on the owner dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct ShareLinkResponse {
    /// The stored link.
    #[serde(flatten)]
    pub link: ShareLink,
    /// Viewer URL.
    pub share_url: String,
    /// Whether a password is set.
    pub password_protected: bool,
}

impl ShareLinkResponse {
    /// Wraps a link with its public URL.
    pub fn new(link: ShareLink, share_url: String) -> Self {
        Self {
            password_protected: link.is_password_protected(),
            link,
            share_url,
        }
    }
}

/// Result of sharing a repository.
#[derive(Debug, Clone, Serialize)]
pub struct CreateShareResponse {
    /// Share token.
    pub token: String,
    /// Viewer URL.
    pub share_url: String,
}

/// Branch names of a shared repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchesResponse {
    /// Branch names.
    pub branches: Vec<String>,
}

/// Hosted checkout page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    /// URL to send the buyer to.
    pub url: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Storage backend state.
    pub database: String,
}
