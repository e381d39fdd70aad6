//! Access verdicts computed by the share gate.

use rust_decimal::Decimal;
use serde::Serialize;

/// Shown to visitors of a paid link.
pub const PAYWALL_MESSAGE: &str = "This repo is behind a paywall";

/// Shown to visitors of an expired link.
pub const EXPIRED_MESSAGE: &str = "Link expired";

/// Outcome of evaluating a share token against the supplied credentials.
/// Computed per request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum AccessVerdict {
    /// The visitor may browse the repository.
    Open,
    /// A (correct) password is needed.
    PasswordRequired {
        /// Set when a password was supplied but rejected.
        message: Option<String>,
    },
    /// Payment is needed.
    Paywall {
        /// Unlock price.
        price: Decimal,
    },
    /// The link expired.
    Expired,
    /// The token does not resolve to an active link.
    Invalid {
        /// Reason shown to the visitor.
        message: String,
    },
}

impl AccessVerdict {
    /// Whether the visitor may see repository contents.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Text to show the visitor, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Open => None,
            Self::PasswordRequired { message } => message.as_deref(),
            Self::Paywall { .. } => Some(PAYWALL_MESSAGE),
            Self::Expired => Some(EXPIRED_MESSAGE),
            Self::Invalid { message } => Some(message),
        }
    }

    /// Invalid verdict with the standard message.
    pub fn invalid() -> Self {
        Self::Invalid {
            message: "Invalid token".to_string(),
        }
    }
}
