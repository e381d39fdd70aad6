//! Payment processor configuration.

use serde::{Deserialize, Serialize};

/// Stripe Checkout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Stripe REST API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Secret API key.
    pub secret_key: String,
    /// ISO currency code for line items.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_api_url() -> String {
    "https://api.stripe.com".to_string()
}

fn default_currency() -> String {
    "usd".to_string()
}

fn default_timeout() -> u64 {
    20
}
