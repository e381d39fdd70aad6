//! Signing configuration for owner sessions, visitor passes and unlock grants.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Shortest HS256 secret accepted at startup, in bytes.
pub const MIN_SIGNING_SECRET_LEN: usize = 32;

/// Placeholder values that must never sign real tokens.
const PLACEHOLDER_SECRETS: &[&str] = &["CHANGE_ME_IN_PRODUCTION", "changeme", "secret"];

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for HS256 signing of every token the server verifies.
    pub signing_secret: String,
    /// Name of the cookie carrying the owner session token.
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
    /// Prefix of the per-share visitor pass cookie.
    #[serde(default = "default_pass_cookie_prefix")]
    pub pass_cookie_prefix: String,
    /// Visitor pass lifetime in hours.
    #[serde(default = "default_pass_ttl")]
    pub pass_ttl_hours: u64,
    /// Unlock grant lifetime in minutes.
    #[serde(default = "default_grant_ttl")]
    pub grant_ttl_minutes: u64,
    /// Whether cookies are marked `Secure`.
    #[serde(default = "default_true")]
    pub secure_cookies: bool,
    /// Minimum share password length accepted from owners.
    #[serde(default = "default_password_min")]
    pub share_password_min_length: usize,
}

impl AuthConfig {
    /// Reject signing secrets that are missing, published placeholders or
    /// too short to resist brute force.
    pub fn validate(&self) -> Result<(), AppError> {
        let secret = self.signing_secret.trim();
        if secret.is_empty() {
            return Err(AppError::configuration(
                "auth.signing_secret must be set (GHOSTREPO__AUTH__SIGNING_SECRET)",
            ));
        }
        if PLACEHOLDER_SECRETS
            .iter()
            .any(|p| secret.eq_ignore_ascii_case(p))
        {
            return Err(AppError::configuration(
                "auth.signing_secret is a placeholder value",
            ));
        }
        if secret.len() < MIN_SIGNING_SECRET_LEN {
            return Err(AppError::configuration(format!(
                "auth.signing_secret must be at least {MIN_SIGNING_SECRET_LEN} bytes"
            )));
        }
        if self.pass_ttl_hours == 0 || self.grant_ttl_minutes == 0 {
            return Err(AppError::configuration(
                "auth.pass_ttl_hours and auth.grant_ttl_minutes must be positive",
            ));
        }
        Ok(())
    }
}

fn default_session_cookie() -> String {
    "ghostrepo_session".to_string()
}

fn default_pass_cookie_prefix() -> String {
    "ghostrepo_pass_".to_string()
}

fn default_pass_ttl() -> u64 {
    24 * 7
}

fn default_grant_ttl() -> u64 {
    15
}

fn default_true() -> bool {
    true
}

fn default_password_min() -> usize {
    4
}
