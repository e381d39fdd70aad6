//! Signing of owner sessions, visitor passes and unlock grants.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use ghostrepo_core::config::AuthConfig;
use ghostrepo_core::error::AppError;

use super::claims::{Claims, TokenType};

/// Creates signed HS256 tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    pass_ttl_hours: i64,
    grant_ttl_minutes: i64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("pass_ttl_hours", &self.pass_ttl_hours)
            .field("grant_ttl_minutes", &self.grant_ttl_minutes)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.signing_secret.as_bytes()),
            pass_ttl_hours: config.pass_ttl_hours as i64,
            grant_ttl_minutes: config.grant_ttl_minutes as i64,
        }
    }

    /// Signs an owner session for `login`, valid for `ttl`.
    ///
    /// Sessions are normally minted by the OAuth login flow; this is the
    /// signing half of that contract.
    pub fn owner_session(&self, login: &str, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        self.sign(Claims {
            sub: login.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4(),
            token_type: TokenType::OwnerSession,
            email: None,
            pwd_at: None,
        })
    }

    /// Signs a visitor pass for one share token.
    pub fn visitor_pass(
        &self,
        share_token: &str,
        email: Option<&str>,
        pwd_at: Option<i64>,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.pass_ttl_hours);
        let token = self.sign(Claims {
            sub: share_token.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4(),
            token_type: TokenType::VisitorPass,
            email: email.map(str::to_string),
            pwd_at,
        })?;
        Ok((token, exp))
    }

    /// Signs an unlock grant. The caller persists `jti` so the grant can be
    /// redeemed once.
    pub fn unlock_grant(
        &self,
        share_token: &str,
        email: &str,
        jti: Uuid,
        issued_at: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let exp = issued_at + Duration::minutes(self.grant_ttl_minutes);
        let token = self.sign(Claims {
            sub: share_token.to_string(),
            iat: issued_at.timestamp(),
            exp: exp.timestamp(),
            jti,
            token_type: TokenType::UnlockGrant,
            email: Some(email.to_string()),
            pwd_at: None,
        })?;
        Ok((token, exp))
    }

    fn sign(&self, claims: Claims) -> Result<String, AppError> {
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))
    }
}
