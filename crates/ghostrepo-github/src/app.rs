//! GitHub App authentication.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::Serialize;

use ghostrepo_core::config::GithubConfig;
use ghostrepo_core::error::{AppError, ErrorKind};
use ghostrepo_core::result::AppResult;

/// Installation tokens are refreshed this long before upstream expiry.
const REFRESH_MARGIN_SECONDS: i64 = 300;

#[derive(Debug, Serialize)]
struct AppClaims {
    iat: i64,
    exp: i64,
    iss: String,
}

/// Signing identity of the GitHub App.
#[derive(Clone)]
pub struct AppCredentials {
    app_id: String,
    key: EncodingKey,
}

impl std::fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppCredentials")
            .field("app_id", &self.app_id)
            .finish()
    }
}

impl AppCredentials {
    /// Load the app ID and RSA private key from configuration. The key is
    /// taken inline from `private_key` or read from `private_key_path`.
    pub fn from_config(config: &GithubConfig) -> AppResult<Self> {
        let pem = match (&config.private_key, &config.private_key_path) {
            (Some(inline), _) => inline.replace("\\n", "\n"),
            (None, Some(path)) => std::fs::read_to_string(path).map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to read GitHub App key from {path}"),
                    e,
                )
            })?,
            (None, None) => {
                return Err(AppError::configuration(
                    "github.private_key or github.private_key_path must be set",
                ));
            }
        };
        Self::from_pem(&config.app_id, pem.as_bytes())
    }

    /// Build credentials from a PEM-encoded RSA key.
    pub fn from_pem(app_id: &str, pem: &[u8]) -> AppResult<Self> {
        let key = EncodingKey::from_rsa_pem(pem).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                "Invalid GitHub App private key",
                e,
            )
        })?;
        Ok(Self {
            app_id: app_id.to_string(),
            key,
        })
    }

    /// Short-lived RS256 JWT identifying the app itself.
    pub fn app_jwt(&self, now: DateTime<Utc>) -> AppResult<String> {
        let claims = AppClaims {
            iat: (now - Duration::seconds(60)).timestamp(),
            exp: (now + Duration::seconds(540)).timestamp(),
            iss: self.app_id.clone(),
        };
        encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .map_err(|e| AppError::internal(format!("Failed to sign GitHub App JWT: {e}")))
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Installation access tokens keyed by installation ID.
#[derive(Debug, Default)]
pub(crate) struct TokenCache {
    tokens: DashMap<i64, CachedToken>,
}

impl TokenCache {
    pub(crate) fn get(&self, installation_id: i64, now: DateTime<Utc>) -> Option<String> {
        self.tokens
            .get(&installation_id)
            .filter(|t| t.expires_at - Duration::seconds(REFRESH_MARGIN_SECONDS) > now)
            .map(|t| t.token.clone())
    }

    pub(crate) fn put(&self, installation_id: i64, token: String, expires_at: DateTime<Utc>) {
        self.tokens
            .insert(installation_id, CachedToken { token, expires_at });
    }
}
