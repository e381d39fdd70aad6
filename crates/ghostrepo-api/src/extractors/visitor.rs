//! Visitor pass cookies.
//!
//! Each share token gets its own HttpOnly cookie holding a signed pass. The
//! pass remembers a successful password check and the buyer email verified
//! by a redeemed unlock grant.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use tracing::debug;

use ghostrepo_auth::jwt::{Claims, JwtDecoder, JwtEncoder};
use ghostrepo_core::result::AppResult;
use ghostrepo_service::Credentials;

use crate::state::AppState;

/// The caller's visitor passes.
#[derive(Debug, Clone)]
pub struct Visitor {
    jar: CookieJar,
    decoder: Arc<JwtDecoder>,
    encoder: Arc<JwtEncoder>,
    prefix: String,
    secure: bool,
}

impl Visitor {
    fn cookie_name(&self, token: &str) -> String {
        format!("{}{}", self.prefix, token)
    }

    /// The pass for `token`, when present and valid.
    pub fn pass(&self, token: &str) -> Option<Claims> {
        let cookie = self.jar.get(&self.cookie_name(token))?;
        match self.decoder.decode_visitor_pass(cookie.value(), token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                debug!(error = %e, "Ignoring unusable visitor pass");
                None
            }
        }
    }

    /// Credentials remembered for `token`, merged with a typed password.
    pub fn credentials(&self, token: &str, password: Option<String>) -> Credentials {
        let pass = self.pass(token);
        Credentials {
            password: password.filter(|p| !p.is_empty()),
            password_proof: pass.as_ref().and_then(|c| c.pwd_at),
            verified_email: pass.and_then(|c| c.email),
        }
    }

    /// Returns the cookie jar with a fresh pass for `token`.
    pub fn issue_pass(
        &self,
        token: &str,
        email: Option<&str>,
        password_proof: Option<i64>,
    ) -> AppResult<CookieJar> {
        let (pass, _expires_at) = self.encoder.visitor_pass(token, email, password_proof)?;
        let cookie = Cookie::build((self.cookie_name(token), pass))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .build();
        Ok(self.jar.clone().add(cookie))
    }
}

impl FromRequestParts<AppState> for Visitor {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self {
            jar: CookieJar::from_headers(&parts.headers),
            decoder: Arc::clone(&state.jwt_decoder),
            encoder: Arc::clone(&state.jwt_encoder),
            prefix: state.config.auth.pass_cookie_prefix.clone(),
            secure: state.config.auth.secure_cookies,
        })
    }
}
