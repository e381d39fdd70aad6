//! `OwnerUser` extractor: reads the owner session from its cookie or the
//! Authorization header and injects the owner context.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use ghostrepo_core::error::AppError;
use ghostrepo_service::context::OwnerContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated repository owner available in handlers.
#[derive(Debug, Clone)]
pub struct OwnerUser(pub OwnerContext);

impl std::ops::Deref for OwnerUser {
    type Target = OwnerContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for OwnerUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let from_cookie = jar
            .get(&state.config.auth.session_cookie)
            .map(|c| c.value().to_string());

        let token = match from_cookie {
            Some(token) => token,
            None => parts
                .headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(str::to_string)
                .ok_or_else(|| AppError::authentication("Sign in to manage share links"))?,
        };

        let claims = state.jwt_decoder.decode_owner_session(&token)?;
        Ok(OwnerUser(OwnerContext::new(claims.sub)))
    }
}
