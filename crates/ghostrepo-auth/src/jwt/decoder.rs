//! Verification of signed credentials.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use ghostrepo_core::config::AuthConfig;
use ghostrepo_core::error::AppError;

use super::claims::{Claims, TokenType};

/// Validates HS256 tokens and their credential type.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5;

        Self {
            decoding_key: DecodingKey::from_secret(config.signing_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes an owner session.
    pub fn decode_owner_session(&self, token: &str) -> Result<Claims, AppError> {
        self.decode_typed(token, TokenType::OwnerSession)
    }

    /// Decodes a visitor pass and checks it was issued for `share_token`.
    pub fn decode_visitor_pass(&self, token: &str, share_token: &str) -> Result<Claims, AppError> {
        let claims = self.decode_typed(token, TokenType::VisitorPass)?;
        if claims.sub != share_token {
            return Err(AppError::authentication(
                "Visitor pass was issued for another link",
            ));
        }
        Ok(claims)
    }

    /// Decodes an unlock grant and checks it was issued for `share_token`.
    pub fn decode_unlock_grant(&self, token: &str, share_token: &str) -> Result<Claims, AppError> {
        let claims = self.decode_typed(token, TokenType::UnlockGrant)?;
        if claims.sub != share_token || claims.email.is_none() {
            return Err(AppError::authentication("Unlock grant does not match this link"));
        }
        Ok(claims)
    }

    fn decode_typed(&self, token: &str, expected: TokenType) -> Result<Claims, AppError> {
        let claims = self.decode_token(token)?;
        if claims.token_type != expected {
            return Err(AppError::authentication("Invalid token type"));
        }
        Ok(claims)
    }

    fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::authentication("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::authentication("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::authentication("Invalid token signature")
                    }
                    _ => AppError::authentication(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }
}
