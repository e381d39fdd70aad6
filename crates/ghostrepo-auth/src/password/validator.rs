//! Policy for new share passwords.

use ghostrepo_core::config::AuthConfig;
use ghostrepo_core::error::AppError;

/// Validates share passwords chosen by owners.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.share_password_min_length,
        }
    }

    /// Rejects passwords shorter than the configured minimum or made only of
    /// whitespace.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.trim().is_empty() {
            return Err(AppError::validation("Password must not be blank"));
        }
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }
        Ok(())
    }
}
