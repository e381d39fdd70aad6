//! Link registry: owner-side lifecycle of share links.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use ghostrepo_auth::password::{PasswordHasher, PasswordValidator};
use ghostrepo_core::error::{AppError, ErrorKind};
use ghostrepo_core::result::AppResult;
use ghostrepo_core::types::pagination::{PageRequest, PageResponse};
use ghostrepo_database::ShareLinkStore;
use ghostrepo_entity::share::{
    CreateShareLink, ExpiryPreset, ShareLink, ShareSettingsPatch, ShareStatus,
};
use ghostrepo_github::SourceControl;

use super::link::LinkService;
use crate::context::OwnerContext;

/// Attempts at drawing a fresh token before giving up.
const TOKEN_ATTEMPTS: usize = 3;

/// Owner request to change a link's settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateShareRequest {
    /// New unlock price; zero makes the link free.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    /// New plaintext password.
    pub password: Option<String>,
    /// Remove the password.
    #[serde(default)]
    pub clear_password: bool,
    /// Absolute expiry.
    pub expires_at: Option<DateTime<Utc>>,
    /// Relative expiry counted from now.
    pub expires_in: Option<ExpiryPreset>,
    /// Remove the expiry.
    #[serde(default)]
    pub clear_expiry: bool,
    /// Pin state.
    pub pinned: Option<bool>,
}

/// Durable mapping from share token to repository and access policy.
#[derive(Debug, Clone)]
pub struct LinkRegistry {
    store: Arc<dyn ShareLinkStore>,
    source: Arc<dyn SourceControl>,
    links: Arc<LinkService>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
}

impl LinkRegistry {
    /// Creates a new link registry.
    pub fn new(
        store: Arc<dyn ShareLinkStore>,
        source: Arc<dyn SourceControl>,
        links: Arc<LinkService>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
    ) -> Self {
        Self {
            store,
            source,
            links,
            hasher,
            validator,
        }
    }

    /// Shares a repository. An existing active link for the same repository
    /// is returned unchanged so re-sharing keeps the URL stable.
    ///
    /// The installation must be the one upstream reports for the repository;
    /// content is later fetched with that installation's credentials.
    pub async fn create(
        &self,
        ctx: &OwnerContext,
        owner: &str,
        repo: &str,
        installation_id: i64,
    ) -> AppResult<ShareLink> {
        self.verify_installation(ctx, owner, repo, installation_id)
            .await?;
        if let Some(existing) = self.existing_share(ctx, owner, repo).await? {
            return Ok(existing);
        }

        for attempt in 1..=TOKEN_ATTEMPTS {
            let data = CreateShareLink {
                token: self.links.generate_token(),
                owner: owner.to_string(),
                repo: repo.to_string(),
                installation_id,
                created_by: ctx.login.clone(),
            };
            match self.store.insert(&data).await {
                Ok(link) => {
                    info!(
                        created_by = %ctx.login,
                        repo = %link.full_name(),
                        "Share link created"
                    );
                    return Ok(link);
                }
                Err(e) if e.kind == ErrorKind::Conflict => {
                    // A concurrent share of the same repository won the insert.
                    if let Some(existing) = self.existing_share(ctx, owner, repo).await? {
                        return Ok(existing);
                    }
                    warn!(attempt, "Share token collision, drawing a new token");
                }
                Err(e) => return Err(e),
            }
        }
        Err(AppError::internal("Could not allocate a unique share token"))
    }

    async fn verify_installation(
        &self,
        ctx: &OwnerContext,
        owner: &str,
        repo: &str,
        installation_id: i64,
    ) -> AppResult<()> {
        match self.source.repo_installation(owner, repo).await? {
            Some(actual) if actual == installation_id => Ok(()),
            Some(actual) => {
                warn!(
                    login = %ctx.login,
                    %owner,
                    %repo,
                    requested = installation_id,
                    actual,
                    "Share refused: installation does not cover repository"
                );
                Err(AppError::authorization(format!(
                    "Installation {installation_id} does not grant access to {owner}/{repo}"
                )))
            }
            None => Err(AppError::authorization(format!(
                "The GitHub App is not installed on {owner}/{repo}"
            ))),
        }
    }

    /// The active link for a repository when the caller owns it; a conflict
    /// when someone else does.
    async fn existing_share(
        &self,
        ctx: &OwnerContext,
        owner: &str,
        repo: &str,
    ) -> AppResult<Option<ShareLink>> {
        match self.store.find_active_for_repo(owner, repo).await? {
            Some(existing) if existing.created_by == ctx.login => Ok(Some(existing)),
            Some(existing) => Err(AppError::conflict(format!(
                "{} is already shared by another user",
                existing.full_name()
            ))),
            None => Ok(None),
        }
    }

    /// Looks up a link by token regardless of status.
    pub async fn get(&self, token: &str) -> AppResult<Option<ShareLink>> {
        if !self.links.is_well_formed(token) {
            return Ok(None);
        }
        self.store.find_by_token(token).await
    }

    /// Applies an owner's settings change. Last write wins.
    pub async fn update(
        &self,
        ctx: &OwnerContext,
        token: &str,
        req: UpdateShareRequest,
    ) -> AppResult<ShareLink> {
        self.owned_link(ctx, token).await?;
        let patch = self.build_patch(req, ctx.request_time)?;
        if patch.is_empty() {
            return Err(AppError::validation("No settings to update"));
        }

        let link = self
            .store
            .update_settings(token, &patch)
            .await?
            .ok_or_else(|| AppError::not_found("Share link not found"))?;

        info!(
            owner = %ctx.login,
            repo = %link.full_name(),
            price_changed = patch.price.is_some(),
            password_changed = patch.password_hash.is_some(),
            expiry_changed = patch.expires_at.is_some(),
            "Share settings updated"
        );
        Ok(link)
    }

    /// Unshares a repository. The row is kept with an inactive status.
    pub async fn deactivate(&self, ctx: &OwnerContext, token: &str) -> AppResult<()> {
        let link = self.owned_link(ctx, token).await?;
        self.store.set_status(token, ShareStatus::Inactive).await?;
        info!(owner = %ctx.login, repo = %link.full_name(), "Share link deactivated");
        Ok(())
    }

    /// Lists the caller's links, pinned first, then newest first.
    pub async fn list_for_owner(
        &self,
        ctx: &OwnerContext,
        page: PageRequest,
    ) -> AppResult<PageResponse<ShareLink>> {
        self.store.list_by_creator(&ctx.login, &page).await
    }

    async fn owned_link(&self, ctx: &OwnerContext, token: &str) -> AppResult<ShareLink> {
        let link = self
            .get(token)
            .await?
            .ok_or_else(|| AppError::not_found("Share link not found"))?;
        if link.created_by != ctx.login {
            return Err(AppError::authorization(
                "You can only manage your own share links",
            ));
        }
        Ok(link)
    }

    fn build_patch(
        &self,
        req: UpdateShareRequest,
        now: DateTime<Utc>,
    ) -> AppResult<ShareSettingsPatch> {
        if let Some(price) = req.price {
            if price.is_sign_negative() {
                return Err(AppError::validation("Price cannot be negative"));
            }
        }

        let password_hash = match (req.clear_password, req.password) {
            (true, Some(_)) => {
                return Err(AppError::validation(
                    "Cannot set and clear the password at once",
                ));
            }
            (true, None) => Some(None),
            (false, Some(password)) => {
                self.validator.validate(&password)?;
                Some(Some(self.hasher.hash_password(&password)?))
            }
            (false, None) => None,
        };

        let expires_at = match (req.clear_expiry, req.expires_at, req.expires_in) {
            (true, None, None) => Some(None),
            (false, Some(at), None) => Some(Some(at)),
            (false, None, Some(preset)) => Some(Some(preset.expires_at(now))),
            (false, None, None) => None,
            _ => {
                return Err(AppError::validation(
                    "Choose one of expires_at, expires_in or clear_expiry",
                ));
            }
        };

        Ok(ShareSettingsPatch {
            price: req.price.map(|p| p.round_dp(2)),
            password_hash,
            expires_at,
            pinned: req.pinned,
        })
    }
}
