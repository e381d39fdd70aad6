//! In-memory share link store built on `dashmap`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rust_decimal::Decimal;
use uuid::Uuid;

use ghostrepo_core::error::AppError;
use ghostrepo_core::result::AppResult;
use ghostrepo_core::types::pagination::{PageRequest, PageResponse};
use ghostrepo_entity::share::{CreateShareLink, ShareLink, ShareSettingsPatch, ShareStatus};

use crate::store::ShareLinkStore;

type RepoKey = (String, String);

/// Share links keyed by token.
#[derive(Debug, Clone, Default)]
pub struct MemoryShareLinkStore {
    links: Arc<DashMap<String, ShareLink>>,
    /// Token of the one active link per `(owner, repo)`.
    active_repos: Arc<DashMap<RepoKey, String>>,
}

impl MemoryShareLinkStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShareLinkStore for MemoryShareLinkStore {
    async fn insert(&self, data: &CreateShareLink) -> AppResult<ShareLink> {
        let repo_key = (data.owner.clone(), data.repo.clone());
        match self.active_repos.entry(repo_key.clone()) {
            Entry::Occupied(_) => {
                return Err(AppError::conflict(
                    "Repository already has an active share link",
                ));
            }
            Entry::Vacant(slot) => {
                slot.insert(data.token.clone());
            }
        }

        let inserted = match self.links.entry(data.token.clone()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let link = ShareLink {
                    id: Uuid::new_v4(),
                    token: data.token.clone(),
                    owner: data.owner.clone(),
                    repo: data.repo.clone(),
                    installation_id: data.installation_id,
                    created_by: data.created_by.clone(),
                    password_hash: None,
                    password_set_at: None,
                    expires_at: None,
                    price: Decimal::ZERO,
                    pinned: false,
                    status: ShareStatus::Active,
                    created_at: now,
                    updated_at: now,
                };
                slot.insert(link.clone());
                Some(link)
            }
        };

        match inserted {
            Some(link) => Ok(link),
            None => {
                self.active_repos
                    .remove_if(&repo_key, |_, token| *token == data.token);
                Err(AppError::conflict("Share token already exists"))
            }
        }
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<ShareLink>> {
        Ok(self.links.get(token).map(|l| l.value().clone()))
    }

    async fn find_active_for_repo(
        &self,
        owner: &str,
        repo: &str,
    ) -> AppResult<Option<ShareLink>> {
        let key = (owner.to_string(), repo.to_string());
        let Some(token) = self.active_repos.get(&key).map(|t| t.value().clone()) else {
            return Ok(None);
        };
        Ok(self
            .links
            .get(&token)
            .filter(|l| l.is_active())
            .map(|l| l.value().clone()))
    }

    async fn list_by_creator(
        &self,
        created_by: &str,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareLink>> {
        let mut links: Vec<ShareLink> = self
            .links
            .iter()
            .filter(|l| l.created_by == created_by)
            .map(|l| l.value().clone())
            .collect();
        links.sort_by(|a, b| {
            b.pinned
                .cmp(&a.pinned)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        let total = links.len() as u64;
        let items = links
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn update_settings(
        &self,
        token: &str,
        patch: &ShareSettingsPatch,
    ) -> AppResult<Option<ShareLink>> {
        let Some(mut link) = self.links.get_mut(token) else {
            return Ok(None);
        };
        let now = Utc::now();

        if let Some(price) = patch.price {
            link.price = price;
        }
        if let Some(hash) = &patch.password_hash {
            link.password_set_at = hash.as_ref().map(|_| now);
            link.password_hash = hash.clone();
        }
        if let Some(expires_at) = patch.expires_at {
            link.expires_at = expires_at;
        }
        if let Some(pinned) = patch.pinned {
            link.pinned = pinned;
        }
        link.updated_at = now;

        Ok(Some(link.value().clone()))
    }

    async fn set_status(&self, token: &str, status: ShareStatus) -> AppResult<bool> {
        let key = match self.links.get_mut(token) {
            Some(mut link) => {
                link.status = status;
                link.updated_at = Utc::now();
                (link.owner.clone(), link.repo.clone())
            }
            None => return Ok(false),
        };

        match status {
            ShareStatus::Inactive => {
                self.active_repos.remove_if(&key, |_, t| t == token);
            }
            ShareStatus::Active => {
                self.active_repos
                    .entry(key)
                    .or_insert_with(|| token.to_string());
            }
        }
        Ok(true)
    }
}
