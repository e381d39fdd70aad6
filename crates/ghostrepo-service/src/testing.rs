//! Test doubles shared by the service unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use ghostrepo_core::error::{AppError, ErrorKind};
use ghostrepo_core::result::AppResult;
use ghostrepo_core::types::pagination::{PageRequest, PageResponse};
use ghostrepo_database::memory::MemoryShareLinkStore;
use ghostrepo_database::{ShareLinkStore, UnlockStore};
use ghostrepo_entity::share::{CreateShareLink, ShareLink, ShareSettingsPatch, ShareStatus};
use ghostrepo_entity::unlock::{UnlockGrant, UnlockRecord};
use ghostrepo_github::{ByteStream, RemoteContent, RemoteTree, RepoRef, SourceControl};

/// Source that only knows which installation owns each repository.
#[derive(Debug, Default)]
pub(crate) struct InstalledRepos {
    installs: HashMap<(String, String), i64>,
}

impl InstalledRepos {
    pub(crate) fn with(mut self, owner: &str, repo: &str, installation_id: i64) -> Self {
        self.installs
            .insert((owner.to_string(), repo.to_string()), installation_id);
        self
    }
}

fn unused() -> AppError {
    AppError::internal("content access not expected")
}

#[async_trait]
impl SourceControl for InstalledRepos {
    async fn repo_installation(&self, owner: &str, repo: &str) -> AppResult<Option<i64>> {
        Ok(self
            .installs
            .get(&(owner.to_string(), repo.to_string()))
            .copied())
    }

    async fn default_branch(&self, _repo: &RepoRef) -> AppResult<String> {
        Err(unused())
    }

    async fn branch_head(&self, _repo: &RepoRef, _branch: &str) -> AppResult<String> {
        Err(unused())
    }

    async fn tree(&self, _repo: &RepoRef, _sha: &str) -> AppResult<RemoteTree> {
        Err(unused())
    }

    async fn branches(&self, _repo: &RepoRef) -> AppResult<Vec<String>> {
        Err(unused())
    }

    async fn contents(
        &self,
        _repo: &RepoRef,
        _path: &str,
        _git_ref: &str,
    ) -> AppResult<RemoteContent> {
        Err(unused())
    }

    async fn zipball(&self, _repo: &RepoRef, _git_ref: &str) -> AppResult<ByteStream> {
        Err(unused())
    }
}

fn storage_down() -> AppError {
    AppError::new(ErrorKind::Database, "connection refused")
}

/// Share store whose first repository lookup misses, as when a concurrent
/// request inserts between the lookup and our insert.
#[derive(Debug, Default)]
pub(crate) struct LateShares {
    pub(crate) inner: MemoryShareLinkStore,
    looked_up: AtomicBool,
}

#[async_trait]
impl ShareLinkStore for LateShares {
    async fn insert(&self, data: &CreateShareLink) -> AppResult<ShareLink> {
        self.inner.insert(data).await
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<ShareLink>> {
        self.inner.find_by_token(token).await
    }

    async fn find_active_for_repo(
        &self,
        owner: &str,
        repo: &str,
    ) -> AppResult<Option<ShareLink>> {
        if !self.looked_up.swap(true, Ordering::SeqCst) {
            return Ok(None);
        }
        self.inner.find_active_for_repo(owner, repo).await
    }

    async fn list_by_creator(
        &self,
        created_by: &str,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareLink>> {
        self.inner.list_by_creator(created_by, page).await
    }

    async fn update_settings(
        &self,
        token: &str,
        patch: &ShareSettingsPatch,
    ) -> AppResult<Option<ShareLink>> {
        self.inner.update_settings(token, patch).await
    }

    async fn set_status(&self, token: &str, status: ShareStatus) -> AppResult<bool> {
        self.inner.set_status(token, status).await
    }
}

/// Share store that cannot reach its backend.
#[derive(Debug, Default)]
pub(crate) struct DownShares;

#[async_trait]
impl ShareLinkStore for DownShares {
    async fn insert(&self, _data: &CreateShareLink) -> AppResult<ShareLink> {
        Err(storage_down())
    }

    async fn find_by_token(&self, _token: &str) -> AppResult<Option<ShareLink>> {
        Err(storage_down())
    }

    async fn find_active_for_repo(
        &self,
        _owner: &str,
        _repo: &str,
    ) -> AppResult<Option<ShareLink>> {
        Err(storage_down())
    }

    async fn list_by_creator(
        &self,
        _created_by: &str,
        _page: &PageRequest,
    ) -> AppResult<PageResponse<ShareLink>> {
        Err(storage_down())
    }

    async fn update_settings(
        &self,
        _token: &str,
        _patch: &ShareSettingsPatch,
    ) -> AppResult<Option<ShareLink>> {
        Err(storage_down())
    }

    async fn set_status(&self, _token: &str, _status: ShareStatus) -> AppResult<bool> {
        Err(storage_down())
    }
}

/// Unlock store that cannot reach its backend.
#[derive(Debug, Default)]
pub(crate) struct DownUnlocks;

#[async_trait]
impl UnlockStore for DownUnlocks {
    async fn upsert_intent(&self, _token: &str, _email: &str) -> AppResult<UnlockRecord> {
        Err(storage_down())
    }

    async fn mark_paid(
        &self,
        _token: &str,
        _email: Option<&str>,
    ) -> AppResult<Option<UnlockRecord>> {
        Err(storage_down())
    }

    async fn has_paid(&self, _token: &str, _email: &str) -> AppResult<bool> {
        Err(storage_down())
    }

    async fn insert_grant(&self, _grant: &UnlockGrant) -> AppResult<()> {
        Err(storage_down())
    }

    async fn consume_grant(
        &self,
        _jti: Uuid,
        _token: &str,
        _now: DateTime<Utc>,
    ) -> AppResult<Option<UnlockGrant>> {
        Err(storage_down())
    }
}
