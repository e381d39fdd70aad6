//! Source-control abstraction.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use ghostrepo_core::error::AppError;
use ghostrepo_core::result::AppResult;
use ghostrepo_entity::content::{DirEntry, TreeEntry};
use ghostrepo_entity::share::ShareLink;

/// Streamed response body.
pub type ByteStream = BoxStream<'static, Result<Bytes, AppError>>;

/// A repository reachable through one installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    /// Owner login.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// GitHub App installation ID.
    pub installation_id: i64,
}

impl From<&ShareLink> for RepoRef {
    fn from(link: &ShareLink) -> Self {
        Self {
            owner: link.owner.clone(),
            repo: link.repo.clone(),
            installation_id: link.installation_id,
        }
    }
}

/// Recursive tree listing of one commit.
#[derive(Debug, Clone, Default)]
pub struct RemoteTree {
    /// Upstream cut the listing short.
    pub truncated: bool,
    /// Entries in upstream order.
    pub entries: Vec<TreeEntry>,
}

/// Content at a path as returned upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteContent {
    /// A single file.
    File {
        /// File name.
        name: String,
        /// Full path.
        path: String,
        /// Decoded bytes, absent when upstream did not inline the content.
        bytes: Option<Vec<u8>>,
    },
    /// A directory listing.
    Directory(Vec<DirEntry>),
}

/// Read-only operations on a repository.
#[async_trait]
pub trait SourceControl: Send + Sync + std::fmt::Debug + 'static {
    /// Installation ID through which the app reaches `owner/repo`, or `None`
    /// when the app is not installed there.
    async fn repo_installation(&self, owner: &str, repo: &str) -> AppResult<Option<i64>>;

    /// Name of the repository's default branch.
    async fn default_branch(&self, repo: &RepoRef) -> AppResult<String>;

    /// Commit SHA a branch points to.
    async fn branch_head(&self, repo: &RepoRef, branch: &str) -> AppResult<String>;

    /// Recursive tree of a commit.
    async fn tree(&self, repo: &RepoRef, sha: &str) -> AppResult<RemoteTree>;

    /// Every branch name, following pagination.
    async fn branches(&self, repo: &RepoRef) -> AppResult<Vec<String>>;

    /// File or directory at `path` on `git_ref`.
    async fn contents(&self, repo: &RepoRef, path: &str, git_ref: &str)
    -> AppResult<RemoteContent>;

    /// Zip archive of `git_ref`, streamed.
    async fn zipball(&self, repo: &RepoRef, git_ref: &str) -> AppResult<ByteStream>;
}
