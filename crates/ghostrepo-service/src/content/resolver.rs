//! Content resolver: tree, branches, files and archives of a shared repository.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use ghostrepo_core::error::AppError;
use ghostrepo_core::result::AppResult;
use ghostrepo_entity::content::{EntryKind, FileContent, RepoContent, TreeListing, TreeNode};
use ghostrepo_entity::share::ShareLink;
use ghostrepo_github::{ByteStream, RemoteContent, RepoRef, SourceControl};

use super::binary::is_binary_path;
use super::tree::build_hierarchy;

/// Nested tree of one branch.
#[derive(Debug, Clone, Serialize)]
pub struct Hierarchy {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Resolved branch.
    pub branch: String,
    /// Top-level nodes.
    pub nodes: Vec<TreeNode>,
}

/// A streamed zip archive and the file name to offer it under.
pub struct ZipArchive {
    /// Download file name.
    pub filename: String,
    /// Archive bytes.
    pub body: ByteStream,
}

impl std::fmt::Debug for ZipArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipArchive")
            .field("filename", &self.filename)
            .finish()
    }
}

/// Reads repository content on behalf of an authorized link.
#[derive(Debug, Clone)]
pub struct ContentResolver {
    source: Arc<dyn SourceControl>,
}

impl ContentResolver {
    /// Creates a new content resolver.
    pub fn new(source: Arc<dyn SourceControl>) -> Self {
        Self { source }
    }

    /// Flat recursive listing of `branch`, or of the default branch.
    pub async fn tree(&self, link: &ShareLink, branch: Option<&str>) -> AppResult<TreeListing> {
        let repo = RepoRef::from(link);
        let branch = self.resolve_branch(&repo, branch).await?;
        let sha = self.source.branch_head(&repo, &branch).await?;
        let remote = self.source.tree(&repo, &sha).await?;

        let tree = remote
            .entries
            .into_iter()
            .map(|mut entry| {
                entry.is_binary = entry.kind == EntryKind::Blob && is_binary_path(&entry.path);
                entry
            })
            .collect::<Vec<_>>();
        debug!(repo = %link.full_name(), %branch, %sha, entries = tree.len(), "Resolved tree");

        Ok(TreeListing {
            owner: link.owner.clone(),
            repo: link.repo.clone(),
            branch,
            sha,
            truncated: remote.truncated,
            tree,
        })
    }

    /// Nested view of [`tree`](Self::tree).
    pub async fn hierarchy(&self, link: &ShareLink, branch: Option<&str>) -> AppResult<Hierarchy> {
        let listing = self.tree(link, branch).await?;
        Ok(Hierarchy {
            nodes: build_hierarchy(&listing.tree),
            owner: listing.owner,
            repo: listing.repo,
            branch: listing.branch,
        })
    }

    /// All branch names.
    pub async fn branches(&self, link: &ShareLink) -> AppResult<Vec<String>> {
        self.source.branches(&RepoRef::from(link)).await
    }

    /// File or directory at `path`.
    pub async fn file(
        &self,
        link: &ShareLink,
        path: &str,
        branch: Option<&str>,
    ) -> AppResult<RepoContent> {
        let path = normalize_path(path)?;
        let repo = RepoRef::from(link);
        let branch = self.resolve_branch(&repo, branch).await?;

        match self.source.contents(&repo, &path, &branch).await? {
            RemoteContent::Directory(files) => Ok(RepoContent::Directory { files }),
            RemoteContent::File { name, path, bytes } => {
                let is_binary = is_binary_path(&path);
                let content = if is_binary {
                    None
                } else {
                    bytes.map(|b| String::from_utf8_lossy(&b).into_owned())
                };
                Ok(RepoContent::File(FileContent {
                    name,
                    path,
                    is_binary,
                    content,
                }))
            }
        }
    }

    /// Streamed zip archive of `branch`, or of the default branch.
    pub async fn zip(&self, link: &ShareLink, branch: Option<&str>) -> AppResult<ZipArchive> {
        let repo = RepoRef::from(link);
        let branch = self.resolve_branch(&repo, branch).await?;
        let body = self.source.zipball(&repo, &branch).await?;
        Ok(ZipArchive {
            filename: archive_name(&link.repo, &branch),
            body,
        })
    }

    async fn resolve_branch(&self, repo: &RepoRef, branch: Option<&str>) -> AppResult<String> {
        match branch.map(str::trim).filter(|b| !b.is_empty()) {
            Some(branch) => Ok(branch.to_string()),
            None => self.source.default_branch(repo).await,
        }
    }
}

/// Strips leading slashes and rejects traversal segments.
fn normalize_path(path: &str) -> AppResult<String> {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.split('/').any(|s| s == ".." || s == ".") {
        return Err(AppError::validation("Invalid path"));
    }
    Ok(trimmed.to_string())
}

/// `{repo}-{branch}.zip` with characters unsafe in a header value replaced.
fn archive_name(repo: &str, branch: &str) -> String {
    let safe: String = format!("{repo}-{branch}")
        .chars()
        .map(|c| match c {
            '/' | '\\' | '"' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect();
    format!("{safe}.zip")
}
