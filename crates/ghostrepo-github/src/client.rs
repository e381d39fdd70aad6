//! GitHub REST client authenticated as an app installation.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use futures::{StreamExt, TryStreamExt};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use ghostrepo_core::config::GithubConfig;
use ghostrepo_core::error::{AppError, ErrorKind};
use ghostrepo_core::result::AppResult;
use ghostrepo_entity::content::{DirEntry, EntryKind, TreeEntry};

use crate::app::{AppCredentials, TokenCache};
use crate::source::{ByteStream, RemoteContent, RemoteTree, RepoRef, SourceControl};
use crate::wire;

const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";
const BRANCHES_PER_PAGE: usize = 100;

/// Production [`SourceControl`] implementation.
#[derive(Debug)]
pub struct GithubAppClient {
    http: reqwest::Client,
    api_url: Url,
    credentials: AppCredentials,
    tokens: TokenCache,
}

impl GithubAppClient {
    /// Build a client from configuration.
    pub fn new(config: &GithubConfig) -> AppResult<Self> {
        let credentials = AppCredentials::from_config(config)?;
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;
        Self::with_http(http, &config.api_url, credentials)
    }

    /// Build a client around an existing HTTP client.
    pub fn with_http(
        http: reqwest::Client,
        api_url: &str,
        credentials: AppCredentials,
    ) -> AppResult<Self> {
        let api_url = Url::parse(api_url).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid github.api_url", e)
        })?;
        Ok(Self {
            http,
            api_url,
            credentials,
            tokens: TokenCache::default(),
        })
    }

    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> AppResult<Url> {
        endpoint(&self.api_url, segments)
    }

    async fn installation_token(&self, installation_id: i64) -> AppResult<String> {
        let now = Utc::now();
        if let Some(token) = self.tokens.get(installation_id, now) {
            return Ok(token);
        }

        let id = installation_id.to_string();
        let url = self.endpoint(["app", "installations", id.as_str(), "access_tokens"])?;
        let jwt = self.credentials.app_jwt(now)?;
        let resp = self
            .http
            .post(url)
            .bearer_auth(jwt)
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
            .send()
            .await
            .map_err(request_failed)?;
        let issued: wire::InstallationToken = parse_json(check_status(resp).await?).await?;

        debug!(installation_id, expires_at = %issued.expires_at, "Minted installation token");
        self.tokens
            .put(installation_id, issued.token.clone(), issued.expires_at);
        Ok(issued.token)
    }

    async fn request(&self, repo: &RepoRef, method: Method, url: Url) -> AppResult<RequestBuilder> {
        let token = self.installation_token(repo.installation_id).await?;
        Ok(self
            .http
            .request(method, url)
            .bearer_auth(token)
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION))
    }

    async fn get_json<T: DeserializeOwned>(&self, repo: &RepoRef, url: Url) -> AppResult<T> {
        let resp = self
            .request(repo, Method::GET, url)
            .await?
            .send()
            .await
            .map_err(request_failed)?;
        parse_json(check_status(resp).await?).await
    }
}

#[async_trait]
impl SourceControl for GithubAppClient {
    async fn repo_installation(&self, owner: &str, repo: &str) -> AppResult<Option<i64>> {
        let url = self.endpoint(["repos", owner, repo, "installation"])?;
        let jwt = self.credentials.app_jwt(Utc::now())?;
        let resp = self
            .http
            .get(url)
            .bearer_auth(jwt)
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
            .send()
            .await
            .map_err(request_failed)?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let installation: wire::Installation = parse_json(check_status(resp).await?).await?;
        Ok(Some(installation.id))
    }

    async fn default_branch(&self, repo: &RepoRef) -> AppResult<String> {
        let url = self.endpoint(["repos", repo.owner.as_str(), repo.repo.as_str()])?;
        let info: wire::Repository = self.get_json(repo, url).await?;
        Ok(info.default_branch)
    }

    async fn branch_head(&self, repo: &RepoRef, branch: &str) -> AppResult<String> {
        let mut url = self.endpoint(["repos", repo.owner.as_str(), repo.repo.as_str(), "git", "ref"])?;
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push("heads").extend(branch.split('/'));
        }
        let git_ref: wire::GitRef = self.get_json(repo, url).await?;
        Ok(git_ref.object.sha)
    }

    async fn tree(&self, repo: &RepoRef, sha: &str) -> AppResult<RemoteTree> {
        let mut url = self.endpoint([
            "repos",
            repo.owner.as_str(),
            repo.repo.as_str(),
            "git",
            "trees",
            sha,
        ])?;
        url.query_pairs_mut().append_pair("recursive", "1");

        let tree: wire::Tree = self.get_json(repo, url).await?;
        if tree.truncated {
            warn!(owner = %repo.owner, repo = %repo.repo, %sha, "Upstream tree listing truncated");
        }
        Ok(RemoteTree {
            truncated: tree.truncated,
            entries: tree
                .tree
                .into_iter()
                .map(|item| TreeEntry {
                    path: item.path,
                    kind: item.kind,
                    size: item.size,
                    is_binary: false,
                })
                .collect(),
        })
    }

    async fn branches(&self, repo: &RepoRef) -> AppResult<Vec<String>> {
        let mut names = Vec::new();
        let mut page = 1u32;
        loop {
            let mut url = self.endpoint(["repos", repo.owner.as_str(), repo.repo.as_str(), "branches"])?;
            url.query_pairs_mut()
                .append_pair("per_page", &BRANCHES_PER_PAGE.to_string())
                .append_pair("page", &page.to_string());

            let batch: Vec<wire::Branch> = self.get_json(repo, url).await?;
            let done = batch.len() < BRANCHES_PER_PAGE;
            names.extend(batch.into_iter().map(|b| b.name));
            if done {
                break;
            }
            page += 1;
        }
        Ok(names)
    }

    async fn contents(
        &self,
        repo: &RepoRef,
        path: &str,
        git_ref: &str,
    ) -> AppResult<RemoteContent> {
        let mut url = self.endpoint(["repos", repo.owner.as_str(), repo.repo.as_str(), "contents"])?;
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.extend(path.split('/').filter(|s| !s.is_empty()));
        }
        url.query_pairs_mut().append_pair("ref", git_ref);

        let contents: wire::Contents = self.get_json(repo, url).await?;
        map_contents(contents)
    }

    async fn zipball(&self, repo: &RepoRef, git_ref: &str) -> AppResult<ByteStream> {
        let url = self.endpoint([
            "repos",
            repo.owner.as_str(),
            repo.repo.as_str(),
            "zipball",
            git_ref,
        ])?;
        let resp = self
            .request(repo, Method::GET, url)
            .await?
            .send()
            .await
            .map_err(request_failed)?;
        let resp = check_status(resp).await?;

        Ok(resp
            .bytes_stream()
            .map_err(|e| AppError::with_source(ErrorKind::ExternalService, "Archive stream failed", e))
            .boxed())
    }
}

fn endpoint<'a>(base: &Url, segments: impl IntoIterator<Item = &'a str>) -> AppResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| AppError::configuration("github.api_url cannot be a base URL"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn request_failed(e: reqwest::Error) -> AppError {
    AppError::with_source(ErrorKind::ExternalService, "GitHub request failed", e)
}

async fn check_status(resp: Response) -> AppResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let url = resp.url().path().to_string();
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());

    warn!(%status, path = %url, %message, "GitHub returned non-success");
    Err(AppError::upstream(
        Some(status.as_u16()),
        format!("GitHub: {message}"),
    ))
}

async fn parse_json<T: DeserializeOwned>(resp: Response) -> AppResult<T> {
    resp.json::<T>().await.map_err(|e| {
        AppError::with_source(
            ErrorKind::ExternalService,
            "Unexpected response from GitHub",
            e,
        )
    })
}

fn map_contents(contents: wire::Contents) -> AppResult<RemoteContent> {
    match contents {
        wire::Contents::Listing(items) => {
            let files = items
                .into_iter()
                .map(|item| DirEntry {
                    kind: match item.kind.as_str() {
                        "dir" => EntryKind::Tree,
                        "submodule" => EntryKind::Commit,
                        _ => EntryKind::Blob,
                    },
                    name: item.name,
                    path: item.path,
                })
                .collect();
            Ok(RemoteContent::Directory(files))
        }
        wire::Contents::Single(item) if item.kind == "file" => {
            let bytes = match (item.encoding.as_deref(), item.content) {
                (Some("base64"), Some(encoded)) => {
                    let compact: String = encoded.split_whitespace().collect();
                    Some(BASE64.decode(compact).map_err(|e| {
                        AppError::with_source(
                            ErrorKind::ExternalService,
                            "GitHub returned undecodable file content",
                            e,
                        )
                    })?)
                }
                _ => None,
            };
            Ok(RemoteContent::File {
                name: item.name,
                path: item.path,
                bytes,
            })
        }
        wire::Contents::Single(item) => Err(AppError::upstream(
            None,
            format!("Unsupported content type '{}' at {}", item.kind, item.path),
        )),
    }
}
