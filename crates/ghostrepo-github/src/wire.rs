//! Upstream JSON shapes.

use serde::Deserialize;

use ghostrepo_entity::content::EntryKind;

#[derive(Debug, Deserialize)]
pub(crate) struct Repository {
    pub default_branch: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GitRef {
    pub object: GitObject,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GitObject {
    pub sha: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Tree {
    #[serde(default)]
    pub truncated: bool,
    pub tree: Vec<TreeItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TreeItem {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Branch {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentItem {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Contents {
    Listing(Vec<ContentItem>),
    Single(ContentItem),
}

#[derive(Debug, Deserialize)]
pub(crate) struct Installation {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InstallationToken {
    pub token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}
