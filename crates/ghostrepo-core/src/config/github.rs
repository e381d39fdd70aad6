//! GitHub App configuration.

use serde::{Deserialize, Serialize};

/// Credentials and endpoints for the GitHub App that reads shared repositories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// REST API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// GitHub App ID (JWT issuer).
    pub app_id: String,
    /// PEM-encoded RSA private key of the app. Takes precedence over
    /// `private_key_path`.
    #[serde(default)]
    pub private_key: Option<String>,
    /// Path to the PEM private key file.
    #[serde(default)]
    pub private_key_path: Option<String>,
    /// User-Agent header sent upstream.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_user_agent() -> String {
    "ghostrepo".to_string()
}

fn default_timeout() -> u64 {
    20
}
