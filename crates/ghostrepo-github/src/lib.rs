//! # ghostrepo-github
//!
//! Read-only access to repositories through a GitHub App installation.
//!
//! Callers depend on the [`SourceControl`] trait; [`GithubAppClient`] is the
//! production implementation. Upstream JSON is mapped into typed values at
//! this boundary so no GitHub-specific response parsing leaks out.

pub mod app;
pub mod client;
pub mod source;
mod wire;

pub use app::AppCredentials;
pub use client::GithubAppClient;
pub use source::{ByteStream, RemoteContent, RemoteTree, RepoRef, SourceControl};
