use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::http;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const API_VERSION: &str = "2022-11-28";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";

/// `GET /repos/{owner}/{repo}/git/blobs/{sha}` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Blob {
    pub content: String,
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

fn default_encoding() -> String {
    "base64".to_string()
}

impl Blob {
    /// Decode the blob into UTF-8 text.
    pub fn text(&self) -> Result<String> {
        match self.encoding.as_str() {
            "utf-8" | "utf8" => Ok(self.content.clone()),
            "base64" => {
                // GitHub wraps the payload at 60 columns.
                let compact: String = self
                    .content
                    .chars()
                    .filter(|c| !c.is_ascii_whitespace())
                    .collect();
                let bytes = general_purpose::STANDARD
                    .decode(compact)
                    .context("Failed to decode base64 blob content")?;
                String::from_utf8(bytes).context("Blob content is not valid UTF-8")
            }
            other => Err(anyhow!("Unsupported blob encoding: {other}")),
        }
    }
}

/// `GET /repos/{owner}/{repo}/commits/{sha}` payload, reduced to what a review needs.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitResponse {
    pub commit: CommitDetail,
    #[serde(default)]
    pub files: Option<Vec<CommitFile>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    pub message: String,
    pub author: CommitAuthor,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitAuthor {
    pub name: String,
    pub date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitFile {
    pub filename: String,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    #[serde(default)]
    pub patch: Option<String>,
}

/// The two read-only GitHub operations the reviews rely on.
#[async_trait]
pub trait RepositoryApi: Send + Sync {
    async fn fetch_blob(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        cancel: &CancellationToken,
    ) -> Result<Blob>;

    async fn fetch_commit(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        cancel: &CancellationToken,
    ) -> Result<CommitResponse>;
}

/// GitHub REST client.
pub struct GitHubClient {
    http: Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(token: Option<String>, api_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(GitHubClient {
            http,
            api_url: api_url.into(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    /// Join percent-encoded path segments onto the API base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.api_url)
            .with_context(|| format!("invalid GitHub API URL {:?}", self.api_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("GitHub API URL cannot be a base: {}", self.api_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get(&self, url: Url) -> RequestBuilder {
        log::debug!("GET {url}");
        let request = self
            .http
            .get(url)
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, concat!("quality-checker/", env!("CARGO_PKG_VERSION")))
            .header(API_VERSION_HEADER, API_VERSION);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub(crate) fn blob_request(&self, owner: &str, repo: &str, sha: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(&["repos", owner, repo, "git", "blobs", sha])?;
        Ok(self.get(url))
    }

    pub(crate) fn commit_request(&self, owner: &str, repo: &str, sha: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(&["repos", owner, repo, "commits", sha])?;
        Ok(self.get(url))
    }
}

#[async_trait]
impl RepositoryApi for GitHubClient {
    async fn fetch_blob(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        cancel: &CancellationToken,
    ) -> Result<Blob> {
        let reply = http::execute(self.blob_request(owner, repo, sha)?, cancel)
            .await
            .with_context(|| format!("failed to fetch blob {sha} from {owner}/{repo}"))?
            .ensure_success("GitHub")?;

        serde_json::from_str(&reply.body).context("Failed to parse blob response")
    }

    async fn fetch_commit(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        cancel: &CancellationToken,
    ) -> Result<CommitResponse> {
        let reply = http::execute(self.commit_request(owner, repo, sha)?, cancel)
            .await
            .with_context(|| format!("failed to fetch commit {sha} from {owner}/{repo}"))?
            .ensure_success("GitHub")?;

        serde_json::from_str(&reply.body).context("Failed to parse commit response")
    }
}
