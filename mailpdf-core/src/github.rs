//! GitHub-backed [`VersionSource`] and [`ArchiveSource`].
//!
//! Talks to the GitHub REST API over `reqwest`:
//! - branches: `GET /repos/{owner}/{repo}/branches` (paginated)
//! - file listing: `GET /repos/{owner}/{repo}/git/trees/{ref}?recursive=1`
//! - file content: `GET /repos/{owner}/{repo}/contents/{path}` with the raw media type
//! - snapshots: `GET /repos/{owner}/{repo}/zipball/{ref}`
//!
//! Authentication uses a personal access token, read from `GITHUB_API_TOKEN`
//! by [`GithubSource::new_from_env`].

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::contract::{ArchiveSource, VersionSource};
use crate::error::SourceError;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const TOKEN_ENV: &str = "GITHUB_API_TOKEN";

const RAW_MEDIA_TYPE: &str = "application/vnd.github.v3.raw";
const JSON_MEDIA_TYPE: &str = "application/vnd.github.v3+json";
const PAGE_SIZE: usize = 100;

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

/// Which repository to read, and through which API endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubRepo {
    pub owner: String,
    pub repo: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl GithubRepo {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            api_base: default_api_base(),
        }
    }
}

fn ref_segments(reference: &str) -> impl Iterator<Item = &str> {
    reference.split('/').filter(|s| !s.is_empty())
}

#[derive(Deserialize)]
struct Branch {
    name: String,
}

#[derive(Deserialize)]
struct RepoInfo {
    default_branch: String,
}

#[derive(Deserialize)]
struct Tree {
    tree: Vec<TreeNode>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Deserialize)]
struct TreeNode {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct ContentInfo {
    html_url: String,
}

pub struct GithubSource {
    client: Client,
    repo: GithubRepo,
    token: String,
    listing_reference: Option<String>,
}

impl GithubSource {
    pub fn new(repo: GithubRepo, token: impl Into<String>) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(concat!("mailpdf/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            repo,
            token: token.into(),
            listing_reference: None,
        })
    }

    pub fn new_from_env(repo: GithubRepo) -> Result<Self, SourceError> {
        let token = std::env::var(TOKEN_ENV).map_err(|e| {
            error!(error = ?e, "{TOKEN_ENV} missing in environment");
            SourceError::Credential(format!("{TOKEN_ENV}: {e}"))
        })?;
        info!(
            owner = %repo.owner,
            repo = %repo.repo,
            "Initialized GithubSource from environment"
        );
        Self::new(repo, token)
    }

    /// List files at `reference` instead of the repository's default branch.
    pub fn with_listing_reference(mut self, reference: impl Into<String>) -> Self {
        self.listing_reference = Some(reference.into());
        self
    }

    pub fn repo(&self) -> &GithubRepo {
        &self.repo
    }

    /// `{api_base}/repos/{owner}/{repo}/{tail...}` with every segment escaped.
    pub fn endpoint<'s, I>(&self, tail: I) -> Result<Url, SourceError>
    where
        I: IntoIterator<Item = &'s str>,
    {
        let mut url = Url::parse(&self.repo.api_base).map_err(|e| SourceError::Decode {
            url: self.repo.api_base.clone(),
            reason: e.to_string(),
        })?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| SourceError::Decode {
                url: self.repo.api_base.clone(),
                reason: "API base cannot carry a path".to_string(),
            })?;
            segments
                .pop_if_empty()
                .extend(["repos", self.repo.owner.as_str(), self.repo.repo.as_str()])
                .extend(tail);
        }
        Ok(url)
    }

    /// URL of a file's contents, optionally pinned to a reference.
    pub fn contents_url(&self, path: &str, reference: Option<&str>) -> Result<Url, SourceError> {
        let mut tail = vec!["contents"];
        tail.extend(path.split('/').filter(|s| !s.is_empty()));
        let mut url = self.endpoint(tail)?;
        if let Some(reference) = reference {
            url.query_pairs_mut().append_pair("ref", reference);
        }
        Ok(url)
    }

    /// Snapshot URL. Slashes in `reference` stay path separators, which is
    /// how GitHub spells branch names such as `release/1.0`.
    pub fn archive_url(&self, reference: &str) -> Result<Url, SourceError> {
        self.endpoint(std::iter::once("zipball").chain(ref_segments(reference)))
    }

    /// Recursive tree listing URL at `reference`.
    pub fn tree_url(&self, reference: &str) -> Result<Url, SourceError> {
        let mut url = self.endpoint(["git", "trees"].into_iter().chain(ref_segments(reference)))?;
        url.query_pairs_mut().append_pair("recursive", "1");
        Ok(url)
    }

    async fn get(&self, url: Url, accept: &str) -> Result<Response, SourceError> {
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, accept)
            .header(AUTHORIZATION, format!("token {}", self.token))
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, url = %url, "GitHub request failed");
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<Failed to decode response body>"));
            error!(status = %status, url = %url, "GitHub API returned error");
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, SourceError> {
        let response = self.get(url.clone(), JSON_MEDIA_TYPE).await?;
        response.json::<T>().await.map_err(|e| SourceError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    async fn default_branch(&self) -> Result<String, SourceError> {
        let info: RepoInfo = self.get_json(self.endpoint(std::iter::empty::<&str>())?).await?;
        Ok(info.default_branch)
    }

    async fn raw_content(&self, path: &str, reference: Option<&str>) -> Result<String, SourceError> {
        let url = self.contents_url(path, reference)?;
        match self.get(url, RAW_MEDIA_TYPE).await {
            Ok(response) => Ok(response.text().await?),
            Err(SourceError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(SourceError::NotFound {
                    path: path.to_string(),
                    reference: reference.unwrap_or("default branch").to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl VersionSource for GithubSource {
    async fn list_branches(&self) -> Result<Vec<String>, SourceError> {
        let mut names = Vec::new();
        let mut page = 1usize;
        loop {
            let mut url = self.endpoint(["branches"])?;
            url.query_pairs_mut()
                .append_pair("per_page", &PAGE_SIZE.to_string())
                .append_pair("page", &page.to_string());
            let batch: Vec<Branch> = self.get_json(url).await?;
            let size = batch.len();
            names.extend(batch.into_iter().map(|b| b.name));
            if size < PAGE_SIZE {
                break;
            }
            page += 1;
        }
        info!(count = names.len(), "Listed branches");
        Ok(names)
    }

    async fn list_all_files(&self) -> Result<Vec<String>, SourceError> {
        let reference = match &self.listing_reference {
            Some(reference) => reference.clone(),
            None => self.default_branch().await?,
        };
        let url = self.tree_url(&reference)?;
        let tree: Tree = self.get_json(url).await?;
        if tree.truncated {
            warn!(reference = %reference, "GitHub truncated the file listing");
        }
        let files: Vec<String> = tree
            .tree
            .into_iter()
            .filter(|node| node.kind == "blob")
            .map(|node| node.path)
            .collect();
        info!(count = files.len(), reference = %reference, "Listed repository files");
        Ok(files)
    }

    async fn get_file_content(&self, path: &str) -> Result<String, SourceError> {
        self.raw_content(path, None).await
    }

    async fn get_file_content_at(
        &self,
        path: &str,
        reference: &str,
    ) -> Result<String, SourceError> {
        self.raw_content(path, Some(reference)).await
    }

    async fn get_file_web_link(&self, path: &str) -> Result<String, SourceError> {
        let info: ContentInfo = self.get_json(self.contents_url(path, None)?).await?;
        Ok(info.html_url)
    }
}

#[async_trait]
impl ArchiveSource for GithubSource {
    async fn get_archive_bytes(&self, reference: &str) -> Result<Vec<u8>, SourceError> {
        let url = self.archive_url(reference)?;
        let response = self.get(url, JSON_MEDIA_TYPE).await?;
        let bytes = response.bytes().await?;
        info!(reference, size = bytes.len(), "Downloaded archive snapshot");
        Ok(bytes.to_vec())
    }
}
