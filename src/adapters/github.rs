use crate::adapters::http::{build_client, send_for_text};
use crate::adapters::layout::RegistryContent;
use crate::core::{ConfigProvider, RegistrySource};
use crate::domain::model::{ChainAddresses, ChainMap, ChainMetadata, WarpCoreConfig};
use crate::utils::error::{Result, StoreError};
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use tokio::sync::OnceCell;

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Registry hosted in a GitHub repository.
///
/// The file listing comes from the git trees API and is fetched once per
/// instance; file bodies come from the raw content host.
pub struct GithubRegistry {
    client: Client,
    api_url: String,
    raw_url: String,
    owner: String,
    repo: String,
    branch: String,
    auth_token: Option<String>,
    concurrent_requests: usize,
    content: OnceCell<RegistryContent>,
}

impl GithubRegistry {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = build_client(config.timeout_seconds())?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client<C: ConfigProvider>(client: Client, config: &C) -> Self {
        Self {
            client,
            api_url: config.registry_api_url().trim_end_matches('/').to_string(),
            raw_url: config.registry_raw_url().trim_end_matches('/').to_string(),
            owner: config.registry_owner().to_string(),
            repo: config.registry_repo().to_string(),
            branch: config.registry_branch().to_string(),
            auth_token: config.github_token().map(str::to_string),
            concurrent_requests: config.concurrent_requests().max(1),
            content: OnceCell::new(),
        }
    }

    fn tree_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.api_url, self.owner, self.repo, self.branch
        )
    }

    fn raw_file_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.raw_url, self.owner, self.repo, self.branch, path
        )
    }

    async fn list_content(&self) -> Result<&RegistryContent> {
        self.content
            .get_or_try_init(|| async {
                let url = self.tree_url();
                let mut request = self
                    .client
                    .get(&url)
                    .header("Accept", "application/vnd.github+json");
                if let Some(token) = &self.auth_token {
                    request = request.bearer_auth(token);
                }

                let body = send_for_text(request, &url).await?;
                let tree: TreeResponse = serde_json::from_str(&body)?;
                if tree.truncated {
                    tracing::warn!("⚠️ Registry tree listing was truncated, some files may be missing");
                }

                let content = RegistryContent::from_paths(
                    tree.tree
                        .iter()
                        .filter(|entry| entry.kind == "blob")
                        .map(|entry| entry.path.as_str()),
                );
                tracing::debug!(
                    "Registry listing: {} metadata, {} address, {} warp route files",
                    content.metadata.len(),
                    content.addresses.len(),
                    content.warp_routes.len()
                );
                Ok::<_, StoreError>(content)
            })
            .await
    }

    async fn fetch_yaml<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.raw_file_url(path);
        let body = send_for_text(self.client.get(&url), &url).await?;
        serde_yaml::from_str(&body).map_err(|e| StoreError::RegistryError {
            message: format!("failed to parse {}: {}", path, e),
        })
    }

    /// Fetches every `key -> path` entry, at most `concurrent_requests` at a time.
    async fn fetch_all<T: DeserializeOwned + Send>(
        &self,
        files: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, T>> {
        // 用擁有所有權的配對，future 才會是 Send
        let fetched: Vec<(String, T)> = stream::iter(files.clone())
            .map(|(key, path)| async move {
                let value = self.fetch_yaml::<T>(&path).await?;
                Ok::<_, StoreError>((key, value))
            })
            .buffer_unordered(self.concurrent_requests)
            .try_collect()
            .await?;

        Ok(fetched.into_iter().collect())
    }
}

#[async_trait]
impl RegistrySource for GithubRegistry {
    async fn get_metadata(&self) -> Result<ChainMap<ChainMetadata>> {
        let content = self.list_content().await?;
        self.fetch_all(&content.metadata).await
    }

    async fn get_addresses(&self) -> Result<ChainMap<ChainAddresses>> {
        let content = self.list_content().await?;
        self.fetch_all(&content.addresses).await
    }

    async fn get_warp_routes(&self) -> Result<BTreeMap<String, WarpCoreConfig>> {
        let content = self.list_content().await?;
        self.fetch_all(&content.warp_routes).await
    }
}
