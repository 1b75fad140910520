use crate::adapters::layout::{RegistryContent, CHAINS_DIR, WARP_ROUTES_DIR};
use crate::core::RegistrySource;
use crate::domain::model::{ChainAddresses, ChainMap, ChainMetadata, WarpCoreConfig};
use crate::utils::error::{Result, StoreError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Registry checked out on the local filesystem, same layout as the GitHub repo.
#[derive(Debug, Clone)]
pub struct LocalRegistry {
    base_path: PathBuf,
}

impl LocalRegistry {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn list_content(&self) -> Result<RegistryContent> {
        let mut paths = Vec::new();
        for dir in [CHAINS_DIR, WARP_ROUTES_DIR] {
            let root = self.base_path.join(dir);
            if root.is_dir() {
                collect_files(&self.base_path, &root, &mut paths)?;
            }
        }

        Ok(RegistryContent::from_paths(paths.iter().map(String::as_str)))
    }

    fn read_yaml<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let full_path = self.base_path.join(path);
        let data = fs::read_to_string(&full_path)?;
        serde_yaml::from_str(&data).map_err(|e| StoreError::RegistryError {
            message: format!("failed to parse {}: {}", full_path.display(), e),
        })
    }

    fn read_all<T: DeserializeOwned>(
        &self,
        files: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, T>> {
        files
            .iter()
            .map(|(key, path)| -> Result<(String, T)> { Ok((key.clone(), self.read_yaml(path)?)) })
            .collect()
    }
}

/// Collects files under `dir` as `/` separated paths relative to `base`.
fn collect_files(base: &Path, dir: &Path, out: &mut Vec<String>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(base, &path, out)?;
        } else if let Ok(relative) = path.strip_prefix(base) {
            let parts: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            out.push(parts.join("/"));
        }
    }
    Ok(())
}

#[async_trait]
impl RegistrySource for LocalRegistry {
    async fn get_metadata(&self) -> Result<ChainMap<ChainMetadata>> {
        let content = self.list_content()?;
        self.read_all(&content.metadata)
    }

    async fn get_addresses(&self) -> Result<ChainMap<ChainAddresses>> {
        let content = self.list_content()?;
        self.read_all(&content.addresses)
    }

    async fn get_warp_routes(&self) -> Result<BTreeMap<String, WarpCoreConfig>> {
        let content = self.list_content()?;
        self.read_all(&content.warp_routes)
    }
}
