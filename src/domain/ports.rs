use crate::domain::model::{ChainAddresses, ChainMap, ChainMetadata, WarpCoreConfig};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

pub trait ConfigProvider: Send + Sync {
    fn registry_api_url(&self) -> &str;
    fn registry_raw_url(&self) -> &str;
    fn registry_owner(&self) -> &str;
    fn registry_repo(&self) -> &str;
    fn registry_branch(&self) -> &str;
    fn github_token(&self) -> Option<&str>;
    /// Local registry checkout; when set the GitHub settings are unused.
    fn registry_dir(&self) -> Option<&str>;
    fn validators_url(&self) -> &str;
    fn concurrent_requests(&self) -> usize;
    fn timeout_seconds(&self) -> u64;
}

/// Chain metadata, addresses and warp route configs keyed the way the
/// registry publishes them.
#[async_trait]
pub trait RegistrySource: Send + Sync {
    async fn get_metadata(&self) -> Result<ChainMap<ChainMetadata>>;
    async fn get_addresses(&self) -> Result<ChainMap<ChainAddresses>>;
    async fn get_warp_routes(&self) -> Result<BTreeMap<String, WarpCoreConfig>>;
}

#[async_trait]
pub trait ValidatorSource: Send + Sync {
    /// Raw text of the multisig ISM source file.
    async fn fetch_validators_file(&self) -> Result<String>;
}
