pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url,
};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_REGISTRY_API_URL: &str = "https://api.github.com";
pub const DEFAULT_REGISTRY_RAW_URL: &str = "https://raw.githubusercontent.com";
pub const DEFAULT_REGISTRY_OWNER: &str = "hyperlane-xyz";
pub const DEFAULT_REGISTRY_REPO: &str = "hyperlane-registry";
pub const DEFAULT_REGISTRY_BRANCH: &str = "main";
pub const DEFAULT_CONCURRENT_REQUESTS: usize = 8;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

pub use crate::adapters::cdn::DEFAULT_VALIDATORS_URL;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "registry-store")]
#[command(about = "Load chain registry data and query it by chain name")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_REGISTRY_API_URL)]
    pub registry_api_url: String,

    #[arg(long, default_value = DEFAULT_REGISTRY_RAW_URL)]
    pub registry_raw_url: String,

    #[arg(long, default_value = DEFAULT_REGISTRY_OWNER)]
    pub owner: String,

    #[arg(long, default_value = DEFAULT_REGISTRY_REPO)]
    pub repo: String,

    #[arg(long, default_value = DEFAULT_REGISTRY_BRANCH)]
    pub branch: String,

    #[arg(long, help = "GitHub token for the trees API")]
    #[serde(skip_serializing)]
    pub github_token: Option<String>,

    #[arg(long, help = "Read the registry from a local checkout instead of GitHub")]
    pub registry_dir: Option<String>,

    #[arg(long, default_value = DEFAULT_VALIDATORS_URL)]
    pub validators_url: String,

    #[arg(long, default_value_t = DEFAULT_CONCURRENT_REQUESTS)]
    pub concurrent_requests: usize,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    #[arg(long, help = "TOML config file; replaces the registry and http flags")]
    pub config: Option<String>,

    #[arg(long, help = "Print metadata, addresses, validators and warp routes for one chain")]
    pub chain: Option<String>,

    #[arg(long, help = "Print output as JSON")]
    pub json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn registry_api_url(&self) -> &str {
        &self.registry_api_url
    }

    fn registry_raw_url(&self) -> &str {
        &self.registry_raw_url
    }

    fn registry_owner(&self) -> &str {
        &self.owner
    }

    fn registry_repo(&self) -> &str {
        &self.repo
    }

    fn registry_branch(&self) -> &str {
        &self.branch
    }

    fn github_token(&self) -> Option<&str> {
        self.github_token.as_deref()
    }

    fn registry_dir(&self) -> Option<&str> {
        self.registry_dir.as_deref()
    }

    fn validators_url(&self) -> &str {
        &self.validators_url
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

/// Checks shared by every config source.
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    match config.registry_dir() {
        Some(dir) => validate_path("registry.dir", dir)?,
        None => {
            validate_url("registry.api_url", config.registry_api_url())?;
            validate_url("registry.raw_url", config.registry_raw_url())?;
            validate_non_empty_string("registry.owner", config.registry_owner())?;
            validate_non_empty_string("registry.repo", config.registry_repo())?;
            validate_non_empty_string("registry.branch", config.registry_branch())?;
        }
    }

    validate_url("validators.url", config.validators_url())?;
    validate_range("http.concurrent_requests", config.concurrent_requests(), 1, 64)?;
    validate_range("http.timeout_seconds", config.timeout_seconds(), 1, 300)?;
    Ok(())
}
