use crate::config::{
    validate_provider, DEFAULT_CONCURRENT_REQUESTS, DEFAULT_REGISTRY_API_URL,
    DEFAULT_REGISTRY_BRANCH, DEFAULT_REGISTRY_OWNER, DEFAULT_REGISTRY_RAW_URL,
    DEFAULT_REGISTRY_REPO, DEFAULT_TIMEOUT_SECONDS, DEFAULT_VALIDATORS_URL,
};
use crate::core::ConfigProvider;
use crate::utils::error::{Result, StoreError};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub registry: RegistryConfig,
    pub validators: ValidatorsConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub api_url: String,
    pub raw_url: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub github_token: Option<String>,
    pub dir: Option<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_REGISTRY_API_URL.to_string(),
            raw_url: DEFAULT_REGISTRY_RAW_URL.to_string(),
            owner: DEFAULT_REGISTRY_OWNER.to_string(),
            repo: DEFAULT_REGISTRY_REPO.to_string(),
            branch: DEFAULT_REGISTRY_BRANCH.to_string(),
            github_token: None,
            dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorsConfig {
    pub url: String,
}

impl Default for ValidatorsConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_VALIDATORS_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub concurrent_requests: usize,
    pub timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            concurrent_requests: DEFAULT_CONCURRENT_REQUESTS,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(StoreError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| StoreError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GITHUB_TOKEN})，未設定的保留原文
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }
}

impl ConfigProvider for TomlConfig {
    fn registry_api_url(&self) -> &str {
        &self.registry.api_url
    }

    fn registry_raw_url(&self) -> &str {
        &self.registry.raw_url
    }

    fn registry_owner(&self) -> &str {
        &self.registry.owner
    }

    fn registry_repo(&self) -> &str {
        &self.registry.repo
    }

    fn registry_branch(&self) -> &str {
        &self.registry.branch
    }

    fn github_token(&self) -> Option<&str> {
        // 未展開的 ${VAR} 視為未設定
        self.registry
            .github_token
            .as_deref()
            .filter(|token| !token.is_empty() && !token.starts_with("${"))
    }

    fn registry_dir(&self) -> Option<&str> {
        self.registry.dir.as_deref()
    }

    fn validators_url(&self) -> &str {
        &self.validators.url
    }

    fn concurrent_requests(&self) -> usize {
        self.http.concurrent_requests
    }

    fn timeout_seconds(&self) -> u64 {
        self.http.timeout_seconds
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
